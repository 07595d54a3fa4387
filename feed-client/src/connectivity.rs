//! Connectivity oracle.
//!
//! The feed asks for the current status before each refresh and never
//! treats anything but [`NetworkStatus::Online`] as reachable. Observers can
//! subscribe to status changes through a `watch` channel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, warn};

/// Network reachability as last observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkStatus {
    /// The network is reachable.
    Online,
    /// The network is known to be unreachable.
    Offline,
    /// No observation yet.
    Unknown,
}

impl NetworkStatus {
    /// Only a positive observation counts as online.
    pub fn is_online(self) -> bool {
        matches!(self, NetworkStatus::Online)
    }
}

/// Source of network status.
#[async_trait]
pub trait Connectivity: Send + Sync {
    /// Fresh status, polled now.
    async fn current_status(&self) -> NetworkStatus;

    /// Receiver that sees every status change.
    fn subscribe(&self) -> watch::Receiver<NetworkStatus>;
}

/// Connectivity driven by hand.
///
/// Used by tests and by the CLI's `--offline` flag.
#[derive(Debug)]
pub struct ManualConnectivity {
    status: watch::Sender<NetworkStatus>,
    polls: AtomicUsize,
}

impl ManualConnectivity {
    /// Start with the given status.
    pub fn new(status: NetworkStatus) -> Self {
        let (status, _) = watch::channel(status);
        Self {
            status,
            polls: AtomicUsize::new(0),
        }
    }

    /// Start online.
    pub fn online() -> Self {
        Self::new(NetworkStatus::Online)
    }

    /// Start offline.
    pub fn offline() -> Self {
        Self::new(NetworkStatus::Offline)
    }

    /// Change the status, notifying subscribers.
    pub fn set_status(&self, status: NetworkStatus) {
        self.status.send_replace(status);
    }

    /// Number of `current_status` calls so far.
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Connectivity for ManualConnectivity {
    async fn current_status(&self) -> NetworkStatus {
        self.polls.fetch_add(1, Ordering::Relaxed);
        *self.status.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<NetworkStatus> {
        self.status.subscribe()
    }
}

/// Connectivity probed with an HTTP `HEAD` request.
///
/// Any response, whatever its status code, means the network is up. A
/// connect failure or timeout means it is down.
#[derive(Debug)]
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
    status: watch::Sender<NetworkStatus>,
}

impl HttpProbe {
    /// Default probe timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Probe `url` with the default timeout.
    pub fn new(url: &str) -> Result<Self, reqwest::Error> {
        Self::with_timeout(url, Self::DEFAULT_TIMEOUT)
    }

    /// Probe `url`, giving up after `timeout`.
    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let (status, _) = watch::channel(NetworkStatus::Unknown);
        Ok(Self {
            client,
            url: url.to_string(),
            status,
        })
    }

    /// Last observed status without probing.
    pub fn last_status(&self) -> NetworkStatus {
        *self.status.borrow()
    }

    fn record(&self, observed: NetworkStatus) {
        let previous = self.last_status();
        let changed = self.status.send_if_modified(|current| {
            if *current == observed {
                false
            } else {
                *current = observed;
                true
            }
        });
        if changed {
            match observed {
                NetworkStatus::Online => info!(from = ?previous, "network online"),
                _ => warn!(from = ?previous, "network offline"),
            }
        }
    }
}

#[async_trait]
impl Connectivity for HttpProbe {
    async fn current_status(&self) -> NetworkStatus {
        let observed = match self.client.head(&self.url).send().await {
            Ok(_) => NetworkStatus::Online,
            Err(_) => NetworkStatus::Offline,
        };
        self.record(observed);
        observed
    }

    fn subscribe(&self) -> watch::Receiver<NetworkStatus> {
        self.status.subscribe()
    }
}
