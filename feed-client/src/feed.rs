//! ImageFeed - the sync core presentation layers talk to.
//!
//! # Architecture
//!
//! ImageFeed owns a pure [`FeedState`] (from feed-core) and interprets the
//! actions it returns: fetching pages through the [`PageFetcher`] with
//! retries, reading and writing the snapshot, and cancelling superseded
//! requests.
//!
//! ```text
//! refresh / load_more / set_sort
//!         ↓
//!     FeedState (pure) ──actions──→ ImageFeed ──→ PageFetcher / KeyValueStore
//!         ↑                             │
//!         └────────── events ───────────┘
//! ```
//!
//! The session lock is only held while the state machine runs, never across
//! an await. Each request carries its own [`CancellationToken`]; results of
//! superseded requests are fed back like any other and the state machine
//! drops them.

use std::collections::VecDeque;
use std::sync::Arc;

use feed_core::{FeedAction, FeedEvent, FeedSnapshot, FeedState, RequestId};
use feed_types::{ImageRecord, PageRequest, SortParams};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::connectivity::Connectivity;
use crate::fetch::{FetchError, PageFetcher};
use crate::retry::retry_with_backoff;
use crate::snapshot::SnapshotCache;
use crate::store::KeyValueStore;

struct InFlight {
    request: RequestId,
    token: CancellationToken,
}

struct Session {
    state: FeedState,
    sort: SortParams,
    in_flight: Option<InFlight>,
    /// Bumped for every list handed to the snapshot writer.
    persist_generation: u64,
}

/// I/O the feed must perform, derived from state machine actions.
enum Step {
    Fetch {
        request: RequestId,
        page: PageRequest,
        token: CancellationToken,
    },
    ReadSnapshot {
        request: RequestId,
        token: CancellationToken,
    },
    Persist {
        generation: u64,
        records: Vec<ImageRecord>,
    },
}

/// Paginated, offline-capable image list.
///
/// All methods take `&self`; overlapping calls are resolved by the state
/// machine (a newer refresh supersedes an older one, `load_more` while
/// loading is dropped).
pub struct ImageFeed<F> {
    config: FeedConfig,
    fetcher: F,
    snapshots: SnapshotCache,
    connectivity: Arc<dyn Connectivity>,
    session: Mutex<Session>,
    /// Generation of the last list written; held for the whole write.
    persisted: tokio::sync::Mutex<u64>,
    updates: watch::Sender<FeedSnapshot>,
}

impl<F: PageFetcher> ImageFeed<F> {
    /// Create an empty feed. Nothing is fetched until [`refresh`](Self::refresh).
    pub fn new(
        config: FeedConfig,
        fetcher: F,
        store: Arc<dyn KeyValueStore>,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        let state = FeedState::new(config.page_size);
        let (updates, _) = watch::channel(state.snapshot());
        Self {
            snapshots: SnapshotCache::with_key(store, &config.snapshot_key),
            session: Mutex::new(Session {
                state,
                sort: config.sort,
                in_flight: None,
                persist_generation: 0,
            }),
            persisted: tokio::sync::Mutex::new(0),
            config,
            fetcher,
            connectivity,
            updates,
        }
    }

    /// Reload page 0 with the current sort order.
    ///
    /// Cancels whatever is in flight. When offline with an empty list the
    /// stored snapshot is shown instead and the network is not touched.
    pub async fn refresh(&self) {
        let online = self.connectivity.current_status().await.is_online();
        let steps = self.dispatch(FeedEvent::RefreshRequested { online });
        self.drive(steps).await;
    }

    /// Fetch and append the next page.
    ///
    /// No-op while a request is in flight or once the last page was short.
    pub async fn load_more(&self) {
        let steps = self.dispatch(FeedEvent::LoadMoreRequested);
        self.drive(steps).await;
    }

    /// Switch sort order and start over from page 0.
    ///
    /// Does nothing if `sort` is already the current order.
    pub async fn set_sort(&self, sort: SortParams) {
        if self.session.lock().sort == sort {
            return;
        }
        let online = self.connectivity.current_status().await.is_online();
        let steps = {
            let mut session = self.session.lock();
            // Another caller may have switched while connectivity was polled.
            if session.sort == sort {
                return;
            }
            info!(field = %sort.field, ascending = sort.direction.is_ascending(), "sort changed");
            session.sort = sort;
            self.apply(&mut session, FeedEvent::SortChanged { online })
        };
        self.drive(steps).await;
    }

    /// Cancel whatever is in flight. Safe to call at any time.
    pub fn teardown(&self) {
        self.dispatch(FeedEvent::TornDown);
    }

    /// Current view of the list.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.updates.borrow().clone()
    }

    /// Receiver that sees every change to the view.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.updates.subscribe()
    }

    /// Current sort order.
    pub fn sort(&self) -> SortParams {
        self.session.lock().sort
    }

    /// Index of the page `load_more` would request.
    pub fn next_page(&self) -> u32 {
        self.session.lock().state.next_page()
    }

    /// Feed configuration.
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Underlying fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn dispatch(&self, event: FeedEvent) -> Vec<Step> {
        let mut session = self.session.lock();
        self.apply(&mut session, event)
    }

    /// Run one transition and translate its actions. Caller holds the lock.
    fn apply(&self, session: &mut Session, event: FeedEvent) -> Vec<Step> {
        let actions = session.state.on_event(event);
        let mut steps = Vec::with_capacity(actions.len());

        for action in actions {
            match action {
                FeedAction::Cancel { request } => {
                    if session
                        .in_flight
                        .as_ref()
                        .is_some_and(|f| f.request == request)
                    {
                        if let Some(in_flight) = session.in_flight.take() {
                            debug!(%request, "cancelling request");
                            in_flight.token.cancel();
                        }
                    }
                }
                FeedAction::FetchPage { request, page } => {
                    let token = CancellationToken::new();
                    session.in_flight = Some(InFlight {
                        request,
                        token: token.clone(),
                    });
                    let page = PageRequest::new(
                        &self.config.collection_id,
                        page,
                        self.config.page_size,
                        session.sort,
                    );
                    steps.push(Step::Fetch {
                        request,
                        page,
                        token,
                    });
                }
                FeedAction::ReadSnapshot { request } => {
                    let token = CancellationToken::new();
                    session.in_flight = Some(InFlight {
                        request,
                        token: token.clone(),
                    });
                    steps.push(Step::ReadSnapshot { request, token });
                }
                FeedAction::PersistSnapshot { records } => {
                    session.persist_generation += 1;
                    steps.push(Step::Persist {
                        generation: session.persist_generation,
                        records,
                    });
                }
            }
        }

        // Completed requests release their token.
        let current = session.state.in_flight();
        if session.in_flight.as_ref().map(|f| f.request) != current {
            session.in_flight = None;
        }

        self.updates.send_replace(session.state.snapshot());
        steps
    }

    async fn drive(&self, steps: Vec<Step>) {
        let mut queue = VecDeque::from(steps);
        while let Some(step) = queue.pop_front() {
            let follow_up = match step {
                Step::Fetch {
                    request,
                    page,
                    token,
                } => {
                    let event = self.fetch(request, &page, &token).await;
                    self.dispatch(event)
                }
                Step::ReadSnapshot { request, token } => {
                    let event = self.read_snapshot(request, &token).await;
                    self.dispatch(event)
                }
                Step::Persist {
                    generation,
                    records,
                } => {
                    self.persist(generation, &records).await;
                    Vec::new()
                }
            };
            queue.extend(follow_up);
        }
    }

    /// Write `records` unless a newer list has been handed out since.
    ///
    /// Writes are serialized, so a slow older write cannot land after a
    /// newer one.
    async fn persist(&self, generation: u64, records: &[ImageRecord]) {
        let mut written = self.persisted.lock().await;
        let latest = self.session.lock().persist_generation;
        if generation < latest || generation <= *written {
            debug!(generation, latest, "skipping superseded snapshot write");
            return;
        }
        if let Err(e) = self.snapshots.save(records).await {
            warn!(error = %e, "failed to persist snapshot");
        }
        *written = generation;
    }

    async fn fetch(
        &self,
        request: RequestId,
        page: &PageRequest,
        token: &CancellationToken,
    ) -> FeedEvent {
        debug!(%request, page = page.page, "fetching page");

        let result = retry_with_backoff(&self.config.retry, token, |attempt| {
            debug!(%request, attempt, "fetch attempt");
            self.fetcher.fetch_page(page, token)
        })
        .await;

        match result {
            Ok(envelope) if envelope.ok => {
                let records = envelope.into_records();
                info!(%request, count = records.len(), "page loaded");
                FeedEvent::PageLoaded { request, records }
            }
            Ok(_) => {
                warn!(%request, "remote rejected page request");
                FeedEvent::LoadFailed {
                    request,
                    error: FetchError::Rejected.to_string(),
                }
            }
            Err(e) if e.is_cancelled() => {
                debug!(%request, "fetch cancelled");
                FeedEvent::Cancelled { request }
            }
            Err(e) => {
                warn!(%request, error = %e, "fetch failed");
                FeedEvent::LoadFailed {
                    request,
                    error: e.to_string(),
                }
            }
        }
    }

    async fn read_snapshot(&self, request: RequestId, token: &CancellationToken) -> FeedEvent {
        let loaded = tokio::select! {
            biased;
            _ = token.cancelled() => return FeedEvent::Cancelled { request },
            loaded = self.snapshots.load() => loaded,
        };

        let records = match loaded {
            Ok(records) => records,
            Err(e) => {
                warn!(%request, error = %e, "snapshot unreadable, treating as absent");
                None
            }
        };
        info!(
            %request,
            cached = records.as_ref().map_or(0, Vec::len),
            "offline, serving snapshot"
        );
        FeedEvent::SnapshotLoaded { request, records }
    }
}

impl<F> Drop for ImageFeed<F> {
    fn drop(&mut self) {
        if let Some(in_flight) = self.session.get_mut().in_flight.take() {
            in_flight.token.cancel();
        }
    }
}

impl<F> std::fmt::Debug for ImageFeed<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFeed")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
