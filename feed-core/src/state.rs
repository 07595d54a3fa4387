//! List state machine for the gallery feed.
//!
//! This module provides a pure, side-effect-free state machine for the
//! paginated image list. The state machine takes events as input, mutates
//! the list, and returns the actions the caller must execute.
//!
//! The actual I/O (fetching pages, reading and writing the snapshot) is
//! performed by feed-client, not by this module. Every fetch or snapshot
//! read is tagged with a [`RequestId`]; results carrying any id other than
//! the one currently in flight are stale and leave the state untouched.

use std::fmt;

use feed_types::ImageRecord;
use thiserror::Error;

use crate::cursor::PageCursor;
use crate::merge::{append_unique, dedup_by_id};

/// Identity of one fetch or snapshot read.
///
/// Minted by [`FeedState`] in strictly increasing order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Get the numeric value of this RequestId.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.0)
    }
}

/// Failures surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Offline, the list is empty, and no snapshot was stored.
    #[error("offline and no cached data available")]
    OfflineNoCache,

    /// Fetching a page failed after all attempts.
    #[error("{0}")]
    Fetch(String),
}

/// Read-only view of the list handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSnapshot {
    /// Records in arrival order, unique by id.
    pub items: Vec<ImageRecord>,
    /// A fetch or snapshot read is in flight.
    pub loading: bool,
    /// Last failure, cleared when the next operation starts.
    pub error: Option<LoadError>,
    /// `load_more` may fetch another page.
    pub has_more: bool,
}

impl FeedSnapshot {
    /// Items matching a search query, in list order.
    ///
    /// Filtering is a view over the loaded items; it never triggers a fetch.
    pub fn matching(&self, query: &str) -> Vec<&ImageRecord> {
        self.items
            .iter()
            .filter(|record| record.matches_query(query))
            .collect()
    }
}

impl Default for FeedSnapshot {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            has_more: true,
        }
    }
}

/// Events that drive the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// Reload page 0 with the current sort parameters.
    RefreshRequested {
        /// Connectivity observed when the request was made.
        online: bool,
    },
    /// Sort parameters changed: start a new session.
    SortChanged {
        /// Connectivity observed when the request was made.
        online: bool,
    },
    /// Fetch the next page.
    LoadMoreRequested,
    /// A page fetch succeeded.
    PageLoaded {
        /// Request the page belongs to.
        request: RequestId,
        /// Records in remote order.
        records: Vec<ImageRecord>,
    },
    /// A snapshot read finished.
    SnapshotLoaded {
        /// Request the read belongs to.
        request: RequestId,
        /// Stored records, or `None` when nothing usable was stored.
        records: Option<Vec<ImageRecord>>,
    },
    /// A page fetch failed for good.
    LoadFailed {
        /// Request that failed.
        request: RequestId,
        /// Message describing the failure.
        error: String,
    },
    /// A request observed its cancellation.
    Cancelled {
        /// Request that was cancelled.
        request: RequestId,
    },
    /// The owner is going away.
    TornDown,
}

/// Side effects requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedAction {
    /// Cancel a superseded request.
    Cancel {
        /// Request to cancel.
        request: RequestId,
    },
    /// Fetch one page from the remote.
    FetchPage {
        /// Identity to report the result under.
        request: RequestId,
        /// Zero-based page index.
        page: u32,
    },
    /// Read the stored snapshot instead of going to the network.
    ReadSnapshot {
        /// Identity to report the result under.
        request: RequestId,
    },
    /// Overwrite the stored snapshot with the full list.
    PersistSnapshot {
        /// The complete list after the merge.
        records: Vec<ImageRecord>,
    },
}

/// What the in-flight request will do to the list when it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadKind {
    Replace,
    Append,
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    request: RequestId,
    kind: LoadKind,
}

/// The authoritative list state - NO I/O, just transitions.
///
/// At most one request is pending at a time. `loading` is true exactly
/// while one is.
#[derive(Debug, Clone)]
pub struct FeedState {
    items: Vec<ImageRecord>,
    error: Option<LoadError>,
    cursor: PageCursor,
    pending: Option<Pending>,
    last_request: u64,
}

impl FeedState {
    /// Create an empty list for the given page size.
    pub fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            error: None,
            cursor: PageCursor::new(page_size),
            pending: None,
            last_request: 0,
        }
    }

    /// Process an event and return the actions to execute, in order.
    ///
    /// The caller (feed-client) is responsible for executing the returned
    /// actions and feeding their outcomes back as events.
    pub fn on_event(&mut self, event: FeedEvent) -> Vec<FeedAction> {
        match event {
            FeedEvent::RefreshRequested { online } => self.start_refresh(online),
            FeedEvent::SortChanged { online } => {
                let mut actions = self.cancel_pending();
                self.items.clear();
                self.error = None;
                self.cursor.reset();
                actions.extend(self.start_refresh(online));
                actions
            }
            FeedEvent::LoadMoreRequested => {
                if self.pending.is_some() || !self.cursor.has_more() {
                    return Vec::new();
                }
                let request = self.begin(LoadKind::Append);
                vec![FeedAction::FetchPage {
                    request,
                    page: self.cursor.next_page(),
                }]
            }
            FeedEvent::PageLoaded { request, records } => {
                let Some(pending) = self.complete(request) else {
                    return Vec::new();
                };
                let returned = records.len();
                match pending.kind {
                    LoadKind::Append => {
                        append_unique(&mut self.items, records);
                        self.cursor.advance(returned);
                    }
                    LoadKind::Replace | LoadKind::Snapshot => {
                        self.items = dedup_by_id(records);
                        self.cursor.restart(returned);
                    }
                }
                vec![FeedAction::PersistSnapshot {
                    records: self.items.clone(),
                }]
            }
            FeedEvent::SnapshotLoaded { request, records } => {
                if self.complete(request).is_none() {
                    return Vec::new();
                }
                match records {
                    Some(records) => {
                        self.items = dedup_by_id(records);
                        self.cursor.exhaust();
                    }
                    None => self.error = Some(LoadError::OfflineNoCache),
                }
                Vec::new()
            }
            FeedEvent::LoadFailed { request, error } => {
                if self.complete(request).is_some() {
                    self.error = Some(LoadError::Fetch(error));
                }
                Vec::new()
            }
            FeedEvent::Cancelled { request } => {
                self.complete(request);
                Vec::new()
            }
            FeedEvent::TornDown => self.cancel_pending(),
        }
    }

    /// Records in arrival order.
    pub fn items(&self) -> &[ImageRecord] {
        &self.items
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Last surfaced failure.
    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    /// Whether `load_more` may fetch another page.
    pub fn has_more(&self) -> bool {
        self.cursor.has_more()
    }

    /// Index of the next page `load_more` would request.
    pub fn next_page(&self) -> u32 {
        self.cursor.next_page()
    }

    /// Configured page size.
    pub fn page_size(&self) -> u32 {
        self.cursor.page_size()
    }

    /// The request currently allowed to mutate the list.
    pub fn in_flight(&self) -> Option<RequestId> {
        self.pending.map(|p| p.request)
    }

    /// Copy of the presentation-facing view.
    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            items: self.items.clone(),
            loading: self.is_loading(),
            error: self.error.clone(),
            has_more: self.has_more(),
        }
    }

    fn start_refresh(&mut self, online: bool) -> Vec<FeedAction> {
        let mut actions = self.cancel_pending();
        if !online && self.items.is_empty() {
            let request = self.begin(LoadKind::Snapshot);
            actions.push(FeedAction::ReadSnapshot { request });
        } else {
            let request = self.begin(LoadKind::Replace);
            actions.push(FeedAction::FetchPage { request, page: 0 });
        }
        actions
    }

    fn begin(&mut self, kind: LoadKind) -> RequestId {
        self.last_request += 1;
        let request = RequestId(self.last_request);
        self.pending = Some(Pending { request, kind });
        self.error = None;
        request
    }

    /// Clear the pending request if `request` is it.
    fn complete(&mut self, request: RequestId) -> Option<Pending> {
        match self.pending {
            Some(pending) if pending.request == request => self.pending.take(),
            _ => None,
        }
    }

    fn cancel_pending(&mut self) -> Vec<FeedAction> {
        self.pending
            .take()
            .map(|pending| FeedAction::Cancel {
                request: pending.request,
            })
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const PAGE: u32 = 40;

    fn page(range: std::ops::Range<u64>) -> Vec<ImageRecord> {
        range.map(|id| ImageRecord::new(id, "img")).collect()
    }

    fn fetched(actions: &[FeedAction]) -> (RequestId, u32) {
        actions
            .iter()
            .find_map(|a| match a {
                FeedAction::FetchPage { request, page } => Some((*request, *page)),
                _ => None,
            })
            .expect("expected FetchPage action")
    }

    fn refreshed(state: &mut FeedState, records: Vec<ImageRecord>) {
        let actions = state.on_event(FeedEvent::RefreshRequested { online: true });
        let (request, _) = fetched(&actions);
        state.on_event(FeedEvent::PageLoaded { request, records });
    }

    // ===========================================
    // Refresh Tests
    // ===========================================

    #[test]
    fn starts_empty_and_idle() {
        let state = FeedState::new(PAGE);
        assert!(state.items().is_empty());
        assert!(!state.is_loading());
        assert!(state.error().is_none());
        assert!(state.has_more());
        assert_eq!(state.next_page(), 0);
    }

    #[test]
    fn refresh_fetches_page_zero_and_sets_loading() {
        let mut state = FeedState::new(PAGE);
        let actions = state.on_event(FeedEvent::RefreshRequested { online: true });

        assert_eq!(fetched(&actions).1, 0);
        assert!(state.is_loading());
    }

    #[test]
    fn refresh_success_replaces_items_and_persists() {
        let mut state = FeedState::new(PAGE);
        refreshed(&mut state, page(0..40));

        let actions = state.on_event(FeedEvent::RefreshRequested { online: true });
        let (request, _) = fetched(&actions);
        let actions = state.on_event(FeedEvent::PageLoaded {
            request,
            records: page(100..110),
        });

        assert_eq!(state.items().len(), 10);
        assert_eq!(state.items()[0].id.value(), 100);
        assert_eq!(state.next_page(), 1);
        assert!(!state.has_more());
        assert!(!state.is_loading());
        assert_eq!(
            actions,
            vec![FeedAction::PersistSnapshot {
                records: state.items().to_vec()
            }]
        );
    }

    #[test]
    fn full_first_page_has_more() {
        let mut state = FeedState::new(PAGE);
        refreshed(&mut state, page(0..40));

        assert_eq!(state.next_page(), 1);
        assert!(state.has_more());
    }

    #[test]
    fn refresh_clears_previous_error() {
        let mut state = FeedState::new(PAGE);
        let (request, _) = fetched(&state.on_event(FeedEvent::RefreshRequested { online: true }));
        state.on_event(FeedEvent::LoadFailed {
            request,
            error: "boom".into(),
        });
        assert!(state.error().is_some());

        state.on_event(FeedEvent::RefreshRequested { online: true });
        assert!(state.error().is_none());
    }

    #[test]
    fn failure_keeps_items_and_sets_error() {
        let mut state = FeedState::new(PAGE);
        refreshed(&mut state, page(0..40));

        let (request, _) = fetched(&state.on_event(FeedEvent::RefreshRequested { online: true }));
        state.on_event(FeedEvent::LoadFailed {
            request,
            error: "HTTP error! status: 503".into(),
        });

        assert_eq!(state.items().len(), 40);
        assert!(!state.is_loading());
        assert_eq!(
            state.error(),
            Some(&LoadError::Fetch("HTTP error! status: 503".into()))
        );
    }

    // ===========================================
    // Load More Tests
    // ===========================================

    #[test]
    fn load_more_appends_next_page() {
        let mut state = FeedState::new(PAGE);
        refreshed(&mut state, page(0..40));

        let actions = state.on_event(FeedEvent::LoadMoreRequested);
        let (request, page_index) = fetched(&actions);
        assert_eq!(page_index, 1);

        state.on_event(FeedEvent::PageLoaded {
            request,
            records: page(40..52),
        });

        assert_eq!(state.items().len(), 52);
        assert!(!state.has_more());
        assert_eq!(state.next_page(), 2);
    }

    #[test]
    fn load_more_is_noop_without_more() {
        let mut state = FeedState::new(PAGE);
        refreshed(&mut state, page(0..5));

        let before = state.snapshot();
        let actions = state.on_event(FeedEvent::LoadMoreRequested);

        assert!(actions.is_empty());
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn load_more_is_dropped_while_loading() {
        let mut state = FeedState::new(PAGE);
        refreshed(&mut state, page(0..40));
        state.on_event(FeedEvent::LoadMoreRequested);

        let before = state.snapshot();
        let actions = state.on_event(FeedEvent::LoadMoreRequested);

        assert!(actions.is_empty());
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn load_more_drops_overlapping_records() {
        let mut state = FeedState::new(PAGE);
        refreshed(&mut state, page(0..40));

        let (request, _) = fetched(&state.on_event(FeedEvent::LoadMoreRequested));
        state.on_event(FeedEvent::PageLoaded {
            request,
            records: page(30..70),
        });

        assert_eq!(state.items().len(), 70);
        // Full raw page: more may follow even though only 30 were new.
        assert!(state.has_more());
        let unique: HashSet<_> = state.items().iter().map(|r| r.id).collect();
        assert_eq!(unique.len(), state.items().len());
    }

    #[test]
    fn load_more_failure_keeps_cursor() {
        let mut state = FeedState::new(PAGE);
        refreshed(&mut state, page(0..40));

        let (request, _) = fetched(&state.on_event(FeedEvent::LoadMoreRequested));
        state.on_event(FeedEvent::LoadFailed {
            request,
            error: "timeout".into(),
        });

        assert_eq!(state.next_page(), 1);
        assert!(state.has_more());
        assert_eq!(state.items().len(), 40);
    }

    // ===========================================
    // Offline Snapshot Tests
    // ===========================================

    #[test]
    fn offline_with_empty_list_reads_snapshot() {
        let mut state = FeedState::new(PAGE);
        let actions = state.on_event(FeedEvent::RefreshRequested { online: false });

        assert!(matches!(actions.as_slice(), [FeedAction::ReadSnapshot { .. }]));
        assert!(state.is_loading());
    }

    #[test]
    fn offline_with_items_still_fetches() {
        let mut state = FeedState::new(PAGE);
        refreshed(&mut state, page(0..3));

        let actions = state.on_event(FeedEvent::RefreshRequested { online: false });
        assert_eq!(fetched(&actions).1, 0);
    }

    #[test]
    fn snapshot_hit_replaces_items_without_more() {
        let mut state = FeedState::new(PAGE);
        let actions = state.on_event(FeedEvent::RefreshRequested { online: false });
        let FeedAction::ReadSnapshot { request } = actions[0] else {
            panic!("expected ReadSnapshot");
        };

        let actions = state.on_event(FeedEvent::SnapshotLoaded {
            request,
            records: Some(page(0..40)),
        });

        assert!(actions.is_empty(), "cache reads are never written back");
        assert_eq!(state.items().len(), 40);
        assert!(!state.has_more());
        assert!(state.error().is_none());
        assert!(!state.is_loading());
        assert!(state.on_event(FeedEvent::LoadMoreRequested).is_empty());
    }

    #[test]
    fn snapshot_miss_is_offline_error() {
        let mut state = FeedState::new(PAGE);
        let actions = state.on_event(FeedEvent::RefreshRequested { online: false });
        let FeedAction::ReadSnapshot { request } = actions[0] else {
            panic!("expected ReadSnapshot");
        };

        state.on_event(FeedEvent::SnapshotLoaded {
            request,
            records: None,
        });

        assert!(state.items().is_empty());
        assert_eq!(state.error(), Some(&LoadError::OfflineNoCache));
        assert!(!state.is_loading());
    }

    // ===========================================
    // Stale Result Tests
    // ===========================================

    #[test]
    fn second_refresh_cancels_first() {
        let mut state = FeedState::new(PAGE);
        let (first, _) = fetched(&state.on_event(FeedEvent::RefreshRequested { online: true }));

        let actions = state.on_event(FeedEvent::RefreshRequested { online: true });

        assert_eq!(actions[0], FeedAction::Cancel { request: first });
        let (second, _) = fetched(&actions);
        assert!(second > first);
        assert_eq!(state.in_flight(), Some(second));
    }

    #[test]
    fn stale_page_is_discarded() {
        let mut state = FeedState::new(PAGE);
        let (first, _) = fetched(&state.on_event(FeedEvent::RefreshRequested { online: true }));
        let (second, _) = fetched(&state.on_event(FeedEvent::RefreshRequested { online: true }));

        state.on_event(FeedEvent::PageLoaded {
            request: second,
            records: page(100..105),
        });
        let actions = state.on_event(FeedEvent::PageLoaded {
            request: first,
            records: page(0..40),
        });

        assert!(actions.is_empty());
        assert_eq!(state.items().len(), 5);
        assert_eq!(state.items()[0].id.value(), 100);
        assert!(!state.has_more());
    }

    #[test]
    fn stale_failure_and_cancellation_are_ignored() {
        let mut state = FeedState::new(PAGE);
        let (first, _) = fetched(&state.on_event(FeedEvent::RefreshRequested { online: true }));
        state.on_event(FeedEvent::RefreshRequested { online: true });

        state.on_event(FeedEvent::LoadFailed {
            request: first,
            error: "late".into(),
        });
        state.on_event(FeedEvent::Cancelled { request: first });

        assert!(state.error().is_none());
        assert!(state.is_loading());
    }

    #[test]
    fn cancellation_is_not_an_error() {
        let mut state = FeedState::new(PAGE);
        let (request, _) = fetched(&state.on_event(FeedEvent::RefreshRequested { online: true }));

        state.on_event(FeedEvent::Cancelled { request });

        assert!(state.error().is_none());
        assert!(!state.is_loading());
    }

    // ===========================================
    // Session Tests
    // ===========================================

    #[test]
    fn sort_change_starts_new_session() {
        let mut state = FeedState::new(PAGE);
        refreshed(&mut state, page(0..40));
        let (pending, _) = fetched(&state.on_event(FeedEvent::LoadMoreRequested));

        let actions = state.on_event(FeedEvent::SortChanged { online: true });

        assert_eq!(actions[0], FeedAction::Cancel { request: pending });
        assert_eq!(fetched(&actions).1, 0);
        assert!(state.items().is_empty());
        assert_eq!(state.next_page(), 0);
    }

    #[test]
    fn sort_change_offline_reads_snapshot() {
        let mut state = FeedState::new(PAGE);
        refreshed(&mut state, page(0..40));

        let actions = state.on_event(FeedEvent::SortChanged { online: false });
        assert!(matches!(actions.as_slice(), [FeedAction::ReadSnapshot { .. }]));
    }

    #[test]
    fn teardown_cancels_in_flight() {
        let mut state = FeedState::new(PAGE);
        let (request, _) = fetched(&state.on_event(FeedEvent::RefreshRequested { online: true }));

        let actions = state.on_event(FeedEvent::TornDown);

        assert_eq!(actions, vec![FeedAction::Cancel { request }]);
        assert!(!state.is_loading());

        let late = state.on_event(FeedEvent::PageLoaded {
            request,
            records: page(0..40),
        });
        assert!(late.is_empty());
        assert!(state.items().is_empty());
    }

    #[test]
    fn teardown_when_idle_is_safe() {
        let mut state = FeedState::new(PAGE);
        assert!(state.on_event(FeedEvent::TornDown).is_empty());
        assert!(state.on_event(FeedEvent::TornDown).is_empty());
    }

    #[test]
    fn items_never_contain_duplicate_ids() {
        let mut state = FeedState::new(4);
        let pages = [page(0..4), page(2..6), page(5..9), page(0..2)];

        refreshed(&mut state, pages[0].clone());
        for records in pages.iter().skip(1) {
            let actions = state.on_event(FeedEvent::LoadMoreRequested);
            let Some((request, _)) = actions.iter().find_map(|a| match a {
                FeedAction::FetchPage { request, page } => Some((*request, *page)),
                _ => None,
            }) else {
                break;
            };
            state.on_event(FeedEvent::PageLoaded {
                request,
                records: records.clone(),
            });
            let unique: HashSet<_> = state.items().iter().map(|r| r.id).collect();
            assert_eq!(unique.len(), state.items().len());
        }

        let ids: Vec<u64> = state.items().iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn matching_filters_items_in_order() {
        let mut items = page(0..4);
        items[1].caption = Some("Beach".into());
        items[3].note = Some("beach party".into());
        let view = FeedSnapshot {
            items,
            ..FeedSnapshot::default()
        };

        let ids: Vec<u64> = view.matching("BEACH").iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(view.matching("").len(), 4);
    }
}
