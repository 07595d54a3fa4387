//! # feed-core
//!
//! Pure logic for the gallery feed (no I/O, instant tests).
//!
//! This crate implements the list state machine and the algorithms around
//! it without any network or disk I/O, enabling fast unit tests.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about which results may still touch the list
//!
//! The actual I/O (network, key-value store) is performed by `feed-client`,
//! which interprets the actions produced by [`FeedState`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backoff;
pub mod cursor;
pub mod merge;
pub mod state;

pub use backoff::RetryPolicy;
pub use cursor::PageCursor;
pub use merge::{append_unique, dedup_by_id};
pub use state::{FeedAction, FeedEvent, FeedSnapshot, FeedState, LoadError, RequestId};
