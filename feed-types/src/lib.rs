//! # feed-types
//!
//! Wire format types for the gallery feed sync core.
//!
//! This crate provides the foundational types used across all feed crates:
//! - [`ImageId`] - Identity of a remote image record
//! - [`ImageRecord`] - One entry of a remote `image_list`
//! - [`PageRequest`], [`SortParams`] - What to ask the remote service for
//! - [`PageEnvelope`] - The fixed-shape response of one page fetch
//! - [`TypesError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod envelope;
mod error;
mod ids;
mod record;
mod request;

pub use envelope::{PageData, PageEnvelope};
pub use error::TypesError;
pub use ids::ImageId;
pub use record::ImageRecord;
pub use request::{PageRequest, SortDirection, SortField, SortParams};
