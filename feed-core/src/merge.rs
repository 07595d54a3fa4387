//! Id-based merging of pages into the list.
//!
//! The remote contract does not promise that pages are disjoint, so every
//! merge keys on [`ImageId`]. The first occurrence of an id wins and arrival
//! order is preserved.

use std::collections::HashSet;

use feed_types::{ImageId, ImageRecord};

/// Remove later duplicates from `records`, keeping the first occurrence.
pub fn dedup_by_id(records: Vec<ImageRecord>) -> Vec<ImageRecord> {
    let mut seen: HashSet<ImageId> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.id))
        .collect()
}

/// Append `incoming` to `items`, skipping ids already present.
///
/// Returns the number of records actually appended.
pub fn append_unique(items: &mut Vec<ImageRecord>, incoming: Vec<ImageRecord>) -> usize {
    let mut seen: HashSet<ImageId> = items.iter().map(|record| record.id).collect();
    let before = items.len();
    items.extend(incoming.into_iter().filter(|record| seen.insert(record.id)));
    items.len() - before
}
