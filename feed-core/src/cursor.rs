//! Pagination cursor for the gallery feed.
//!
//! The cursor tracks which page to request next and whether the remote
//! collection may still have more records. The remote never says so
//! explicitly: a page that comes back full-sized implies another page
//! may follow, a short page means the collection is exhausted.

/// Tracks the next page index and the "more available" signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    /// Index of the next page to request.
    next: u32,
    /// Whether another page may exist.
    has_more: bool,
    /// Configured page size; a page of exactly this many records is full.
    page_size: u32,
}

impl PageCursor {
    /// Create a cursor at page 0. A zero page size is raised to 1.
    ///
    /// A fresh cursor assumes more data is available until a page says
    /// otherwise.
    pub fn new(page_size: u32) -> Self {
        Self {
            next: 0,
            has_more: true,
            page_size: page_size.max(1),
        }
    }

    /// Index of the next page to request.
    pub fn next_page(&self) -> u32 {
        self.next
    }

    /// Whether another page may exist.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Configured page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Whether a page of `len` records is full-sized.
    pub fn is_full_page(&self, len: usize) -> bool {
        len == self.page_size as usize
    }

    /// Record that page 0 replaced the list.
    pub fn restart(&mut self, returned: usize) {
        self.next = 1;
        self.has_more = self.is_full_page(returned);
    }

    /// Record that the page at `next_page()` was appended.
    pub fn advance(&mut self, returned: usize) {
        self.next = self.next.saturating_add(1);
        self.has_more = self.is_full_page(returned);
    }

    /// Stop pagination; used when the list came from the local snapshot.
    pub fn exhaust(&mut self) {
        self.has_more = false;
    }

    /// Return to page 0 for a new session.
    pub fn reset(&mut self) {
        self.next = 0;
        self.has_more = true;
    }
}
