//! Page bookkeeping for the load-more cycle.

use serde::Deserialize;

/// What to do with `has_more` after a page fails to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop paginating until the next search.
    #[default]
    Stop,
    /// Keep `has_more`, so the next trigger retries the same page.
    Retain,
}

/// Identifies one in-flight page request.
///
/// Carried through the spawned fetch and back in the completion event so
/// the result can be matched against the search that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub page: u32,
    pub generation: u64,
}

/// Pagination state for one feed.
///
/// `current_page` is the next page to request. `has_more` only ever goes
/// from `true` to `false`; [`reset`](Self::reset) is the only way back.
/// At most one request is in flight: [`begin`](Self::begin) refuses while
/// `loading` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    current_page: u32,
    loading: bool,
    has_more: bool,
    generation: u64,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationState {
    pub fn new() -> Self {
        Self {
            current_page: 1,
            loading: false,
            has_more: true,
            generation: 0,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts over for a new search.
    ///
    /// Bumps the generation so any response still in flight for the old
    /// search is recognised as stale, and clears `loading` so the new
    /// search can start immediately.
    pub fn reset(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.current_page = 1;
        self.loading = false;
        self.has_more = true;
        self.generation
    }

    /// Claims the next page if nothing is in flight and more pages remain.
    pub fn begin(&mut self) -> Option<PageTicket> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        Some(PageTicket {
            page: self.current_page,
            generation: self.generation,
        })
    }

    /// True when `ticket` belongs to an earlier search.
    pub fn is_stale(&self, ticket: PageTicket) -> bool {
        ticket.generation != self.generation
    }

    /// Records a non-empty page. Returns the new `has_more`.
    pub fn finish_page(&mut self, total_pages: u32) -> bool {
        self.loading = false;
        self.current_page = self.current_page.saturating_add(1);
        self.has_more = self.has_more && self.current_page <= total_pages;
        self.has_more
    }

    /// Records an empty page. Pagination is over until the next reset.
    pub fn finish_empty(&mut self) {
        self.loading = false;
        self.has_more = false;
    }

    /// Records a failed page according to `policy`.
    pub fn finish_failed(&mut self, policy: ErrorPolicy) {
        self.loading = false;
        if policy == ErrorPolicy::Stop {
            self.has_more = false;
        }
    }
}
