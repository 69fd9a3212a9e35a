//! Listing backend access.
//!
//! - [`types`] - canonical [`Post`] records and the lenient wire shapes they
//!   are normalized from
//! - [`client`] - [`FeedClient`], the HTTP side: paginated search, scrape
//!   requests, and diagnostics probes
//!
//! # Endpoint contract
//!
//! ```text
//! GET  {base}/search?query=&subreddit=&page=&per_page=
//!      -> { "posts": [...], "pages": N, "current_page": N, "error"?: "..." }
//! POST {base}/scrape  { "subreddit": "...", "max_pages": N }
//! ```

mod client;
mod types;

pub use client::{FeedClient, FetchError};
pub use types::{normalize_subreddit, PageRequest, Post, PostPage, ScrapeRequest, SearchParams};
