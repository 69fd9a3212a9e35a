//! The post feed: pagination, infinite scroll, and view switching.
//!
//! - [`controller`] - [`PostFeedController`], which owns everything below
//!   and runs the search → fetch → render → re-arm cycle
//! - [`pagination`] - page counter, in-flight flag, has-more flag, and the
//!   generation stamp that marks stale responses
//! - [`trigger`] - [`ScrollTrigger`], the visibility event source
//! - [`cache`] - original post records used for re-rendering
//! - [`view`] / [`view_mode`] - the page model and its two layouts
//!
//! # Example
//!
//! ```ignore
//! let mut feed = PostFeedController::new(client, FeedSettings::default(), ViewMode::Grid);
//! feed.search(SearchParams::new("async", "rust"));
//! feed.settle().await;
//!
//! // The sentinel scrolled into view
//! feed.report_visibility(&[Intersection::new(TriggerTarget::Sentinel, 1.0)]);
//! if let Some(event) = feed.next_event().await {
//!     feed.handle_event(event);
//! }
//! feed.settle().await;
//! ```

mod cache;
mod controller;
mod pagination;
mod trigger;
mod view;
mod view_mode;

pub use cache::PostCache;
pub use controller::{FeedEvent, FeedSettings, LoadOutcome, PostFeedController, NO_POSTS_NOTICE};
pub use pagination::{ErrorPolicy, PageTicket, PaginationState};
pub use trigger::{Intersection, ScrollTrigger, TargetKind, TriggerTarget};
pub use view::{FeedView, RenderedPost};
pub use view_mode::ViewMode;
