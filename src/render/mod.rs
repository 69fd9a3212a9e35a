//! HTML rendering for post cards and the feed page.
//!
//! Markup is built with maud, which escapes every interpolated value.
//! Post titles, bodies, authors and subreddits come from untrusted listing
//! data and are never emitted raw.

mod card;
mod page;

pub use card::{RenderLimits, Renderer, EMPTY_BODY_PLACEHOLDER};
pub use page::{render_page, PAGE_CSS};
