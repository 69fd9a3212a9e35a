//! Utility functions shared by the fetcher and the renderer.
//!
//! - **Text**: word-boundary truncation, compact number and relative-time
//!   formatting, control character stripping
//! - **Links**: scheme validation for untrusted post URLs
//!
//! # Examples
//!
//! ```
//! use postfeed::util::{format_number, truncate_words};
//!
//! assert_eq!(format_number(1500), "1.5K");
//! assert_eq!(truncate_words("one two three", 6), "one...");
//! ```

mod links;
mod text;

pub use links::{reddit_permalink, validate_link, LinkError};
pub use text::{
    format_number, format_relative_time, strip_control_chars, truncate_words, ELLIPSIS,
};
