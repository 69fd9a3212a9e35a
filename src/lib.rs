//! Post feed view layer: paginated fetching, card rendering, view-mode
//! switching, and visibility-driven infinite scroll over a Reddit-style
//! listing backend.

pub mod api;
pub mod config;
pub mod feed;
pub mod render;
pub mod util;
