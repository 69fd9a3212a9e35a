//! Layout modes for the post container.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// How posts are laid out.
///
/// The mode decides both the container class and how much body text each
/// card shows: grid cards are previews, list cards show most of the post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    /// CSS class applied to the posts container.
    pub fn container_class(self) -> &'static str {
        match self {
            ViewMode::Grid => "posts-grid",
            ViewMode::List => "posts-list",
        }
    }

    /// Value of the toggle button's `data-view` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    /// Picks the starting mode for a viewport.
    ///
    /// Narrow viewports (at or below `narrow_width` pixels) start in list
    /// mode; wider ones use `preferred`.
    pub fn for_viewport_width(width: u32, narrow_width: u32, preferred: ViewMode) -> ViewMode {
        if width <= narrow_width {
            ViewMode::List
        } else {
            preferred
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(ViewMode::Grid),
            "list" => Ok(ViewMode::List),
            other => Err(format!("unknown view mode '{}' (expected grid or list)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_classes() {
        assert_eq!(ViewMode::Grid.container_class(), "posts-grid");
        assert_eq!(ViewMode::List.container_class(), "posts-list");
    }

    #[test]
    fn test_narrow_viewport_prefers_list() {
        assert_eq!(ViewMode::for_viewport_width(800, 1064, ViewMode::Grid), ViewMode::List);
        assert_eq!(ViewMode::for_viewport_width(1064, 1064, ViewMode::Grid), ViewMode::List);
        assert_eq!(ViewMode::for_viewport_width(1440, 1064, ViewMode::Grid), ViewMode::Grid);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Grid".parse::<ViewMode>(), Ok(ViewMode::Grid));
        assert_eq!(" list ".parse::<ViewMode>(), Ok(ViewMode::List));
        assert!("table".parse::<ViewMode>().is_err());
    }
}
