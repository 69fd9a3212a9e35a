//! In-memory model of the feed's page elements.
//!
//! Stands in for the DOM: the posts container with its layout class and
//! rendered cards, the error banner, the "no posts" notice, the loading
//! indicator, and the active view toggle. [`crate::render::render_page`]
//! turns it into HTML.

use maud::Markup;

use super::ViewMode;

/// A rendered card plus the id of the post it came from.
#[derive(Debug, Clone)]
pub struct RenderedPost {
    pub id: String,
    pub markup: Markup,
}

#[derive(Debug, Clone, Default)]
pub struct FeedView {
    mode: ViewMode,
    items: Vec<RenderedPost>,
    error_message: Option<String>,
    notice: Option<String>,
    loading: bool,
}

impl FeedView {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// The toggle button currently marked active. Always tracks the layout.
    pub fn active_button(&self) -> ViewMode {
        self.mode
    }

    pub fn container_class(&self) -> &'static str {
        self.mode.container_class()
    }

    /// Switches the layout. Cards are not touched; callers re-render them.
    pub(crate) fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn items(&self) -> &[RenderedPost] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last_item_id(&self) -> Option<&str> {
        self.items.last().map(|item| item.id.as_str())
    }

    pub(crate) fn append(&mut self, items: impl IntoIterator<Item = RenderedPost>) {
        self.items.extend(items);
    }

    pub(crate) fn replace_all(&mut self, items: Vec<RenderedPost>) {
        self.items = items;
    }

    /// Empties the container and hides banners, as a new search does.
    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.error_message = None;
        self.notice = None;
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub(crate) fn show_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    pub(crate) fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub(crate) fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maud::html;

    fn item(id: &str) -> RenderedPost {
        RenderedPost {
            id: id.to_string(),
            markup: html! { div { (id) } },
        }
    }

    #[test]
    fn test_mode_drives_class_and_button() {
        let mut view = FeedView::new(ViewMode::Grid);
        assert_eq!(view.container_class(), "posts-grid");
        view.set_mode(ViewMode::List);
        assert_eq!(view.container_class(), "posts-list");
        assert_eq!(view.active_button(), ViewMode::List);
    }

    #[test]
    fn test_clear_resets_content_but_not_mode() {
        let mut view = FeedView::new(ViewMode::List);
        view.append([item("a"), item("b")]);
        view.show_error("boom".to_string());
        view.set_notice("nothing here");
        assert_eq!(view.last_item_id(), Some("b"));

        view.clear();
        assert!(view.is_empty());
        assert!(view.error_message().is_none());
        assert!(view.notice().is_none());
        assert_eq!(view.mode(), ViewMode::List);
    }
}
