use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::api::SearchParams;
use crate::feed::{FeedView, ViewMode};

/// Inline CSS for the standalone page.
///
/// Grid cards flow in columns; list cards span the container.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.5;color:#1a1a1b;background:#dae0e6;padding:1.5rem}
.search-container{display:flex;gap:.5rem;margin-bottom:1rem}
.search-container input{flex:1;padding:.5rem;border:1px solid #ccc;border-radius:6px}
.view-toggle{display:flex;gap:.25rem;margin-bottom:1rem}
.view-toggle button{padding:.35rem .8rem;border:1px solid #ccc;background:#fff;border-radius:6px}
.view-toggle button.active{background:#ff4500;color:#fff;border-color:#ff4500}
.error-message{padding:.75rem;margin-bottom:1rem;background:#fde8e8;color:#9b1c1c;border-radius:6px}
.posts-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(300px,1fr));gap:1rem}
.posts-list{display:flex;flex-direction:column;gap:1rem}
.post-card{background:#fff;border-radius:8px;padding:1rem;display:flex;flex-direction:column;justify-content:space-between}
.post-title{font-size:1.05rem;margin-bottom:.35rem}
.post-meta{display:flex;gap:.75rem;font-size:.8rem;color:#787c7e;margin-bottom:.5rem}
.post-preview{white-space:pre-wrap;overflow-wrap:anywhere;margin-bottom:.5rem}
.post-stats{display:flex;gap:1rem;font-size:.8rem;color:#787c7e}
.post-actions{margin-top:.75rem}
.btn-primary{color:#0079d3;text-decoration:none;font-weight:600}
.no-posts-message{padding:2rem;text-align:center;color:#787c7e}
.loading-indicator{display:flex;justify-content:center;padding:1rem;color:#787c7e}
.sentinel{height:1px}
"#;

/// Renders the full page around the feed's current state.
///
/// The sentinel is only present while more pages remain.
pub fn render_page(view: &FeedView, search: &SearchParams, has_more: bool) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Post feed" }
                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                form #searchForm.search-container method="get" action="" {
                    input #searchQuery type="text" name="query" placeholder="Search posts" value=(search.query);
                    input #subreddit type="text" name="subreddit" placeholder="r/subreddit" value=(search.subreddit);
                    button type="submit" { "Search" }
                }
                div.view-toggle {
                    @for mode in [ViewMode::Grid, ViewMode::List] {
                        button.active[view.active_button() == mode] type="button" data-view=(mode.as_str()) {
                            @match mode {
                                ViewMode::Grid => { "Grid" }
                                ViewMode::List => { "List" }
                            }
                        }
                    }
                }
                @if let Some(error) = view.error_message() {
                    div #error-message.error-message { (error) }
                }
                div #posts-container class=(view.container_class()) {
                    @for item in view.items() {
                        (item.markup)
                    }
                    @if let Some(notice) = view.notice() {
                        div.no-posts-message { (notice) }
                    }
                }
                @if view.is_loading() {
                    div #loading-indicator.loading-indicator { "Loading..." }
                }
                @if has_more && !view.is_empty() {
                    div #feed-sentinel.sentinel {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::RenderedPost;

    /// The opening tag of the toggle button for `view`.
    fn button_tag<'a>(html: &'a str, view: &str) -> &'a str {
        let attr = format!(r#"data-view="{}""#, view);
        let at = html.find(&attr).unwrap();
        let start = html[..at].rfind('<').unwrap();
        let end = at + html[at..].find('>').unwrap();
        &html[start..end]
    }

    fn view_with_items(mode: ViewMode) -> FeedView {
        let mut view = FeedView::new(mode);
        view.append([RenderedPost {
            id: "a".to_string(),
            markup: html! { div.post-card { "card a" } },
        }]);
        view
    }

    #[test]
    fn test_container_and_active_button() {
        let html = render_page(&view_with_items(ViewMode::List), &SearchParams::default(), true)
            .into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"id="posts-container""#));
        assert!(html.contains(r#"class="posts-list""#));
        assert!(button_tag(&html, "list").contains("active"));
        assert!(!button_tag(&html, "grid").contains("active"));
        assert!(html.contains("card a"));
        assert!(html.contains("feed-sentinel"));
    }

    #[test]
    fn test_element_ids() {
        let mut view = view_with_items(ViewMode::Grid);
        view.show_error("boom".to_string());
        view.set_loading(true);
        let html = render_page(&view, &SearchParams::default(), true).into_string();
        for id in [
            "searchForm",
            "searchQuery",
            "subreddit",
            "error-message",
            "posts-container",
            "loading-indicator",
            "feed-sentinel",
        ] {
            assert!(html.contains(&format!(r#"id="{}""#, id)), "missing id {}", id);
        }
    }

    #[test]
    fn test_no_sentinel_when_exhausted() {
        let html = render_page(&view_with_items(ViewMode::Grid), &SearchParams::default(), false)
            .into_string();
        assert!(!html.contains("feed-sentinel"));
    }

    #[test]
    fn test_banners_and_search_values_escaped() {
        let mut view = FeedView::new(ViewMode::Grid);
        view.show_error("Error loading posts: <b>bad</b>".to_string());
        view.set_notice("nothing");
        view.set_loading(true);
        let search = SearchParams::new("\"><script>", "rust");

        let html = render_page(&view, &search, true).into_string();
        assert!(html.contains("Error loading posts: &lt;b&gt;bad&lt;/b&gt;"));
        assert!(html.contains("no-posts-message"));
        assert!(html.contains("loading-indicator"));
        assert!(!html.contains("<script>"));
    }
}
