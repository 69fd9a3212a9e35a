use chrono::{DateTime, Utc};
use maud::{html, Markup};

use crate::api::Post;
use crate::feed::ViewMode;
use crate::util::{
    format_number, format_relative_time, strip_control_chars, truncate_words, validate_link,
};

/// Shown in place of an empty post body.
pub const EMPTY_BODY_PLACEHOLDER: &str = "No content available";

/// Character limits applied when rendering a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLimits {
    pub title: usize,
    pub grid_body: usize,
    pub list_body: usize,
}

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            title: 100,
            grid_body: 300,
            list_body: 1500,
        }
    }
}

impl RenderLimits {
    /// Body limit for a view mode.
    pub fn body(&self, mode: ViewMode) -> usize {
        match mode {
            ViewMode::Grid => self.grid_body,
            ViewMode::List => self.list_body,
        }
    }
}

/// Renders post cards.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    limits: RenderLimits,
}

impl Renderer {
    pub fn new(limits: RenderLimits) -> Self {
        Self { limits }
    }

    pub fn render_post(&self, post: &Post, mode: ViewMode) -> Markup {
        self.render_post_at(post, mode, Utc::now())
    }

    /// Renders one card with timestamps relative to `now`.
    ///
    /// Every piece of post text goes through maud's escaping, so markup in
    /// titles or bodies is shown literally. The "View Post" link is only
    /// emitted for http(s) URLs.
    pub fn render_post_at(&self, post: &Post, mode: ViewMode, now: DateTime<Utc>) -> Markup {
        let title = strip_control_chars(&post.title);
        let title = truncate_words(&title, self.limits.title);

        let body = post
            .selftext
            .as_deref()
            .map(strip_control_chars)
            .filter(|text| !text.trim().is_empty())
            .map(|text| truncate_words(&text, self.limits.body(mode)).into_owned())
            .unwrap_or_else(|| EMPTY_BODY_PLACEHOLDER.to_string());

        let link = validate_link(&post.url).ok();

        html! {
            div.post-card data-post-id=(post.id) {
                div.post-content {
                    h3.post-title { (&*title) }
                    div.post-meta {
                        span.subreddit { "r/" (post.subreddit) }
                        span.author { "u/" (post.author) }
                        span.post-time { (format_relative_time(post.created_utc, now)) }
                    }
                    div.post-preview.list-view[mode == ViewMode::List] { (body) }
                    div.post-stats {
                        span.score { (format_number(post.score)) " points" }
                        span.comments { (format_number(post.num_comments)) " comments" }
                    }
                }
                div.post-actions {
                    @if let Some(link) = link {
                        a.btn.btn-primary href=(link.as_str()) target="_blank" rel="noopener noreferrer" {
                            "View Post"
                        }
                    }
                }
            }
        }
    }
}
