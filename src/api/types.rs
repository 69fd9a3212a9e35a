use serde::{Deserialize, Deserializer, Serialize};

use crate::util::reddit_permalink;

// ============================================================================
// Canonical Types
// ============================================================================

/// A single post as the feed works with it.
///
/// Listing backends disagree on field presence and types (ids as numbers,
/// missing URLs, `null` counters), so every record is normalized into this
/// shape once, right after decoding. The renderer and the post cache only
/// ever see `Post`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub subreddit: String,
    pub author: String,
    /// Body text. `None` when the listing sent nothing or only whitespace.
    pub selftext: Option<String>,
    pub score: i64,
    pub num_comments: i64,
    pub url: String,
    /// Creation time as Unix seconds.
    pub created_utc: Option<f64>,
}

/// One page of results from the listing endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    /// Posts in server order.
    pub posts: Vec<Post>,
    /// Total number of pages the server reports (0 when absent).
    pub total_pages: u32,
    /// Page number echoed back by the server, if any.
    pub current_page: Option<u32>,
}

/// What the user searched for. Shared by every page of one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub subreddit: String,
}

impl SearchParams {
    pub fn new(query: impl Into<String>, subreddit: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            subreddit: subreddit.into(),
        }
    }

    /// Builds the request for a specific page of this search.
    pub fn page(&self, page: u32, per_page: u32) -> PageRequest {
        PageRequest {
            query: self.query.clone(),
            subreddit: self.subreddit.clone(),
            page,
            per_page,
        }
    }
}

/// Parameters for a single `GET /search` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: String,
    pub subreddit: String,
    /// 1-based page index.
    pub page: u32,
    pub per_page: u32,
}

/// Body of a `POST /scrape` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeRequest {
    pub subreddit: String,
    pub max_pages: u32,
}

/// Strips surrounding whitespace and a leading `r/` (or `/r/`).
pub fn normalize_subreddit(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix("/r/")
        .or_else(|| trimmed.strip_prefix("r/"))
        .unwrap_or(trimmed)
}

// ============================================================================
// Wire Types
// ============================================================================

/// Listing response as sent by the server.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPage {
    #[serde(default)]
    pub posts: Option<Vec<RawPost>>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error body for non-2xx responses. Some handlers use `details` instead of `error`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPost {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subreddit: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, alias = "content")]
    pub selftext: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub num_comments: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_utc: Option<f64>,
}

/// Accepts ids sent as strings or numbers.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl RawPost {
    /// Normalizes into a [`Post`].
    ///
    /// `fallback_key` is used as the id when the record carries neither an
    /// id nor a URL; it must be unique within one search.
    pub(crate) fn into_post(self, fallback_key: impl FnOnce() -> String) -> Post {
        let subreddit = self
            .subreddit
            .as_deref()
            .map(normalize_subreddit)
            .unwrap_or_default()
            .to_string();
        let url = non_empty(self.url);

        let id = match (self.id, &url) {
            (Some(id), _) => id,
            (None, Some(url)) => url.clone(),
            (None, None) => fallback_key(),
        };
        let url = url.unwrap_or_else(|| reddit_permalink(&subreddit, &id));

        Post {
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            selftext: non_empty(self.selftext),
            score: self.score.unwrap_or(0),
            num_comments: self.num_comments.unwrap_or(0),
            created_utc: self.created_utc,
            subreddit,
            url,
            id,
        }
    }
}

impl RawPage {
    /// Normalizes every post; `page` seeds fallback ids.
    pub(crate) fn into_page(self, page: u32) -> PostPage {
        let posts = self
            .posts
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let subreddit = raw
                    .subreddit
                    .as_deref()
                    .map(normalize_subreddit)
                    .filter(|s| !s.is_empty())
                    .unwrap_or("post")
                    .to_string();
                raw.into_post(move || format!("{}-p{}-{}", subreddit, page, index))
            })
            .collect();

        PostPage {
            posts,
            total_pages: self.pages.unwrap_or(0),
            current_page: self.current_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(json: &str) -> PostPage {
        let raw: RawPage = serde_json::from_str(json).unwrap();
        raw.into_page(1)
    }

    #[test]
    fn test_full_record_normalizes() {
        let page = decode(
            r#"{"posts":[{"id":"abc","title":"Hello","subreddit":"rust","author":"ferris",
                "selftext":"body","score":10,"num_comments":2,"url":"https://example.com/x",
                "created_utc":1700000000.0}],"pages":3,"current_page":1}"#,
        );
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, Some(1));
        assert_eq!(
            page.posts[0],
            Post {
                id: "abc".to_string(),
                title: "Hello".to_string(),
                subreddit: "rust".to_string(),
                author: "ferris".to_string(),
                selftext: Some("body".to_string()),
                score: 10,
                num_comments: 2,
                url: "https://example.com/x".to_string(),
                created_utc: Some(1_700_000_000.0),
            }
        );
    }

    #[test]
    fn test_numeric_id_and_derived_url() {
        let page = decode(r#"{"posts":[{"id":42,"title":"t","subreddit":"r/rust"}]}"#);
        let post = &page.posts[0];
        assert_eq!(post.id, "42");
        assert_eq!(post.subreddit, "rust");
        assert_eq!(post.url, "https://www.reddit.com/r/rust/comments/42");
    }

    #[test]
    fn test_missing_id_falls_back_to_url() {
        let page = decode(r#"{"posts":[{"title":"t","url":"https://example.com/p"}]}"#);
        assert_eq!(page.posts[0].id, "https://example.com/p");
    }

    #[test]
    fn test_missing_id_and_url_gets_unique_keys() {
        let page = decode(r#"{"posts":[{"title":"a","subreddit":"rust"},{"title":"b","subreddit":"rust"}]}"#);
        assert_eq!(page.posts[0].id, "rust-p1-0");
        assert_eq!(page.posts[1].id, "rust-p1-1");
    }

    #[test]
    fn test_null_and_missing_counters_default_to_zero() {
        let page = decode(r#"{"posts":[{"id":"x","score":null,"selftext":"   "}]}"#);
        assert_eq!(page.posts[0].score, 0);
        assert_eq!(page.posts[0].num_comments, 0);
        assert_eq!(page.posts[0].selftext, None);
    }

    #[test]
    fn test_content_alias_for_selftext() {
        let page = decode(r#"{"posts":[{"id":"x","content":"from content"}]}"#);
        assert_eq!(page.posts[0].selftext.as_deref(), Some("from content"));
    }

    #[test]
    fn test_missing_posts_is_empty_page() {
        let page = decode(r#"{"message":"No posts found"}"#);
        assert!(page.posts.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_normalize_subreddit() {
        assert_eq!(normalize_subreddit("  r/rust "), "rust");
        assert_eq!(normalize_subreddit("/r/rust"), "rust");
        assert_eq!(normalize_subreddit("rust"), "rust");
        assert_eq!(normalize_subreddit(""), "");
    }

    #[test]
    fn test_search_params_build_page_request() {
        let params = SearchParams::new("async", "rust");
        let req = params.page(2, 20);
        assert_eq!(req.page, 2);
        assert_eq!(req.per_page, 20);
        assert_eq!(req.query, "async");
    }
}
