//! Original post records for everything currently displayed.
//!
//! Re-rendering (for example after a view mode switch) always starts from
//! these records, never from rendered markup, so text truncated for one
//! mode is restored in full for the next.

use std::collections::HashMap;

use crate::api::Post;

/// Insertion-ordered post store keyed by post id.
#[derive(Debug, Clone, Default)]
pub struct PostCache {
    order: Vec<String>,
    posts: HashMap<String, Post>,
}

impl PostCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a post. Returns `false` (and keeps the existing record) when the
    /// id is already cached.
    pub fn insert(&mut self, post: Post) -> bool {
        if self.posts.contains_key(&post.id) {
            return false;
        }
        self.order.push(post.id.clone());
        self.posts.insert(post.id.clone(), post);
        true
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.get(id)
    }

    /// Posts in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Post> + '_ {
        self.order.iter().filter_map(|id| self.posts.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.posts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, title: &str) -> Post {
        Post {
            id: id.to_string(),
            title: title.to_string(),
            subreddit: "rust".to_string(),
            author: "ferris".to_string(),
            selftext: None,
            score: 0,
            num_comments: 0,
            url: format!("https://example.com/{}", id),
            created_utc: None,
        }
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut cache = PostCache::new();
        cache.insert(post("b", "second"));
        cache.insert(post("a", "first"));
        let ids: Vec<&str> = cache.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_id_keeps_original() {
        let mut cache = PostCache::new();
        assert!(cache.insert(post("a", "original")));
        assert!(!cache.insert(post("a", "replacement")));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").unwrap().title, "original");
    }

    #[test]
    fn test_clear() {
        let mut cache = PostCache::new();
        cache.insert(post("a", "x"));
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("a").is_none());
    }
}
