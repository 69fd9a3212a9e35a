use thiserror::Error;
use url::Url;

/// Reasons a post link is refused as an anchor target.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The link could not be parsed as an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The link uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// Validates a post link before it is placed in an `href`.
///
/// Post URLs come from untrusted listing data, so anything that is not
/// plain `http`/`https` (`javascript:`, `data:`, `file:`) is rejected.
///
/// # Examples
///
/// ```
/// use postfeed::util::validate_link;
///
/// assert!(validate_link("https://www.reddit.com/r/rust/comments/abc").is_ok());
/// assert!(validate_link("javascript:alert(1)").is_err());
/// ```
pub fn validate_link(url_str: &str) -> Result<Url, LinkError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(LinkError::UnsupportedScheme(scheme.to_owned())),
    }
}

/// Canonical permalink for a post when the listing omits its URL.
pub fn reddit_permalink(subreddit: &str, id: &str) -> String {
    format!("https://www.reddit.com/r/{}/comments/{}", subreddit, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_links() {
        assert!(validate_link("https://example.com/post").is_ok());
        assert!(validate_link("http://i.redd.it/abc.png").is_ok());
    }

    #[test]
    fn test_script_schemes_rejected() {
        assert!(matches!(
            validate_link("javascript:alert(1)"),
            Err(LinkError::UnsupportedScheme(_))
        ));
        assert!(validate_link("data:text/html,<b>x</b>").is_err());
        assert!(validate_link("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_relative_link_rejected() {
        assert!(matches!(
            validate_link("/r/rust/comments/abc"),
            Err(LinkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_permalink_shape() {
        assert_eq!(
            reddit_permalink("rust", "1abcd"),
            "https://www.reddit.com/r/rust/comments/1abcd"
        );
    }
}
