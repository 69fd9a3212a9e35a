use std::borrow::Cow;

use chrono::{DateTime, Utc};

/// Marker appended to text that was cut short.
pub const ELLIPSIS: &str = "...";

/// Truncates text at a character limit without splitting a word.
///
/// Text of at most `limit` characters is returned unchanged (borrowed).
/// Longer text is cut at `limit` characters; if the cut lands inside a
/// word, that partial word is dropped. The remaining words are joined with
/// single spaces and [`ELLIPSIS`] is appended.
///
/// Limits count Unicode scalar values, not bytes, so multi-byte text is
/// never sliced mid-codepoint.
///
/// # Examples
///
/// ```
/// use postfeed::util::truncate_words;
///
/// assert_eq!(truncate_words("short text", 100), "short text");
/// assert_eq!(truncate_words("hello wonderful world", 12), "hello...");
/// assert_eq!(truncate_words("hello wonderful world", 15), "hello wonderful...");
/// ```
pub fn truncate_words(s: &str, limit: usize) -> Cow<'_, str> {
    let Some((cut, next)) = s.char_indices().nth(limit) else {
        return Cow::Borrowed(s);
    };

    let head = &s[..cut];
    let mut words: Vec<&str> = head.split_whitespace().collect();

    // The last word is whole only if the cut sits on whitespace.
    let on_boundary = next.is_whitespace() || head.ends_with(char::is_whitespace);
    if !on_boundary {
        words.pop();
    }

    let mut out = words.join(" ");
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

/// Formats an engagement count compactly.
///
/// - `>= 1_000_000` → one decimal and `M` (`2500000` → `2.5M`)
/// - `>= 1_000` → one decimal and `K` (`1500` → `1.5K`)
/// - anything else → the plain integer (`0` → `"0"`, `-12` → `"-12"`)
pub fn format_number(n: i64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Formats a Unix timestamp (seconds) relative to `now`.
///
/// Missing or zero timestamps render as `unknown`. Anything older than
/// thirty days falls back to a calendar date.
pub fn format_relative_time(created_utc: Option<f64>, now: DateTime<Utc>) -> String {
    let ts = match created_utc {
        Some(ts) if ts > 0.0 && ts.is_finite() => ts,
        _ => return "unknown".to_string(),
    };

    let diff = now.timestamp() as f64 - ts;
    if diff < 60.0 {
        return "just now".to_string();
    }
    if diff < 3_600.0 {
        return format!("{}m ago", (diff / 60.0).floor() as i64);
    }
    if diff < 86_400.0 {
        return format!("{}h ago", (diff / 3_600.0).floor() as i64);
    }
    if diff < 2_592_000.0 {
        return format!("{}d ago", (diff / 86_400.0).floor() as i64);
    }

    match DateTime::<Utc>::from_timestamp(ts as i64, 0) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "unknown".to_string(),
    }
}

/// Removes control characters from untrusted post text.
///
/// Tab, newline and carriage return are kept. Returns `Cow::Borrowed`
/// when nothing needs removing, which is the common case.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let is_stripped = |c: char| c.is_control() && !matches!(c, '\t' | '\n' | '\r');

    if !s.chars().any(is_stripped) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|&c| !is_stripped(c)).collect())
}
