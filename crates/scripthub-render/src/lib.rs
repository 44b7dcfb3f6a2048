//! HTML rendering for feed cards and the static pages.
//!
//! Everything here is a pure function from domain values to markup. All
//! user-supplied text goes through [`escape_html`] / [`escape_attr`] before it
//! reaches a page; icon URLs additionally go through [`sanitize_url`].

pub mod card;
pub mod pages;

use chrono::{DateTime, Utc};
use url::Url;

/// Feed cards hard-cut code previews at this many characters.
pub const FEED_PREVIEW_CHARS: usize = 600;

/// Profile cards and the post-page live preview use the shorter cut.
pub const PROFILE_PREVIEW_CHARS: usize = 400;

const TRUNCATION_MARKER: &str = "\n\n... (truncated)";

/// Escape text for element content.
pub fn escape_html(s: &str) -> String {
    html_escape::encode_text(s).into_owned()
}

/// Escape text for a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).into_owned()
}

/// Accept only absolute http(s) URLs for icon images; anything else renders
/// as the placeholder glyph instead.
pub fn sanitize_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    match parsed.scheme() {
        "http" | "https" => Some(parsed.to_string()),
        _ => None,
    }
}

/// Hard cutoff at `limit` characters with a marker appended. Character-based,
/// not byte-based, so multi-byte code bodies never split mid-char.
pub fn truncate_code(code: &str, limit: usize) -> String {
    if code.chars().count() <= limit {
        return code.to_string();
    }
    let mut out: String = code.chars().take(limit).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}

pub fn format_timestamp(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_cuts_at_exactly_the_limit() {
        let code = "x".repeat(1000);
        let preview = truncate_code(&code, FEED_PREVIEW_CHARS);
        assert!(preview.ends_with(TRUNCATION_MARKER));
        let body = preview.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(body.chars().count(), 600);
    }

    #[test]
    fn truncate_leaves_short_code_alone() {
        assert_eq!(truncate_code("short", 600), "short");
        let exact = "y".repeat(600);
        assert_eq!(truncate_code(&exact, 600), exact);
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        let code = "é".repeat(700);
        let preview = truncate_code(&code, 600);
        let body = preview.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(body.chars().count(), 600);
    }

    #[test]
    fn escape_neutralizes_markup() {
        let escaped = escape_html("<script>alert(1)</script>");
        assert!(!escaped.contains('<'));
        assert!(escaped.contains("&lt;script&gt;"));
    }

    #[test]
    fn sanitize_url_rejects_non_http() {
        assert!(sanitize_url("https://example.com/icon.png").is_some());
        assert!(sanitize_url("http://example.com/a").is_some());
        assert!(sanitize_url("javascript:alert(1)").is_none());
        assert!(sanitize_url("not a url").is_none());
        assert!(sanitize_url("/relative/path.png").is_none());
    }
}
