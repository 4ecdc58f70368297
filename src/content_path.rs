/// Content-path extraction logic for the environment switcher
use regex::Regex;
use std::sync::OnceLock;

/// Extract the AEM content path from an author, preview, or publish URL
///
/// Algorithm:
/// 1. Percent-decode the URL (malformed escapes → empty result)
/// 2. Strip everything up through the first editor marker:
///    "editor.html" or "cf#", whichever appears first in the string
/// 3. Strip any query string or fragment
/// 4. Return the first "/content/....html" segment, or "" if none
///
/// Examples:
/// - https://author.example.com/ui#/aem/editor.html/content/we-retail/us/en.html
///   → /content/we-retail/us/en.html
/// - https://www.example.com/content/we-retail/us/en.html?x=1
///   → /content/we-retail/us/en.html
/// - https://www.example.com/about → "" (not a content page)
pub fn extract_content_path(url: &str) -> String {
    let Some(decoded) = percent_decode(url) else {
        return String::new();
    };

    let after_marker = strip_editor_prefix(&decoded);

    // Drop query string and fragment
    let clean = after_marker
        .find(['?', '#'])
        .map_or(after_marker, |i| &after_marker[..i]);

    content_path_re()
        .find(clean)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn content_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/content/[^?#]*?\.html").unwrap())
}

/// Strip the prefix up through the first occurrence of "editor.html" or
/// "cf#". When both markers appear, the earliest one in the string wins.
fn strip_editor_prefix(url: &str) -> &str {
    const MARKERS: [&str; 2] = ["editor.html", "cf#"];

    MARKERS
        .iter()
        .filter_map(|m| url.find(m).map(|start| (start, start + m.len())))
        .min_by_key(|(start, _)| *start)
        .map_or(url, |(_, end)| &url[end..])
}

/// Decode %XX escapes. Returns None on a truncated or non-hex escape or
/// when the decoded bytes are not valid UTF-8, mirroring how
/// decodeURIComponent throws on malformed input.
fn percent_decode(input: &str) -> Option<String> {
    if !input.contains('%') {
        return Some(input.to_string());
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = hex_value(*bytes.get(i + 1)?)?;
            let lo = hex_value(*bytes.get(i + 2)?)?;
            out.push(hi << 4 | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).ok()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_author_url() {
        assert_eq!(
            extract_content_path(
                "https://author.example.com/ui#/aem/editor.html/content/we-retail/us/en/products.html"
            ),
            "/content/we-retail/us/en/products.html"
        );
    }

    #[test]
    fn test_extract_from_publish_url() {
        assert_eq!(
            extract_content_path("https://www.example.com/content/we-retail/us/en.html"),
            "/content/we-retail/us/en.html"
        );
    }

    #[test]
    fn test_extract_strips_query_and_fragment() {
        assert_eq!(
            extract_content_path(
                "https://author.example.com/editor.html/content/site/page.html?wcmmode=disabled"
            ),
            "/content/site/page.html"
        );
        assert_eq!(
            extract_content_path("https://www.example.com/content/site/page.html#section"),
            "/content/site/page.html"
        );
    }

    #[test]
    fn test_extract_from_content_fragment_url() {
        assert_eq!(
            extract_content_path("https://author.example.com/cf#/content/dam/frag.html"),
            "/content/dam/frag.html"
        );
    }

    #[test]
    fn test_earliest_marker_wins() {
        // "cf#" appears before "editor.html"; the prefix strip stops at the
        // first marker, so "editor.html" survives into the path scan
        assert_eq!(
            extract_content_path(
                "https://a.example.com/cf#/x/editor.html/content/site/page.html"
            ),
            "/content/site/page.html"
        );
    }

    #[test]
    fn test_extract_percent_encoded() {
        assert_eq!(
            extract_content_path(
                "https://www.example.com/content/we%2Dretail/us/en.html"
            ),
            "/content/we-retail/us/en.html"
        );
    }

    #[test]
    fn test_malformed_percent_escape_returns_empty() {
        assert_eq!(
            extract_content_path("https://www.example.com/content/%zz/page.html"),
            ""
        );
        assert_eq!(extract_content_path("https://www.example.com/content/a.html%2"), "");
    }

    #[test]
    fn test_first_html_match_wins() {
        assert_eq!(
            extract_content_path(
                "https://www.example.com/content/site/a.html/content/site/b.html"
            ),
            "/content/site/a.html"
        );
    }

    #[test]
    fn test_no_content_path() {
        assert_eq!(extract_content_path("https://www.example.com/about"), "");
        assert_eq!(extract_content_path("https://www.google.com/search?q=aem"), "");
        assert_eq!(extract_content_path(""), "");
        assert_eq!(extract_content_path("chrome://extensions"), "");
    }

    #[test]
    fn test_path_must_end_in_html() {
        assert_eq!(
            extract_content_path("https://www.example.com/content/site/page.pdf"),
            ""
        );
    }
}
