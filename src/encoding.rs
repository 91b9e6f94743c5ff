//! Charset sniffing for pages and fetched fragments.
//!
//! Authored pages are UTF-8 almost always, but fragments served from older
//! content stores sometimes declare a legacy charset. Both `decorate_bytes`
//! and the directory fetcher funnel raw bytes through [`decode_html`].

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

/// `<meta charset="...">` or the charset parameter of an http-equiv content type.
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([A-Za-z0-9_:.\-]+)"#).expect("META_CHARSET regex")
});

/// Bytes inspected when looking for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// Find the declared encoding of an HTML document, defaulting to UTF-8.
#[must_use]
pub fn sniff_encoding(html: &[u8]) -> &'static Encoding {
    if html.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return UTF_8;
    }
    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LEN)]);
    META_CHARSET
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode HTML bytes into a UTF-8 string.
///
/// Invalid sequences become U+FFFD instead of failing.
#[must_use]
pub fn decode_html(html: &[u8]) -> String {
    let encoding = sniff_encoding(html);
    if encoding == UTF_8 {
        let body = html.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(html);
        return String::from_utf8_lossy(body).into_owned();
    }
    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_the_default() {
        assert_eq!(sniff_encoding(b"<p>plain</p>"), UTF_8);
    }

    #[test]
    fn meta_charset_is_honoured() {
        let html = b"<html><head><meta charset=\"windows-1252\"></head><body>Caf\xE9</body></html>";
        assert_eq!(sniff_encoding(html).name(), "windows-1252");
        assert!(decode_html(html).contains("Café"));
    }

    #[test]
    fn http_equiv_charset_is_honoured() {
        let html = b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=ISO-8859-1\"><p>\xFCber</p>";
        assert!(decode_html(html).contains("über"));
    }

    #[test]
    fn bom_is_stripped() {
        let html = b"\xEF\xBB\xBF<p>x</p>";
        assert_eq!(decode_html(html), "<p>x</p>");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let html = b"<p>\xFF</p>";
        assert!(decode_html(html).contains('\u{FFFD}'));
    }
}
