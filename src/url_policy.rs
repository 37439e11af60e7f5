//! Default URL-safety rewriter for `href` and `src`.
//!
//! A deliberately small classifier: a handful of known-harmless schemes plus
//! relative references. Everything else — `javascript:`, `data:`,
//! `vbscript:`, unknown schemes — is rejected. The value arrives already
//! entity-decoded, so `java&#115;cript:` and friends are seen in the clear.

use url::{ParseError, Url};

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Accepts the value unchanged when it is a safe absolute URL or a relative
/// reference; rejects otherwise.
pub fn safe_url(value: &str) -> Option<String> {
    // The WHATWG URL parser strips tabs, newlines, and C0 controls while
    // parsing, which is exactly how `java\tscript:` sneaks past naive scheme
    // checks. Reject control characters outright instead of trusting every
    // downstream parser to strip them the same way.
    if value.chars().any(|c| c.is_ascii_control()) {
        return None;
    }
    match Url::parse(value) {
        Ok(url) => ALLOWED_SCHEMES
            .contains(&url.scheme())
            .then(|| value.to_owned()),
        // No scheme at all: a relative reference, safe by construction.
        Err(ParseError::RelativeUrlWithoutBase) => Some(value.to_owned()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_url_accepts_http_https_mailto() {
        for url in [
            "http://example.com/a?b=c",
            "https://example.com/",
            "mailto:user@example.com",
            "HTTPS://EXAMPLE.COM/",
        ] {
            assert_eq!(safe_url(url).as_deref(), Some(url), "expected accept: {url}");
        }
    }

    #[test]
    fn safe_url_accepts_relative_references() {
        for url in ["/a/b", "a/b.html", "../up", "#frag", "?query=1", "//cdn.example.com/x"] {
            assert_eq!(safe_url(url).as_deref(), Some(url), "expected accept: {url}");
        }
    }

    #[test]
    fn safe_url_rejects_script_and_data_schemes() {
        for url in [
            "javascript:alert(1)",
            "JaVaScRiPt:alert(1)",
            " javascript:alert(1)",
            "data:text/html;base64,PHNjcmlwdD4=",
            "vbscript:msgbox(1)",
            "file:///etc/passwd",
            "ftp://example.com/x",
        ] {
            assert_eq!(safe_url(url), None, "expected reject: {url}");
        }
    }

    #[test]
    fn safe_url_rejects_control_character_smuggling() {
        for url in [
            "java\tscript:alert(1)",
            "java\nscript:alert(1)",
            "java\u{0}script:alert(1)",
            "\u{1}https://example.com/",
        ] {
            assert_eq!(safe_url(url), None, "expected reject: {url:?}");
        }
    }
}
