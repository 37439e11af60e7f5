//! Entity decoding and escaping.
//!
//! Decoding is applied to attribute values before rewriters run, so that a
//! URL check sees `javascript:` even when it arrives as `java&#115;cript:`.
//! Escaping is applied by the renderer; text escaping deliberately leaves
//! `&` alone so that sanitizing already-sanitized output is a no-op.

/// Decode a minimal, explicitly limited subset of HTML entities.
///
/// Contract:
/// - Named entities decoded: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`,
///   `&nbsp;`, plus the scheme-smuggling names `&colon;`, `&sol;`, `&Tab;`,
///   `&NewLine;`.
/// - Numeric entities decoded only when well-formed and semicolon-terminated:
///   `&#123;` (decimal) and `&#x1F4A9;` (hex), with digit-count caps.
/// - Only valid Unicode scalar values decode; everything malformed passes
///   through unchanged.
///
/// Intentionally not HTML5-complete; the named set covers what attribute
/// rewriters need to see decoded.
pub(crate) fn decode_entities(s: &str) -> String {
    const NAMED: &[(&[u8], char)] = &[
        (b"&amp;", '&'),
        (b"&lt;", '<'),
        (b"&gt;", '>'),
        (b"&quot;", '"'),
        (b"&apos;", '\''),
        (b"&nbsp;", '\u{00A0}'),
        (b"&colon;", ':'),
        (b"&sol;", '/'),
        (b"&Tab;", '\t'),
        (b"&NewLine;", '\n'),
    ];
    const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
    const MAX_DEC_DIGITS: usize = 7; // 1114111

    // Bounded scan to avoid quadratic behavior on adversarial input.
    fn scan_digits(bytes: &[u8], start: usize, max_digits: usize, hex: bool) -> Option<usize> {
        let mut j = start;
        let mut digits = 0usize;
        while j < bytes.len() {
            let b = bytes[j];
            if b == b';' {
                return (digits > 0).then_some(j);
            }
            if digits == max_digits {
                return None;
            }
            let ok = if hex {
                b.is_ascii_hexdigit()
            } else {
                b.is_ascii_digit()
            };
            if !ok {
                return None;
            }
            digits += 1;
            j += 1;
        }
        None
    }

    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    let mut copy_start = 0;

    'outer: while i < bytes.len() {
        if bytes[i] != b'&' {
            i += 1;
            continue;
        }
        // Flush bytes up to '&' unchanged (preserves UTF-8).
        if copy_start < i {
            out.push_str(&s[copy_start..i]);
        }
        copy_start = i;

        for (pat, ch) in NAMED {
            if bytes.get(i..i + pat.len()).is_some_and(|b| b == *pat) {
                out.push(*ch);
                i += pat.len();
                copy_start = i;
                continue 'outer;
            }
        }

        let hex = bytes.get(i..i + 3).is_some_and(|b| b.eq_ignore_ascii_case(b"&#x"));
        let dec = !hex && bytes.get(i..i + 2).is_some_and(|b| b == b"&#");
        if hex || dec {
            let digits_start = if hex { i + 3 } else { i + 2 };
            let (max_digits, radix) = if hex { (MAX_HEX_DIGITS, 16) } else { (MAX_DEC_DIGITS, 10) };
            if let Some(end) = scan_digits(bytes, digits_start, max_digits, hex) {
                let scalar = u32::from_str_radix(&s[digits_start..end], radix)
                    .ok()
                    .and_then(char::from_u32);
                if let Some(ch) = scalar {
                    out.push(ch);
                } else {
                    // Known end; preserve the whole sequence unchanged.
                    out.push_str(&s[i..=end]);
                }
                i = end + 1;
                copy_start = i;
                continue;
            }
        }

        // Unknown name or malformed numeric: keep '&' as-is.
        out.push('&');
        i += 1;
        copy_start = i;
    }

    if copy_start < bytes.len() {
        out.push_str(&s[copy_start..]);
    }
    out
}

/// Escape text content for output. Only `<` and `>` are rewritten: escaping
/// `&` as well would double-escape entities already present in the input and
/// break sanitize-twice idempotence.
pub(crate) fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a decoded attribute value for emission inside double quotes.
pub(crate) fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_entities_decodes_common_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities("&quot;hi&quot;"), "\"hi\"");
        assert_eq!(decode_entities("&apos;x&apos;"), "'x'");
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{00A0}b");
    }

    #[test]
    fn decode_entities_decodes_scheme_smuggling_names() {
        assert_eq!(decode_entities("javascript&colon;x"), "javascript:x");
        assert_eq!(decode_entities("a&sol;b"), "a/b");
        assert_eq!(decode_entities("a&Tab;b"), "a\tb");
        assert_eq!(decode_entities("a&NewLine;b"), "a\nb");
    }

    #[test]
    fn decode_entities_decodes_numeric_entities() {
        assert_eq!(decode_entities("&#215;"), "×");
        assert_eq!(decode_entities("&#xD7;"), "×");
        assert_eq!(decode_entities("&#X4A;"), "J");
        assert_eq!(decode_entities("java&#115;cript:"), "javascript:");
    }

    #[test]
    fn decode_entities_preserves_utf8_around_entities() {
        assert_eq!(decode_entities("π &amp; σ"), "π & σ");
        assert_eq!(decode_entities("120×32"), "120×32");
    }

    #[test]
    fn decode_entities_passes_through_unknown_and_missing_semicolon() {
        assert_eq!(
            decode_entities("before &notanentity; after"),
            "before &notanentity; after"
        );
        assert_eq!(decode_entities("&amp"), "&amp");
        assert_eq!(decode_entities("&#xD7 "), "&#xD7 ");
        assert_eq!(decode_entities("&#215 "), "&#215 ");
    }

    #[test]
    fn decode_entities_passes_through_malformed_numeric() {
        assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
        assert_eq!(decode_entities("&#99999999;"), "&#99999999;");
        assert_eq!(decode_entities("&#xD800;"), "&#xD800;");
        assert_eq!(decode_entities("&#x110000;"), "&#x110000;");
        assert_eq!(decode_entities("&#;"), "&#;");
        assert_eq!(decode_entities("&#x;"), "&#x;");
    }

    #[test]
    fn decode_entities_respects_numeric_digit_limits() {
        assert_eq!(decode_entities("&#1114111;"), "\u{10FFFF}");
        assert_eq!(decode_entities("&#11141111;"), "&#11141111;");
        assert_eq!(decode_entities("&#x10FFFF;"), "\u{10FFFF}");
    }

    #[test]
    fn decode_entities_adversarial_inputs_are_stable() {
        let samples = ["&", "&&", "&;", "&#;", "&#x;", "&#xFFFFFFFF;", "&unknown;"];
        for s in samples {
            let out = decode_entities(s);
            assert_eq!(out, s, "expected pass-through for {s:?}");
            assert_eq!(decode_entities(&out), out);
        }
        let noisy = "&#123456789;".repeat(100);
        assert_eq!(decode_entities(&noisy), noisy);
    }

    #[test]
    fn escape_text_leaves_amp_alone() {
        assert_eq!(escape_text("a < b > c & d"), "a &lt; b &gt; c & d");
        assert_eq!(escape_text("&lt;"), "&lt;");
    }

    #[test]
    fn escape_attr_escapes_quote_and_amp() {
        assert_eq!(escape_attr(r#"a"b&c<d>"#), "a&quot;b&amp;c&lt;d&gt;");
    }
}
