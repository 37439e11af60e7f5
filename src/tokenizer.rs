//! HTML lexer with a constrained, practical tag-name character set.
//!
//! Supported tag-name characters (ASCII only): `[A-Za-z0-9:-]`, starting
//! with a letter. This is not a full HTML5 tokenizer state machine; it is
//! the defensive subset a sanitizer needs. Anything it does not recognize as
//! a tag or comment stays text and is entity-escaped by the renderer, so a
//! downstream parser cannot see tag boundaries this lexer did not see.
//!
//! Known properties:
//! - Never errors, always terminates, single linear pass.
//! - Concatenating [`crate::Token::source`] over the output reconstructs the
//!   input exactly.
//! - "Special" elements (`iframe`, `script`, `style`, `textarea`, `title`,
//!   `xmp`) are lexed whole: open tag + raw body up to the case-insensitive
//!   matching close tag, or end of input. Their bodies are never treated as
//!   nested markup.

use crate::elements;
use crate::types::{TagToken, Token};
use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':'
}

/// True when `<` at `i` begins a tag, comment, or bogus comment. Anything
/// else (`<1`, `< `, `<<`) is text.
fn starts_construct(bytes: &[u8], i: usize) -> bool {
    debug_assert_eq!(bytes[i], b'<');
    match bytes.get(i + 1) {
        Some(b) => b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'),
        None => false,
    }
}

/// Scan for `</name` + optional ASCII whitespace + `>`, case-insensitively.
/// Returns (body_end, close_end) relative to `haystack`. Close tags with
/// attribute junk (`</script foo>`) are not accepted; the scan keeps going,
/// which errs on the side of a longer raw body.
fn find_special_close(haystack: &str, name: &str) -> Option<(usize, usize)> {
    let hay = haystack.as_bytes();
    let name = name.as_bytes();
    debug_assert!(name.iter().all(u8::is_ascii_lowercase));
    let mut i = 0;
    while i < hay.len() {
        let rel = memchr(b'<', &hay[i..])?;
        i += rel;
        let name_start = i + 2;
        if hay.get(i + 1) != Some(&b'/') {
            i += 1;
            continue;
        }
        let matches_name = hay
            .get(name_start..name_start + name.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(name));
        if matches_name {
            let mut k = name_start + name.len();
            while k < hay.len() && hay[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < hay.len() && hay[k] == b'>' {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

/// Lex `input` into an ordered token sequence.
pub fn tokenize(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        // Text run: maximal span that does not begin a tag or comment.
        let text_start = i;
        while i < bytes.len() {
            if bytes[i] == b'<' && starts_construct(bytes, i) {
                break;
            }
            i += 1;
        }
        if i > text_start {
            debug_assert!(input.is_char_boundary(text_start));
            debug_assert!(input.is_char_boundary(i));
            out.push(Token::Text(input[text_start..i].to_owned()));
        }
        if i >= bytes.len() {
            break;
        }

        // Real comment.
        if input[i..].starts_with(COMMENT_START) {
            let search_from = i + COMMENT_START.len();
            if let Some(rel) = input[search_from..].find(COMMENT_END) {
                let end = search_from + rel + COMMENT_END.len();
                out.push(Token::Comment(input[i..end].to_owned()));
                i = end;
            } else {
                out.push(Token::Comment(input[i..].to_owned()));
                i = bytes.len();
            }
            continue;
        }

        // Tag?
        let mut j = i + 1;
        let is_close = bytes[j] == b'/';
        if is_close {
            j += 1;
        }
        let has_name = j < bytes.len() && bytes[j].is_ascii_alphabetic();

        if !has_name {
            // Bogus comment: `<!...>`, `<?...>`, or `</` with no valid name.
            // One token through the first `>`, or the rest of the input.
            let end = match memchr(b'>', &bytes[i..]) {
                Some(rel) => i + rel + 1,
                None => bytes.len(),
            };
            debug_assert!(input.is_char_boundary(end));
            out.push(Token::Comment(input[i..end].to_owned()));
            i = end;
            continue;
        }

        let name_start = j;
        while j < bytes.len() && is_name_byte(bytes[j]) {
            j += 1;
        }
        let name = input[name_start..j].to_ascii_lowercase();

        // Attribute text runs to the first `>` outside quotes; a missing
        // trailing `>` is tolerated at end of input.
        let attr_start = j;
        let mut quote: Option<u8> = None;
        while j < bytes.len() {
            let b = bytes[j];
            match quote {
                Some(q) => {
                    if b == q {
                        quote = None;
                    }
                }
                None => {
                    if b == b'"' || b == b'\'' {
                        quote = Some(b);
                    } else if b == b'>' {
                        break;
                    }
                }
            }
            j += 1;
        }
        let attr_text = input[attr_start..j].to_owned();
        let tag_end = if j < bytes.len() { j + 1 } else { j };

        let mut special_body = None;
        let mut end = tag_end;
        if !is_close && elements::is_special(&name) {
            let rest = &input[tag_end..];
            match find_special_close(rest, &name) {
                Some((body_end, close_end)) => {
                    special_body = Some(rest[..body_end].to_owned());
                    end = tag_end + close_end;
                }
                None => {
                    special_body = Some(rest.to_owned());
                    end = bytes.len();
                }
            }
        }

        out.push(Token::Tag(TagToken {
            is_void: elements::is_void(&name),
            name,
            is_close,
            attr_text,
            special_body,
            raw: input[i..end].to_owned(),
        }));
        i = end;
    }

    out
}
