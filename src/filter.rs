//! Policy application: blank disallowed tags, strip or rewrite attributes.

use std::collections::HashSet;

use crate::elements;
use crate::entities::{decode_entities, escape_attr};
use crate::policy::Policy;
use crate::types::Token;

/// Apply `policy` to `tokens` in place.
///
/// - Close tags of whitelisted elements keep only their name.
/// - Open whitelisted tags get their attribute text parsed, each value
///   entity-decoded, run through its rewriter, and re-escaped into canonical
///   ` name="value"` form; unmatched attributes are dropped.
/// - Disallowed tags lose their markup. A disallowed special element keeps
///   its raw body as a text token (neutralized by the renderer's escaping),
///   except `script`/`style` whose body is code and is dropped with the tag.
/// - Comments and bogus tags are elided unconditionally.
pub(crate) fn filter(policy: &Policy, allowed: &HashSet<String>, tokens: &mut Vec<Token>) {
    tokens.retain_mut(|token| match token {
        Token::Text(_) => true,
        Token::Comment(_) => false,
        Token::Tag(tag) => {
            if !allowed.contains(&tag.name) {
                log::trace!(target: "sanitizer.filter", "blanking tag: {}", tag.name);
                if tag.is_close || elements::is_code_special(&tag.name) {
                    return false;
                }
                match tag.special_body.take() {
                    Some(body) => {
                        *token = Token::Text(body);
                        true
                    }
                    None => false,
                }
            } else {
                tag.attr_text = if tag.is_close {
                    String::new()
                } else {
                    sanitize_attributes(policy, &tag.name, &tag.attr_text)
                };
                true
            }
        }
    });
}

/// Parse raw attribute text and re-render the surviving pairs canonically.
fn sanitize_attributes(policy: &Policy, element: &str, attr_text: &str) -> String {
    let mut out = String::new();
    for (name, value) in parse_attributes(attr_text) {
        let Some(rewriter) = policy.rewriter_for(element, &name) else {
            log::trace!(target: "sanitizer.filter", "dropping attribute {name} on {element}");
            continue;
        };
        match rewriter.apply(&value) {
            Some(rewritten) => {
                out.push(' ');
                out.push_str(&name);
                out.push_str("=\"");
                out.push_str(&escape_attr(&rewritten));
                out.push('"');
            }
            None => {
                log::trace!(target: "sanitizer.filter", "rewriter rejected {name} on {element}");
            }
        }
    }
    out
}

/// Split raw attribute text into lowercased name / decoded value pairs.
/// Value-less attributes get an empty value; duplicate names keep the first
/// occurrence.
fn parse_attributes(text: &str) -> Vec<(String, String)> {
    fn is_name_end(b: u8) -> bool {
        b.is_ascii_whitespace() || matches!(b, b'=' | b'/' | b'"' | b'\'' | b'>')
    }

    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut out: Vec<(String, String)> = Vec::new();
    let mut k = 0;

    while k < len {
        while k < len && (bytes[k].is_ascii_whitespace() || bytes[k] == b'/') {
            k += 1;
        }
        if k >= len {
            break;
        }
        let name_start = k;
        while k < len && !is_name_end(bytes[k]) {
            k += 1;
        }
        if k == name_start {
            k += 1;
            continue;
        }
        let name = text[name_start..k].to_ascii_lowercase();

        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        let mut value = String::new();
        if k < len && bytes[k] == b'=' {
            k += 1;
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let quote = bytes[k];
                k += 1;
                let value_start = k;
                while k < len && bytes[k] != quote {
                    k += 1;
                }
                value = decode_entities(&text[value_start..k]);
                if k < len {
                    k += 1;
                }
            } else {
                let value_start = k;
                while k < len && !bytes[k].is_ascii_whitespace() {
                    k += 1;
                }
                value = decode_entities(&text[value_start..k]);
            }
        }

        if !out.iter().any(|(existing, _)| *existing == name) {
            out.push((name, value));
        }
    }
    out
}
