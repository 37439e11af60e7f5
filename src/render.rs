//! Final serialization: tokens to a string.
//!
//! Tags are re-rendered canonically from their structured fields; anything
//! that is not a well-formed tag gets its literal `<`/`>` entity-escaped, so
//! the output cannot contain a tag boundary the filter and balancer never
//! reasoned about.

use crate::entities::escape_text;
use crate::types::Token;

pub(crate) fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Text(text) => out.push_str(&escape_text(text)),
            // The filter elides comments; escape rather than trust that.
            Token::Comment(raw) => out.push_str(&escape_text(raw)),
            Token::Tag(tag) => {
                if tag.is_close {
                    out.push_str("</");
                    out.push_str(&tag.name);
                    out.push('>');
                } else {
                    out.push('<');
                    out.push_str(&tag.name);
                    out.push_str(&tag.attr_text);
                    out.push('>');
                    if let Some(body) = &tag.special_body {
                        out.push_str(&escape_text(body));
                        out.push_str("</");
                        out.push_str(&tag.name);
                        out.push('>');
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TagToken;

    #[test]
    fn render_escapes_text_but_not_entities() {
        let tokens = vec![Token::Text("<b> &amp; 1<2".to_owned())];
        assert_eq!(render(&tokens), "&lt;b&gt; &amp; 1&lt;2");
    }

    #[test]
    fn render_emits_canonical_tags() {
        let tokens = vec![
            Token::Tag(TagToken::synthetic_open("div")),
            Token::Text("x".to_owned()),
            Token::Tag(TagToken::synthetic_close("div".to_owned())),
        ];
        assert_eq!(render(&tokens), "<div>x</div>");
    }

    #[test]
    fn render_escapes_special_bodies() {
        let mut tag = TagToken::synthetic_open("textarea");
        tag.special_body = Some("<script>x</script>".to_owned());
        assert_eq!(
            render(&[Token::Tag(tag)]),
            "<textarea>&lt;script&gt;x&lt;/script&gt;</textarea>"
        );
    }

    #[test]
    fn render_escapes_stray_comments() {
        let tokens = vec![Token::Comment("<!-- x -->".to_owned())];
        assert_eq!(render(&tokens), "&lt;!-- x --&gt;");
    }
}
