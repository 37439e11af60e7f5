use crate::elements;

/// Lexical unit produced by [`crate::tokenize`].
///
/// Tokens are immutable once lexed; later pipeline stages replace whole
/// tokens rather than mutating shared state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Raw text run, exactly as it appeared in the input (entities included).
    Text(String),
    /// A real comment or a bogus comment (`<!...>`, `<?...>`, `</...>` with
    /// no valid tag name). Raw span including delimiters.
    Comment(String),
    /// Start or end tag.
    Tag(TagToken),
}

/// A start or end tag.
///
/// `raw` holds the exact source span of the token so that concatenating
/// `source()` over a lexed stream reconstructs the input byte for byte.
/// Sanitized tags are re-rendered from the structured fields; `raw` is never
/// emitted downstream of the filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagToken {
    /// Tag name, ASCII-lowercased.
    pub name: String,
    /// `</...>` rather than `<...>`.
    pub is_close: bool,
    /// Void element (`br`, `img`, ...): no children, no close tag.
    pub is_void: bool,
    /// Raw text between the tag name and the closing `>` (exclusive). After
    /// filtering this is replaced by canonical ` name="value"` text.
    pub attr_text: String,
    /// For special elements (`script`, `style`, `textarea`, `title`,
    /// `iframe`, `xmp`) the raw body up to the matching close tag. The body
    /// is never treated as nested markup.
    pub special_body: Option<String>,
    /// Exact source span, including the body and close tag of a special
    /// element. Empty for tokens synthesized by the balancer.
    pub raw: String,
}

impl TagToken {
    /// Open tag inserted by the balancer (implied container, `</br>`).
    pub(crate) fn synthetic_open(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            is_close: false,
            is_void: elements::is_void(name),
            attr_text: String::new(),
            special_body: None,
            raw: String::new(),
        }
    }

    /// Close tag inserted by the balancer.
    pub(crate) fn synthetic_close(name: String) -> Self {
        Self {
            name,
            is_close: true,
            is_void: false,
            attr_text: String::new(),
            special_body: None,
            raw: String::new(),
        }
    }
}

impl Token {
    /// The exact source span this token was lexed from.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Token::Text(s) | Token::Comment(s) => s,
            Token::Tag(tag) => &tag.raw,
        }
    }
}
