//! Allow-list policy: per-element attribute maps and value rewriters.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use crate::url_policy;

/// Key for attributes allowed on every whitelisted element, and for the
/// wildcard attribute rule within an element.
pub(crate) const WILDCARD: &str = "*";

/// Validates/transforms one decoded attribute value, or rejects it.
///
/// Rewriters form a tiny expression language evaluated by [`Rewriter::apply`]
/// rather than captured closures: `Identity` is the neutral element of
/// [`Rewriter::chain`], `Reject` is absorbing, and rejection poisons the rest
/// of a chain.
#[derive(Clone, Debug, PartialEq)]
pub enum Rewriter {
    /// Keep the value unchanged.
    Identity,
    /// Drop the attribute.
    Reject,
    /// Caller-supplied transform; `None` rejects.
    Custom(fn(&str) -> Option<String>),
    /// Apply the first rewriter, then the second if the first accepted.
    Chain(Box<Rewriter>, Box<Rewriter>),
}

impl Rewriter {
    /// The built-in URL-safety rewriter applied to `href`/`src` by default.
    #[must_use]
    pub fn url() -> Self {
        Rewriter::Custom(url_policy::safe_url)
    }

    /// Apply to a decoded attribute value; `None` means "drop the attribute".
    #[must_use]
    pub fn apply(&self, value: &str) -> Option<String> {
        match self {
            Rewriter::Identity => Some(value.to_owned()),
            Rewriter::Reject => None,
            Rewriter::Custom(f) => f(value),
            Rewriter::Chain(first, second) => {
                first.apply(value).and_then(|v| second.apply(&v))
            }
        }
    }

    /// Sequence two rewriters, collapsing neutral and absorbing elements.
    #[must_use]
    pub fn chain(self, other: Rewriter) -> Rewriter {
        match (self, other) {
            (Rewriter::Reject, _) | (_, Rewriter::Reject) => Rewriter::Reject,
            (Rewriter::Identity, g) => g,
            (f, Rewriter::Identity) => f,
            (f, g) => Rewriter::Chain(Box::new(f), Box::new(g)),
        }
    }
}

/// Configuration error raised during policy building. Programmer error,
/// never triggered by untrusted input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyError {
    /// Element name does not match `[a-z][a-z0-9-:]*`.
    InvalidElementName(String),
    /// Attribute name does not match `[a-z][a-z0-9-:]*`.
    InvalidAttributeName(String),
    /// Attribute registered for an element that was never whitelisted.
    ElementNotAllowed {
        element: String,
        attribute: String,
    },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::InvalidElementName(name) => {
                write!(f, "invalid element name: {name:?}")
            }
            PolicyError::InvalidAttributeName(name) => {
                write!(f, "invalid attribute name: {name:?}")
            }
            PolicyError::ElementNotAllowed { element, attribute } => write!(
                f,
                "attribute {attribute:?} registered for element {element:?} \
                 before the element was whitelisted"
            ),
        }
    }
}

impl Error for PolicyError {}

/// `[a-z][a-z0-9-:]*`, checked after ASCII lowercasing.
pub(crate) fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    let Some(first) = bytes.first() else {
        return false;
    };
    first.is_ascii_lowercase()
        && bytes[1..]
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'-' | b':'))
}

/// Element-name → attribute-name → rewriter. Keys are lowercased; the
/// [`WILDCARD`] element key is the "allowed on every whitelisted element"
/// bucket and is not itself a whitelisted element.
#[derive(Clone, Debug, Default)]
pub(crate) struct Policy {
    elements: HashMap<String, HashMap<String, Rewriter>>,
}

impl Policy {
    /// Whitelist an element (idempotent). `name` must already be lowercased
    /// and validated.
    pub(crate) fn allow_element(&mut self, name: &str) {
        debug_assert!(is_valid_name(name));
        self.elements.entry(name.to_owned()).or_default();
    }

    pub(crate) fn is_allowed(&self, element: &str) -> bool {
        element != WILDCARD && self.elements.contains_key(element)
    }

    /// Register a rewriter for `(element, attribute)`; either side may be
    /// [`WILDCARD`]. Re-registration chains after the existing rewriter.
    pub(crate) fn allow_attribute(
        &mut self,
        element: &str,
        attribute: &str,
        rewriter: Rewriter,
    ) -> Result<(), PolicyError> {
        if element != WILDCARD && !self.is_allowed(element) {
            return Err(PolicyError::ElementNotAllowed {
                element: element.to_owned(),
                attribute: attribute.to_owned(),
            });
        }
        let attrs = self.elements.entry(element.to_owned()).or_default();
        match attrs.remove(attribute) {
            Some(existing) => {
                let _ = attrs.insert(attribute.to_owned(), existing.chain(rewriter));
            }
            None => {
                let _ = attrs.insert(attribute.to_owned(), rewriter);
            }
        }
        Ok(())
    }

    /// Resolve the rewriter for an attribute on a whitelisted element.
    ///
    /// Lookup order: exact rule on the element, exact rule in the `"*"`
    /// bucket, then the dangerous-attribute default (`style` and `on*` are
    /// dropped unless explicitly registered above), then wildcard attribute
    /// rules on the element and in the `"*"` bucket. `None` drops the
    /// attribute.
    pub(crate) fn rewriter_for(&self, element: &str, attribute: &str) -> Option<&Rewriter> {
        let element_attrs = self.elements.get(element);
        let generic_attrs = self.elements.get(WILDCARD);
        if let Some(rewriter) = element_attrs.and_then(|attrs| attrs.get(attribute)) {
            return Some(rewriter);
        }
        if let Some(rewriter) = generic_attrs.and_then(|attrs| attrs.get(attribute)) {
            return Some(rewriter);
        }
        if attribute == "style" || attribute.starts_with("on") {
            return None;
        }
        if let Some(rewriter) = element_attrs.and_then(|attrs| attrs.get(WILDCARD)) {
            return Some(rewriter);
        }
        generic_attrs.and_then(|attrs| attrs.get(WILDCARD))
    }

    /// The whitelisted element names (the `"*"` bucket excluded).
    pub(crate) fn element_names(&self) -> std::collections::HashSet<String> {
        self.elements
            .keys()
            .filter(|name| name.as_str() != WILDCARD)
            .cloned()
            .collect()
    }
}
