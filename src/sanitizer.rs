//! The sanitizer facade: policy building plus the sanitize pipeline.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::balance::balance;
use crate::filter::filter;
use crate::policy::{Policy, PolicyError, Rewriter, WILDCARD, is_valid_name};
use crate::render::render;
use crate::tokenizer::tokenize;

/// Allow-list HTML sanitizer.
///
/// Build a policy with [`allow_elements`](Sanitizer::allow_elements) and
/// [`allow_attributes`](Sanitizer::allow_attributes), then call
/// [`sanitize`](Sanitizer::sanitize) any number of times. Building takes
/// `&mut self` and sanitizing takes `&self`, so a shared sanitizer can serve
/// concurrent callers once configured.
///
/// ```
/// use html_sanitizer::Sanitizer;
///
/// let mut s = Sanitizer::new();
/// s.allow_elements(&["a", "b"]).unwrap();
/// s.allow_attributes(&["a"], &["href"], None).unwrap();
/// assert_eq!(
///     s.sanitize("<a href=\"javascript:alert(1)\" onclick=x>hi</a>"),
///     "<a>hi</a>"
/// );
/// ```
#[derive(Debug, Default)]
pub struct Sanitizer {
    policy: Policy,
    allowed: OnceLock<HashSet<String>>,
}

impl Sanitizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whitelist elements. Names are lowercased; each must match
    /// `[a-z][a-z0-9-:]*`.
    pub fn allow_elements(&mut self, names: &[&str]) -> Result<&mut Self, PolicyError> {
        for name in names {
            let name = name.to_ascii_lowercase();
            if !is_valid_name(&name) {
                return Err(PolicyError::InvalidElementName(name));
            }
            self.policy.allow_element(&name);
        }
        self.allowed = OnceLock::new();
        Ok(self)
    }

    /// Register attributes for elements. `"*"` on the element side means
    /// "every whitelisted element"; `"*"` on the attribute side is a
    /// wildcard rule (which still never admits `style` or `on*` handlers —
    /// those need explicit registration).
    ///
    /// Without an explicit rewriter, `href`/`src` get the built-in URL
    /// check and everything else passes through unchanged. Registering the
    /// same attribute again chains the new rewriter after the existing one.
    ///
    /// Fails if a name is malformed or an element was never whitelisted.
    pub fn allow_attributes(
        &mut self,
        elements: &[&str],
        attributes: &[&str],
        rewriter: Option<Rewriter>,
    ) -> Result<&mut Self, PolicyError> {
        for element in elements {
            let element = element.to_ascii_lowercase();
            if element != WILDCARD && !is_valid_name(&element) {
                return Err(PolicyError::InvalidElementName(element));
            }
            for attribute in attributes {
                let attribute = attribute.to_ascii_lowercase();
                if attribute != WILDCARD && !is_valid_name(&attribute) {
                    return Err(PolicyError::InvalidAttributeName(attribute));
                }
                let rewriter = rewriter.clone().unwrap_or_else(|| {
                    if attribute == "href" || attribute == "src" {
                        Rewriter::url()
                    } else {
                        Rewriter::Identity
                    }
                });
                self.policy.allow_attribute(&element, &attribute, rewriter)?;
            }
        }
        self.allowed = OnceLock::new();
        Ok(self)
    }

    /// Sanitize untrusted HTML. Never fails: malformed constructs are
    /// silently elided or truncated, and fully rejected input yields `""`.
    #[must_use]
    pub fn sanitize(&self, html: &str) -> String {
        let allowed = self
            .allowed
            .get_or_init(|| self.policy.element_names());
        let mut tokens = tokenize(html);
        filter(&self.policy, allowed, &mut tokens);
        let tokens = balance(tokens, allowed);
        render(&tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyError;

    #[test]
    fn builder_rejects_bad_names() {
        let mut s = Sanitizer::new();
        assert!(matches!(
            s.allow_elements(&["1div"]),
            Err(PolicyError::InvalidElementName(_))
        ));
        s.allow_elements(&["div"]).unwrap();
        assert!(matches!(
            s.allow_attributes(&["div"], &["bad attr"], None),
            Err(PolicyError::InvalidAttributeName(_))
        ));
        assert!(matches!(
            s.allow_attributes(&["span"], &["title"], None),
            Err(PolicyError::ElementNotAllowed { .. })
        ));
    }

    #[test]
    fn builder_names_are_case_insensitive() {
        let mut s = Sanitizer::new();
        s.allow_elements(&["DiV"]).unwrap();
        assert_eq!(s.sanitize("<div>x</div>"), "<div>x</div>");
    }

    #[test]
    fn whitelist_cache_is_invalidated_by_mutation() {
        let mut s = Sanitizer::new();
        s.allow_elements(&["b"]).unwrap();
        assert_eq!(s.sanitize("<b>x</b><i>y</i>"), "<b>x</b>y");
        s.allow_elements(&["i"]).unwrap();
        assert_eq!(s.sanitize("<b>x</b><i>y</i>"), "<b>x</b><i>y</i>");
    }

    #[test]
    fn empty_policy_rejects_everything_tagged() {
        let s = Sanitizer::new();
        assert_eq!(s.sanitize("<div><b>x</b></div>"), "x");
        assert_eq!(s.sanitize("plain"), "plain");
    }

    #[test]
    fn sanitizer_is_sync_once_built() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<Sanitizer>();
    }
}
