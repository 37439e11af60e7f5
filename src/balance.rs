//! Tag balancer: turns a filtered token stream into a well-nested one.
//!
//! Mirrors the dangerous subset of real tree construction — implied end tags
//! and scoped end-tag matching — closely enough that a browser re-parsing
//! the output builds the tree the sanitizer reasoned about. Full HTML5
//! insertion modes and foster parenting are intentionally out of scope.

use std::collections::HashSet;

use crate::elements::{
    self, GroupSet, ScopeSet, containable_groups, established_scopes, implied_child, member_groups,
};
use crate::types::{TagToken, Token};

/// Open-element depth cap. Opens past the cap are dropped, which bounds both
/// memory and output size under adversarial nesting.
pub(crate) const MAX_OPEN_DEPTH: usize = 256;

/// Stack of open element names, bounded at [`MAX_OPEN_DEPTH`].
#[derive(Debug, Default)]
struct OpenElementStack {
    items: Vec<String>,
}

impl OpenElementStack {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn is_full(&self) -> bool {
        self.items.len() >= MAX_OPEN_DEPTH
    }

    fn current(&self) -> Option<&str> {
        self.items.last().map(String::as_str)
    }

    fn push(&mut self, name: String) {
        debug_assert!(!self.is_full());
        self.items.push(name);
    }

    fn pop(&mut self) -> Option<String> {
        self.items.pop()
    }

    /// Index of the most recent open element matching `name`; `h1`-`h6`
    /// match each other.
    fn find_match(&self, name: &str) -> Option<usize> {
        let heading = elements::is_heading(name);
        self.items.iter().rposition(|open| {
            open == name || (heading && elements::is_heading(open))
        })
    }

    /// Union of scopes established by elements strictly above `index`.
    fn scopes_above(&self, index: usize) -> ScopeSet {
        self.items[index + 1..]
            .iter()
            .fold(ScopeSet::EMPTY, |acc, open| {
                acc.union(established_scopes(open))
            })
    }
}

/// Balance `tokens`: insert implied opens/closes, drop unmatched closes, and
/// bound nesting depth. Consumes the filtered stream and returns a stream in
/// which every non-void open tag has exactly one matching close tag in valid
/// nesting order. Synthesized tags are restricted to `allowed`, so the
/// output never names an element the filter would have rejected.
pub(crate) fn balance(tokens: Vec<Token>, allowed: &HashSet<String>) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut stack = OpenElementStack::default();

    for token in tokens {
        match token {
            Token::Tag(tag) if tag.is_close => handle_close(&mut stack, &mut out, tag, allowed),
            Token::Tag(tag) => handle_open(&mut stack, &mut out, tag, allowed),
            other => out.push(other),
        }
    }

    // End of input: close everything still open, topmost first.
    while let Some(open) = stack.pop() {
        out.push(Token::Tag(TagToken::synthetic_close(open)));
    }
    out
}

fn handle_close(
    stack: &mut OpenElementStack,
    out: &mut Vec<Token>,
    tag: TagToken,
    allowed: &HashSet<String>,
) {
    if tag.is_void {
        // A close tag for a void element is meaningless; the one legacy
        // exception is `</br>`, which browsers treat as `<br>`. The filter
        // already dropped `</br>` unless `br` is whitelisted.
        if tag.name == "br" {
            handle_open(stack, out, TagToken::synthetic_open("br"), allowed);
        }
        return;
    }

    let Some(index) = stack.find_match(&tag.name) else {
        log::trace!(target: "sanitizer.balance", "dropping unmatched close: {}", tag.name);
        return;
    };

    // An end tag may only close through ancestors whose every established
    // scope it establishes itself: a stray </p> cannot reach out of a table,
    // but </table> may close through an inner table.
    let above = stack.scopes_above(index);
    if !established_scopes(&tag.name).contains_all(above) {
        log::trace!(target: "sanitizer.balance", "close blocked by scope: {}", tag.name);
        return;
    }

    while stack.len() > index {
        let open = stack.pop().unwrap_or_default();
        out.push(Token::Tag(TagToken::synthetic_close(open)));
    }
}

fn handle_open(
    stack: &mut OpenElementStack,
    out: &mut Vec<Token>,
    tag: TagToken,
    allowed: &HashSet<String>,
) {
    let groups = member_groups(&tag.name);

    // If the top cannot contain this tag but has an implied block-container
    // child that can, synthesize the wrapper: `<table><td>` grows a `<tr>`.
    // Only whitelisted children are synthesized; otherwise the implied-close
    // loop below pops the non-containing ancestor instead.
    if let Some(top) = stack.current() {
        if !containable_groups(top).intersects(groups) {
            if let Some(child) = implied_child(top) {
                if allowed.contains(child)
                    && containable_groups(child).intersects(groups)
                    && !stack.is_full()
                {
                    log::trace!(target: "sanitizer.balance", "implied open: {child} under {top}");
                    out.push(Token::Tag(TagToken::synthetic_open(child)));
                    stack.push(child.to_owned());
                }
            }
        }
    }

    // Implied closes: pop everything that cannot contain this tag. Unlike
    // explicit end tags, this ignores the scope check.
    while let Some(top) = stack.current() {
        if containable_groups(top).intersects(groups) {
            break;
        }
        log::trace!(target: "sanitizer.balance", "implied close: {top} before {}", tag.name);
        let open = stack.pop().unwrap_or_default();
        out.push(Token::Tag(TagToken::synthetic_close(open)));
    }

    if tag.is_void || tag.special_body.is_some() {
        // Voids are never pushed; special elements carry their own close and
        // are emitted atomically.
        out.push(Token::Tag(tag));
        return;
    }

    if stack.is_full() {
        log::trace!(target: "sanitizer.balance", "depth cap hit, dropping open: {}", tag.name);
        return;
    }
    stack.push(tag.name.clone());
    out.push(Token::Tag(tag));
}
