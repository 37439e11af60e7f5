//! Allow-list HTML sanitizer.
//!
//! Given an untrusted HTML string and an explicit policy (permitted
//! elements, permitted attributes per element with optional value
//! rewriters), produces HTML that contains only whitelisted, validated
//! markup, is well-nested, and re-parses in a downstream browser into the
//! same tree the sanitizer reasoned about.
//!
//! The pipeline is four pure stages over a token vector:
//! lex ([`tokenize`]) → filter (policy application) → balance (implied
//! opens/closes, scoped end-tag matching, depth cap) → render
//! (entity-escaping serialization). [`Sanitizer`] owns the policy and runs
//! the pipeline; [`sanitize`](Sanitizer::sanitize) never fails on untrusted
//! input.
//!
//! Deliberately not a full HTML5 parser: only the dangerous subset of tree
//! construction (implied end tags, scope barriers) is modeled, which is
//! what the safety argument needs.

mod balance;
mod elements;
mod entities;
mod filter;
mod policy;
mod render;
mod sanitizer;
mod tokenizer;
mod types;
mod url_policy;

pub use crate::policy::{PolicyError, Rewriter};
pub use crate::sanitizer::Sanitizer;
pub use crate::tokenizer::tokenize;
pub use crate::types::{TagToken, Token};
pub use crate::url_policy::safe_url;
