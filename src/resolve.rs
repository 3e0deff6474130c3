//! Placeholder resolution: which declared placeholders the template uses
//!
//! Detection is purely structural; no word source is touched here. A
//! wordlist whose placeholder never appears in any template field is
//! dropped before streaming and therefore never opened.

use crate::render::RequestTemplate;
use crate::wordlist::WordlistSpec;

/// All declared placeholders, longest first; ties keep declaration order
/// (stable sort). Replacement in this order ensures no part of a longer
/// placeholder is consumed by a shorter one sharing a prefix or suffix.
pub fn placeholder_order(specs: &[WordlistSpec]) -> Vec<String> {
    let mut order: Vec<String> = specs.iter().map(|s| s.placeholder.clone()).collect();
    order.sort_by_key(|p| std::cmp::Reverse(p.len()));
    order
}

/// The subset of `order` whose tokens occur in at least one template field,
/// preserving `order`'s ordering.
///
/// Each token is destructively removed from a scratch concatenation of the
/// substitutable fields; a shrinking buffer means the token was present.
/// Longest-first processing guarantees a token that is a strict substring
/// of an already-stripped longer token cannot signal a false "used".
pub fn used_placeholders(order: &[String], template: &RequestTemplate) -> Vec<String> {
    let mut scratch = template.substitutable_text();
    let mut used = Vec::new();
    for placeholder in order {
        let stripped = scratch.replace(placeholder.as_str(), "");
        if stripped.len() < scratch.len() {
            used.push(placeholder.clone());
        }
        scratch = stripped;
    }
    used
}

/// Wordlists whose placeholder is actually used, in declaration order.
pub fn used_wordlists(specs: &[WordlistSpec], used: &[String]) -> Vec<WordlistSpec> {
    specs
        .iter()
        .filter(|spec| used.iter().any(|u| *u == spec.placeholder))
        .cloned()
        .collect()
}
