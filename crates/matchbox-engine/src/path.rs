//! Helpers for walking a captured matcher path to build error messages.

use matchbox_core::Label;

use crate::context::PathEntry;
use crate::grammar::Grammar;
use crate::matcher::MatcherId;

/// The deepest custom-labelled matcher whose frame began exactly at
/// `error_index`, if any. This is what an `InvalidInput` error's `expected`
/// field is filled in from: a custom label is more informative to a grammar
/// author than whatever leaf matcher happened to fail underneath it.
pub fn find_proper_label_matcher<V>(
    grammar: &Grammar<V>,
    path: &[PathEntry],
    error_index: usize,
) -> Option<MatcherId> {
    path.iter()
        .rev()
        .find(|entry| entry.start == error_index && grammar.label_of(entry.matcher).is_custom())
        .map(|entry| entry.matcher)
}

/// The label to report for a failure at `error_index`: the deepest custom
/// label at that index, or the label of the matcher that actually failed.
pub fn expected_label<V>(
    grammar: &Grammar<V>,
    path: &[PathEntry],
    failed: MatcherId,
    error_index: usize,
) -> Label {
    find_proper_label_matcher(grammar, path, error_index)
        .map(|id| grammar.label_of(id).clone())
        .unwrap_or_else(|| grammar.label_of(failed).clone())
}
