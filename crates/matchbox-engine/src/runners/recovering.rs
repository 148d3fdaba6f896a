//! Best-effort error recovery: on failure, try deleting the offending
//! character and re-parsing; if repeated deletions don't get the grammar
//! unstuck, widen to skipping forward to a resync point. Each successful
//! repair is recorded as a [`matchbox_core::ParseError`] with
//! [`matchbox_core::RepairKind`] rather than silently swallowed.
//!
//! This is the NORMAL / LOCATED / GIVE_UP shape of a classic recovering
//! parser: NORMAL is the plain match loop, LOCATED is "we know where it
//! broke and are trying a repair", GIVE_UP is "repairs exhausted, report the
//! farthest failure and stop". `RepairKind::Insertion` is not attempted
//! automatically here — doing so would require the runner to know the exact
//! missing character, not just a matcher's display label — but remains part
//! of the error vocabulary for actions that detect and report their own
//! repairs.
//!
//! A deletion repair does not shift a global start cursor and rerun the
//! grammar from there — that would throw away everything matched before the
//! failure point too. Instead each retry runs the whole grammar again from
//! the start, but against a [`DeletionView`] of the buffer with the
//! offending character(s) elided, so the prefix that already matched lines
//! up the same way and only the trouble spot is different.

use std::collections::HashSet;

use matchbox_core::{Char, ErrorKind, InputBuffer, Node, NodeBuilder, ParseError, Position, RepairKind};

use crate::grammar::Grammar;
use crate::limits::Limits;
use crate::matcher::MatcherId;

use super::reporting::farthest_failure_error;
use super::{fresh_state, outcome_from_state, Runner};

const MAX_DELETIONS: usize = 8;
const MAX_RESYNC: usize = 64;

/// A view over `inner` with a set of real indices elided, as if those
/// characters had been deleted from the input. Everything before and after
/// an elided index keeps its original relative order, which is what lets a
/// retry against this view preserve the prefix a previous attempt already
/// matched correctly.
struct DeletionView<'a> {
    inner: &'a dyn InputBuffer,
    index_map: Vec<usize>,
}

impl<'a> DeletionView<'a> {
    fn new(inner: &'a dyn InputBuffer, deleted: &HashSet<usize>) -> Self {
        let index_map = (0..inner.length()).filter(|i| !deleted.contains(i)).collect();
        Self { inner, index_map }
    }

    /// Maps a virtual index back to the real index it stands for. A virtual
    /// index at or past the end of the view maps to the real buffer's own
    /// length, the natural "end of input" bound for both `char_at` and for
    /// translating a matched node's end position back afterwards.
    fn real_bound(&self, virtual_index: usize) -> usize {
        self.index_map.get(virtual_index).copied().unwrap_or(self.inner.length())
    }
}

impl<'a> InputBuffer for DeletionView<'a> {
    fn char_at(&self, index: usize) -> Char {
        match self.index_map.get(index) {
            Some(&real) => self.inner.char_at(real),
            None => Char::Eoi,
        }
    }

    fn extract(&self, start: usize, end: usize) -> String {
        let end = end.min(self.index_map.len());
        if start >= end {
            return String::new();
        }
        self.index_map[start..end]
            .iter()
            .filter_map(|&real| self.inner.char_at(real).as_value())
            .collect()
    }

    fn extract_line(&self, line_no: usize) -> String {
        // Error reporting wants the original line, elided character and
        // all, so a caret can point at exactly what was deleted.
        self.inner.extract_line(line_no)
    }

    fn position(&self, index: usize) -> Position {
        self.inner.position(self.real_bound(index))
    }

    fn length(&self) -> usize {
        self.index_map.len()
    }
}

/// Rebuilds `node`'s tree with every range translated from `view`'s virtual
/// coordinates back to the original buffer's real indices, so callers
/// always see positions in terms of the input they actually handed the
/// runner, not the repaired stream the grammar was replayed against.
fn remap_tree<V: Clone>(node: &Node<V>, view: &DeletionView<'_>) -> Node<V> {
    let start = view.real_bound(node.start());
    let end = view.real_bound(node.end());
    let children: Vec<_> = node.children().iter().map(|c| remap_tree(c, view)).collect();
    NodeBuilder::new(node.label().clone(), start..end, children)
        .with_value(node.value().cloned())
        .build()
}

/// Runs a grammar with bounded automatic error recovery.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecoveringRunner;

impl<V: Clone> Runner<V> for RecoveringRunner {
    fn parse(
        &mut self,
        grammar: &Grammar<V>,
        root: MatcherId,
        buffer: &dyn InputBuffer,
        limits: Limits,
    ) -> super::RunResult<V> {
        let mut deleted: HashSet<usize> = HashSet::new();
        let mut repairs: Vec<ParseError> = Vec::new();
        let mut resync_range: Option<(usize, usize)> = None;

        for round in 0..(MAX_DELETIONS + MAX_RESYNC) {
            let view = DeletionView::new(buffer, &deleted);
            let mut state = fresh_state(&view, limits);
            let (tree, errors) = farthest_failure_error(grammar, root, &mut state)?;

            if let Some(tree) = tree {
                if let Some((start, end)) = resync_range {
                    repairs.push(ParseError::new(ErrorKind::Repair { kind: RepairKind::Resync }, start..end));
                }
                let remapped = remap_tree(&tree, &view);
                return Ok(outcome_from_state(Some(remapped), repairs, &state));
            }

            let failure_index = errors[0].range.start;
            let real_index = view.real_bound(failure_index);
            if real_index >= buffer.length() {
                break;
            }

            if round < MAX_DELETIONS {
                repairs.push(ParseError::new(
                    ErrorKind::Repair { kind: RepairKind::Deletion },
                    real_index..real_index + 1,
                ));
            } else {
                let start = resync_range.map(|(s, _)| s).unwrap_or(real_index);
                resync_range = Some((start, real_index + 1));
            }
            deleted.insert(real_index);
        }

        // Give up: report the farthest failure from one last, fully
        // instrumented pass against whatever got deleted so far.
        let view = DeletionView::new(buffer, &deleted);
        let mut state = fresh_state(&view, limits);
        let (tree, mut errors) = farthest_failure_error(grammar, root, &mut state)?;
        repairs.append(&mut errors);
        let remapped = tree.map(|t| remap_tree(&t, &view));
        Ok(outcome_from_state(remapped, repairs, &state))
    }
}
