//! The recursive-descent match dispatcher: one function that knows how to
//! execute every [`MatcherKind`] variant against an [`ExecState`], with
//! cursor/value-stack rollback on failure and tree-node construction on
//! success.
//!
//! Every matcher frame follows the same shape: snapshot, dispatch on kind,
//! either roll back and fail or build the node(s) its flags call for. The
//! four runner strategies differ only in what they do with an [`Observer`]
//! plugged into this loop — the matching itself never changes.

use std::ops::Range;

use matchbox_core::{Char, Node, NodeBuilder};

use crate::context::{ActionContext, ExecLimitExceeded, ExecState, PathEntry};
use crate::grammar::Grammar;
use crate::matcher::{Flags, MatcherId, MatcherKind};

/// Hook point for runners that need to see individual frame events
/// (farthest-failure tracking, repair, tracing) without duplicating the
/// match loop itself.
pub trait Observer<V> {
    fn on_enter(&mut self, _id: MatcherId, _cursor: usize) {}
    fn on_success(&mut self, _id: MatcherId, _range: Range<usize>) {}
    /// `path` still includes the failing matcher's own entry, so an
    /// observer wanting to remember "how we got here" for an error message
    /// can snapshot it directly.
    fn on_fail(&mut self, _id: MatcherId, _at: usize, _path: &[PathEntry]) {}
    /// An `Action` raised a fault instead of returning an ordinary
    /// `true`/`false`. The frame still fails like any other match failure;
    /// this is purely a side channel for runners that want to report the
    /// fault's message as `ErrorKind::ActionException`.
    fn on_action_fault(&mut self, _id: MatcherId, _at: usize, _message: &str) {}
}

/// An observer that does nothing, for callers that only want the match result.
pub struct NoOpObserver;

impl<V> Observer<V> for NoOpObserver {}

/// Runs `root` against `state` from the current cursor.
///
/// `Ok(None)` means the grammar failed to match at the current cursor;
/// `Err` means an execution guard (recursion or step fuel) tripped and the
/// parse was aborted outright.
pub fn run<V: Clone>(
    grammar: &Grammar<V>,
    root: MatcherId,
    state: &mut ExecState<'_, V>,
    observer: &mut dyn Observer<V>,
) -> Result<Option<Node<V>>, ExecLimitExceeded> {
    Ok(match_matcher(grammar, root, state, &[], observer)?.and_then(|mut nodes| nodes.pop()))
}

/// Matches `id` at `state.cursor`. On success, returns the node(s) this
/// frame contributes to its parent's children list (usually one, zero if
/// suppressed/skipped, more than one only via splicing). On failure,
/// `state` is left exactly as it was on entry.
pub(crate) fn match_matcher<V: Clone>(
    grammar: &Grammar<V>,
    id: MatcherId,
    state: &mut ExecState<'_, V>,
    siblings: &[Node<V>],
    observer: &mut dyn Observer<V>,
) -> Result<Option<Vec<Node<V>>>, ExecLimitExceeded> {
    // `Ref` is a transparent forward reference: it never gets a frame of its
    // own, so it bypasses fuel accounting and node-wrapping entirely.
    if let MatcherKind::Ref(target) = grammar.node(id).kind {
        return match_matcher(grammar, target, state, siblings, observer);
    }

    state.consume_step()?;
    state.enter_recursion()?;
    let mut _guard = RecursionGuard(state);

    let state: &mut ExecState<'_, V> = &mut *_guard.0;
    let start = state.cursor;
    let values_mark = state.values.mark();
    let value_depth_before = state.values.depth();
    let enclosing_start = state.path.last().map(|e| e.start).unwrap_or(start);
    state.path.push(PathEntry { matcher: id, start });
    observer.on_enter(id, start);

    let outcome = dispatch(grammar, id, state, siblings, enclosing_start, observer);

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            state.path.pop();
            return Err(e);
        }
    };

    match outcome {
        Some(children) => {
            state.path.pop();
            let nodes = finish(grammar, id, state, start, value_depth_before, children);
            observer.on_success(id, start..state.cursor);
            Ok(Some(nodes))
        }
        None => {
            observer.on_fail(id, start, &state.path);
            state.path.pop();
            state.cursor = start;
            state.values.restore(values_mark);
            Ok(None)
        }
    }
}

struct RecursionGuard<'s, 'i, V>(&'s mut ExecState<'i, V>);

impl<'s, 'i, V> Drop for RecursionGuard<'s, 'i, V> {
    fn drop(&mut self) {
        self.0.exit_recursion();
    }
}

/// Dispatches on `id`'s kind, returning its own children (not yet wrapped
/// into a node) or `None` on a plain match failure. `Test`/`TestNot` always
/// carry `suppress_node` (see `predicate_flags` in `grammar.rs`), so the
/// `finish` step downstream turns their `Ok(Some(vec![]))` into "splice
/// nothing into the parent" rather than building a node for them.
fn dispatch<V: Clone>(
    grammar: &Grammar<V>,
    id: MatcherId,
    state: &mut ExecState<'_, V>,
    siblings: &[Node<V>],
    enclosing_start: usize,
    observer: &mut dyn Observer<V>,
) -> Result<Option<Vec<Node<V>>>, ExecLimitExceeded> {
    match &grammar.node(id).kind {
        MatcherKind::Char(expected) => Ok(match_char(state, |c| c == *expected)),
        MatcherKind::CharIgnoreCase(expected) => {
            let expected = expected.to_lowercase().next().unwrap_or(*expected);
            Ok(match_char(state, |c| {
                c.as_value()
                    .map(|v| v.to_lowercase().next().unwrap_or(v) == expected)
                    .unwrap_or(false)
            }))
        }
        MatcherKind::CharRange(lo, hi) => {
            let (lo, hi) = (*lo, *hi);
            Ok(match_char(state, |c| {
                c.as_value().map(|v| lo <= v && v <= hi).unwrap_or(false)
            }))
        }
        MatcherKind::AnyOf(set) => Ok(match_char(state, |c| {
            c.as_value().map(|v| set.contains(v)).unwrap_or(false)
        })),
        MatcherKind::Any => Ok(match_char(state, |c| c != Char::Eoi)),
        MatcherKind::Empty => Ok(Some(Vec::new())),
        MatcherKind::Nothing => Ok(None),
        MatcherKind::StringLit(lit) => {
            let start = state.cursor;
            for (offset, &expected) in lit.iter().enumerate() {
                if state.buffer.char_at(start + offset) != Char::Value(expected) {
                    return Ok(None);
                }
            }
            state.cursor = start + lit.len();
            Ok(Some(Vec::new()))
        }
        MatcherKind::FirstOfStrings(trie) => {
            let start = state.cursor;
            let matched = trie.first_match(|offset| state.buffer.char_at(start + offset).as_value());
            match matched {
                Some(len) => {
                    state.cursor = start + len;
                    Ok(Some(Vec::new()))
                }
                None => Ok(None),
            }
        }
        MatcherKind::Sequence(rules) => {
            let rules = rules.clone();
            let mut children = Vec::new();
            for rule in rules {
                match match_matcher(grammar, rule, state, &children, observer)? {
                    Some(nodes) => children.extend(nodes),
                    None => return Ok(None),
                }
            }
            Ok(Some(children))
        }
        MatcherKind::FirstOf(rules) => {
            let rules = rules.clone();
            for rule in rules {
                if let Some(nodes) = match_matcher(grammar, rule, state, siblings, observer)? {
                    return Ok(Some(nodes));
                }
            }
            Ok(None)
        }
        MatcherKind::Optional(rule) => {
            let rule = *rule;
            match match_matcher(grammar, rule, state, siblings, observer)? {
                Some(nodes) => Ok(Some(nodes)),
                None => Ok(Some(Vec::new())),
            }
        }
        MatcherKind::ZeroOrMore(rule) => {
            let rule = *rule;
            let (children, _count) = repeat(grammar, rule, state, observer)?;
            Ok(Some(children))
        }
        MatcherKind::OneOrMore(rule) => {
            let rule = *rule;
            let (children, count) = repeat(grammar, rule, state, observer)?;
            if count == 0 {
                return Ok(None);
            }
            Ok(Some(children))
        }
        MatcherKind::Test(rule) => {
            let rule = *rule;
            let mark = state.values.mark();
            let start = state.cursor;
            state.predicate_depth += 1;
            let result = match_matcher(grammar, rule, state, &[], observer);
            state.predicate_depth -= 1;
            state.cursor = start;
            state.values.restore(mark);
            Ok(result?.map(|_| Vec::new()))
        }
        MatcherKind::TestNot(rule) => {
            let rule = *rule;
            let mark = state.values.mark();
            let start = state.cursor;
            state.predicate_depth += 1;
            let result = match_matcher(grammar, rule, state, &[], observer);
            state.predicate_depth -= 1;
            state.cursor = start;
            state.values.restore(mark);
            match result? {
                Some(_) => Ok(None),
                None => Ok(Some(Vec::new())),
            }
        }
        MatcherKind::Action(f) => {
            let f = f.clone();
            let mut ctx = ActionContext {
                buffer: state.buffer,
                values: &mut state.values,
                path: &state.path,
                siblings,
                frame_start: enclosing_start,
                current: state.cursor,
            };
            match f(&mut ctx) {
                Ok(true) => Ok(Some(Vec::new())),
                Ok(false) => Ok(None),
                Err(message) => {
                    observer.on_action_fault(id, state.cursor, &message);
                    Ok(None)
                }
            }
        }
        MatcherKind::Labelled(target) => {
            let target = *target;
            match match_matcher(grammar, target, state, siblings, observer)? {
                Some(nodes) => Ok(Some(nodes)),
                None => Ok(None),
            }
        }
        MatcherKind::Ref(_) => unreachable!("Ref is handled before dispatch"),
    }
}

fn match_char<V>(state: &mut ExecState<'_, V>, accept: impl FnOnce(Char) -> bool) -> Option<Vec<Node<V>>> {
    let c = state.buffer.char_at(state.cursor);
    if accept(c) {
        state.cursor += 1;
        Some(Vec::new())
    } else {
        None
    }
}

/// Shared `ZeroOrMore`/`OneOrMore` loop: repeats `rule` until it fails or
/// succeeds without advancing the cursor (the zero-width guard — without
/// it, a matcher like `Empty` inside a `ZeroOrMore` would loop forever).
/// Runs `rule` until it fails or succeeds without advancing the cursor (the
/// zero-width guard — without it, a matcher like `Empty` inside a
/// `ZeroOrMore` would loop forever). Returns the spliced children alongside
/// the number of successful iterations, since a fully-suppressed rule can
/// succeed while contributing zero nodes — `OneOrMore` needs the count, not
/// the node vector's length, to tell "matched nothing" from "matched once,
/// invisibly".
fn repeat<V: Clone>(
    grammar: &Grammar<V>,
    rule: MatcherId,
    state: &mut ExecState<'_, V>,
    observer: &mut dyn Observer<V>,
) -> Result<(Vec<Node<V>>, usize), ExecLimitExceeded> {
    let mut children = Vec::new();
    let mut count = 0;
    loop {
        let iter_start = state.cursor;
        match match_matcher(grammar, rule, state, &children, observer)? {
            Some(nodes) => {
                let advanced = state.cursor != iter_start;
                children.extend(nodes);
                count += 1;
                if !advanced {
                    break;
                }
            }
            None => break,
        }
    }
    Ok((children, count))
}

/// Applies a matcher's flags to its raw children, producing what this
/// frame contributes to its parent.
fn finish<V: Clone>(
    grammar: &Grammar<V>,
    id: MatcherId,
    state: &ExecState<'_, V>,
    start: usize,
    value_depth_before: usize,
    children: Vec<Node<V>>,
) -> Vec<Node<V>> {
    let info = grammar.node(id);
    let flags: Flags = info.flags;

    // `suppressNode` and `skipNode` have the same splice-into-parent effect
    // (see `Flags::skip_node`'s doc comment) -- they're kept as separate
    // fields because the data model names them separately, not because
    // they behave differently.
    if flags.skip_node || flags.suppress_node || (flags.node_suppressed_in_predicate && state.predicate_depth > 0) {
        return children;
    }

    let value = if state.values.depth() == value_depth_before + 1 {
        state.values.peek().cloned()
    } else {
        None
    };
    let node_children = if flags.suppress_subnodes { Vec::new() } else { children };
    let node = NodeBuilder::new(info.label.clone(), start..state.cursor, node_children)
        .with_value(value)
        .build();
    vec![node]
}
