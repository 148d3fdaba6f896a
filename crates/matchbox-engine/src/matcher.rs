//! The matcher algebra: a closed, tagged set of primitive and composite
//! matcher variants, addressed by index into an append-only arena.
//!
//! Matchers never own their children directly — a composite holds the
//! [`MatcherId`]s of its subrules, not the subrules themselves. This is what
//! lets a recursive grammar (`A -> ... A ...`) exist at all in an
//! ownership-disciplined language: the cycle lives in the arena, not in the
//! type.

use std::rc::Rc;

use matchbox_core::{Char, Label};

use crate::context::ActionContext;

/// An index into a [`crate::grammar::Grammar`]'s matcher arena.
///
/// Two `MatcherId`s are equal iff they name the same arena slot, which is
/// exactly the cycle check a visitor needs when walking a recursive grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatcherId(pub(crate) u32);

impl MatcherId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-matcher behavior flags (see the data model's `Matcher` record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    /// Never emit a tree node for this matcher; splice its children into the parent instead.
    pub suppress_node: bool,
    /// Emit a node for this matcher, but with no children.
    pub suppress_subnodes: bool,
    /// Splice this matcher's children into the parent instead of emitting its
    /// own node. Same runtime effect as `suppress_node` -- kept as a distinct
    /// field because the data model names them as two separate flags. No
    /// combinator in this crate sets it yet; it's here for a future
    /// transparent-wrapper combinator that wants the splice behavior under
    /// its own name rather than borrowing `suppress_node`'s.
    pub skip_node: bool,
    /// Suppressed only while executing inside a `Test`/`TestNot` predicate.
    pub node_suppressed_in_predicate: bool,
}

/// An inclusive-range character set, either taken at face value or
/// complemented (every character *not* covered by the ranges).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharSet {
    ranges: Vec<(char, char)>,
    negated: bool,
}

impl CharSet {
    pub fn inclusive(ranges: Vec<(char, char)>) -> Self {
        Self { ranges, negated: false }
    }

    pub fn complement(ranges: Vec<(char, char)>) -> Self {
        Self { ranges, negated: true }
    }

    pub fn contains(&self, c: char) -> bool {
        let in_ranges = self.ranges.iter().any(|(lo, hi)| *lo <= c && c <= *hi);
        in_ranges != self.negated
    }

    /// The single character this set matches, if it is exactly one
    /// non-negated, single-character range (used by the `any_of` folding rule).
    pub(crate) fn as_singleton(&self) -> Option<char> {
        if !self.negated && self.ranges.len() == 1 && self.ranges[0].0 == self.ranges[0].1 {
            Some(self.ranges[0].0)
        } else {
            None
        }
    }
}

/// Exposes a `CharSet`'s ranges/negation for the grammar cache key. Kept
/// free-standing rather than public fields so construction still goes
/// through `inclusive`/`complement`.
pub(crate) fn char_set_parts(set: &CharSet) -> (Vec<(char, char)>, bool) {
    (set.ranges.clone(), set.negated)
}

/// A shared-prefix trie over string-literal alternatives, used by
/// [`MatcherKind::FirstOfStrings`] for O(max-length) lookup instead of
/// O(alternative count × length).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trie {
    nodes: Vec<TrieNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
struct TrieNode {
    edges: Vec<(char, usize)>,
    terminal: bool,
}

impl Trie {
    pub fn build(literals: &[Rc<[char]>]) -> Self {
        let mut nodes = vec![TrieNode::default()];
        for lit in literals {
            let mut cur = 0;
            for &c in lit.iter() {
                let next = match nodes[cur].edges.iter().find(|(ch, _)| *ch == c) {
                    Some((_, n)) => *n,
                    None => {
                        nodes.push(TrieNode::default());
                        let n = nodes.len() - 1;
                        nodes[cur].edges.push((c, n));
                        n
                    }
                };
                cur = next;
            }
            nodes[cur].terminal = true;
        }
        Self { nodes }
    }

    /// Walk the trie against `peek`, committing to the length of the
    /// **first** literal reached along the way — this is a shared-prefix
    /// reinterpretation of `FirstOf`'s left-to-right ordered choice, so a
    /// literal that is itself a prefix of a later one must win, exactly as
    /// `FirstOf(r1, r2)` would commit to `r1` without ever trying `r2`.
    pub fn first_match(&self, mut peek: impl FnMut(usize) -> Option<char>) -> Option<usize> {
        let mut cur = 0;
        let mut depth = 0;
        loop {
            if self.nodes[cur].terminal {
                return Some(depth);
            }
            let Some(c) = peek(depth) else { return None };
            match self.nodes[cur].edges.iter().find(|(ch, _)| *ch == c) {
                Some((_, next)) => {
                    cur = *next;
                    depth += 1;
                }
                None => return None,
            }
        }
    }
}

/// The closed set of matcher variants.
pub enum MatcherKind<V> {
    Char(Char),
    CharIgnoreCase(char),
    CharRange(char, char),
    AnyOf(CharSet),
    Any,
    Empty,
    Nothing,
    Sequence(Vec<MatcherId>),
    FirstOf(Vec<MatcherId>),
    Optional(MatcherId),
    ZeroOrMore(MatcherId),
    OneOrMore(MatcherId),
    Test(MatcherId),
    TestNot(MatcherId),
    /// `Ok(true)`/`Ok(false)` are an ordinary match/fail; `Err(message)` is a
    /// raised fault, caught at the frame boundary and reported as
    /// `ErrorKind::ActionException` rather than an `InvalidInput`.
    Action(Rc<dyn Fn(&mut ActionContext<'_, V>) -> Result<bool, String>>),
    StringLit(Rc<[char]>),
    FirstOfStrings(Rc<Trie>),
    /// Transparent forward reference, resolved once the recursive rule's
    /// body is fully built. Never gets its own frame: matching a `Ref`
    /// is indistinguishable from matching its target directly.
    Ref(MatcherId),
    /// A thin, non-folding wrapper used purely to attach a custom label to
    /// an existing matcher without disturbing its cached identity.
    Labelled(MatcherId),
}

/// One arena slot: a matcher's behavior plus its label and flags.
pub struct MatcherNode<V> {
    pub kind: MatcherKind<V>,
    pub flags: Flags,
    pub label: Label,
}

/// True for the matcher kinds that consume input directly. Used by the
/// reporting runner to tell a real "input didn't match here" failure from a
/// composite (`Sequence`, `FirstOf`, ...) merely propagating one.
pub(crate) fn is_terminal<V>(kind: &MatcherKind<V>) -> bool {
    matches!(
        kind,
        MatcherKind::Char(_)
            | MatcherKind::CharIgnoreCase(_)
            | MatcherKind::CharRange(_, _)
            | MatcherKind::AnyOf(_)
            | MatcherKind::Any
            | MatcherKind::Nothing
            | MatcherKind::StringLit(_)
            | MatcherKind::FirstOfStrings(_)
    )
}

pub(crate) fn default_label<V>(kind: &MatcherKind<V>) -> Label {
    let text: Rc<str> = match kind {
        MatcherKind::Char(Char::Value(c)) => Rc::from(format!("'{c}'")),
        MatcherKind::Char(Char::Eoi) => Rc::from("EOI"),
        MatcherKind::Char(Char::Indent) => Rc::from("INDENT"),
        MatcherKind::Char(Char::Dedent) => Rc::from("DEDENT"),
        MatcherKind::CharIgnoreCase(c) => Rc::from(format!("'{c}' (any case)")),
        MatcherKind::CharRange(lo, hi) => Rc::from(format!("'{lo}'..'{hi}'")),
        MatcherKind::AnyOf(_) => Rc::from("character class"),
        MatcherKind::Any => Rc::from("ANY"),
        MatcherKind::Empty => Rc::from("EMPTY"),
        MatcherKind::Nothing => Rc::from("NOTHING"),
        MatcherKind::Sequence(_) => Rc::from("Sequence"),
        MatcherKind::FirstOf(_) => Rc::from("FirstOf"),
        MatcherKind::Optional(_) => Rc::from("Optional"),
        MatcherKind::ZeroOrMore(_) => Rc::from("ZeroOrMore"),
        MatcherKind::OneOrMore(_) => Rc::from("OneOrMore"),
        MatcherKind::Test(_) => Rc::from("Test"),
        MatcherKind::TestNot(_) => Rc::from("TestNot"),
        MatcherKind::Action(_) => Rc::from("Action"),
        MatcherKind::StringLit(s) => Rc::from(format!("\"{}\"", s.iter().collect::<String>())),
        MatcherKind::FirstOfStrings(_) => Rc::from("FirstOfStrings"),
        MatcherKind::Ref(_) => Rc::from("Ref"),
        MatcherKind::Labelled(_) => Rc::from("Labelled"),
    };
    Label::Default(text)
}
