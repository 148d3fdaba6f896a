//! Grammar construction: the combinator set, with structural caching.
//!
//! Two calls with identical arguments to a rule-creating combinator return
//! the same [`MatcherId`] (barring `Action`, which has no structural
//! identity to cache on). This keeps recursive grammars finite and makes
//! `MatcherId` equality a valid cycle check.

use std::rc::Rc;

use indexmap::IndexMap;
use matchbox_core::{Char, GrammarError, Label};

use crate::context::ActionContext;
use crate::matcher::{default_label, CharSet, MatcherId, MatcherKind, MatcherNode, Trie};

#[derive(Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Char(Char),
    CharIgnoreCase(char),
    CharRange(char, char),
    AnyOf(Vec<(char, char)>, bool),
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
    StringLit(Vec<char>),
    FirstOfStrings(Vec<Vec<char>>),
    Labelled(MatcherId, Rc<str>),
}

/// Owns the matcher arena and the combinator cache for one grammar.
///
/// Grammars are not explicitly "frozen": once a root is handed to a runner,
/// further mutation is undefined behavior for that parse, the same way it
/// would be in any arena-backed recursive graph mutated mid-traversal, but
/// nothing stops the caller from calling a builder method again — there is
/// no separate builder/frozen type split, kept that way deliberately (see
/// DESIGN.md).
pub struct Grammar<V> {
    arena: Vec<MatcherNode<V>>,
    cache: IndexMap<CacheKey, MatcherId>,
}

impl<V> Default for Grammar<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Grammar<V> {
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            cache: IndexMap::new(),
        }
    }

    pub fn node(&self, id: MatcherId) -> &MatcherNode<V> {
        &self.arena[id.index()]
    }

    fn push(&mut self, kind: MatcherKind<V>, flags: crate::matcher::Flags) -> MatcherId {
        let label = default_label(&kind);
        self.arena.push(MatcherNode { kind, flags, label });
        MatcherId((self.arena.len() - 1) as u32)
    }

    fn intern(
        &mut self,
        key: CacheKey,
        flags: crate::matcher::Flags,
        build: impl FnOnce() -> MatcherKind<V>,
    ) -> MatcherId {
        if let Some(id) = self.cache.get(&key) {
            return *id;
        }
        let id = self.push(build(), flags);
        self.cache.insert(key, id);
        id
    }

    // -- leaf combinators ---------------------------------------------------

    pub fn char(&mut self, c: char) -> MatcherId {
        self.char_value(Char::Value(c))
    }

    pub fn eoi(&mut self) -> MatcherId {
        self.char_value(Char::Eoi)
    }

    pub fn indent(&mut self) -> MatcherId {
        self.char_value(Char::Indent)
    }

    pub fn dedent(&mut self) -> MatcherId {
        self.char_value(Char::Dedent)
    }

    fn char_value(&mut self, c: Char) -> MatcherId {
        let flags = leaf_flags();
        self.intern(CacheKey::Char(c), flags, || MatcherKind::Char(c))
    }

    /// Folds to `Char(c)` when `c` has no case distinction.
    pub fn ignore_case(&mut self, c: char) -> MatcherId {
        let lower = c.to_lowercase().next().unwrap_or(c);
        let upper = c.to_uppercase().next().unwrap_or(c);
        if lower == upper {
            return self.char(c);
        }
        let flags = leaf_flags();
        self.intern(CacheKey::CharIgnoreCase(c), flags, || {
            MatcherKind::CharIgnoreCase(c)
        })
    }

    pub fn char_range(&mut self, lo: char, hi: char) -> MatcherId {
        let flags = leaf_flags();
        self.intern(CacheKey::CharRange(lo, hi), flags, || {
            MatcherKind::CharRange(lo, hi)
        })
    }

    /// Folds to `Char(c)` when `set` is a single, non-negated character.
    pub fn any_of(&mut self, set: CharSet) -> MatcherId {
        if let Some(c) = set.as_singleton() {
            return self.char(c);
        }
        let flags = leaf_flags();
        let key_ranges = set_key(&set);
        self.intern(CacheKey::AnyOf(key_ranges.0, key_ranges.1), flags, || {
            MatcherKind::AnyOf(set)
        })
    }

    pub fn any(&mut self) -> MatcherId {
        let flags = leaf_flags();
        self.intern(CacheKey::Any, flags, || MatcherKind::Any)
    }

    pub fn empty(&mut self) -> MatcherId {
        let flags = leaf_flags();
        self.intern(CacheKey::Empty, flags, || MatcherKind::Empty)
    }

    pub fn nothing(&mut self) -> MatcherId {
        let flags = leaf_flags();
        self.intern(CacheKey::Nothing, flags, || MatcherKind::Nothing)
    }

    /// Folds to `Char` when `text` is a single character.
    pub fn string(&mut self, text: &str) -> MatcherId {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() == 1 {
            return self.char(chars[0]);
        }
        let flags = leaf_flags();
        let lit: Rc<[char]> = Rc::from(chars.clone());
        self.intern(CacheKey::StringLit(chars), flags, || MatcherKind::StringLit(lit))
    }

    // -- composite combinators ----------------------------------------------

    /// A `Sequence` of a single rule returns that rule unmodified.
    pub fn sequence(&mut self, rules: Vec<MatcherId>) -> MatcherId {
        if rules.len() == 1 {
            return rules[0];
        }
        self.intern(CacheKey::Sequence(rules.clone()), Default::default(), || {
            MatcherKind::Sequence(rules)
        })
    }

    /// A `FirstOf` of a single rule returns that rule unmodified. A `FirstOf`
    /// whose every subrule is a string literal folds to the trie variant,
    /// provided the fold cannot reorder which literal wins (see
    /// `literal_order_is_trie_safe`).
    pub fn first_of(&mut self, rules: Vec<MatcherId>) -> MatcherId {
        if rules.len() == 1 {
            return rules[0];
        }
        if let Some(literals) = self.all_string_literals(&rules) {
            if literal_order_is_trie_safe(&literals) {
                return self.first_of_strings(literals);
            }
        }
        self.intern(CacheKey::FirstOf(rules.clone()), Default::default(), || {
            MatcherKind::FirstOf(rules)
        })
    }

    fn all_string_literals(&self, rules: &[MatcherId]) -> Option<Vec<Rc<[char]>>> {
        let mut out = Vec::with_capacity(rules.len());
        for &id in rules {
            match &self.node(id).kind {
                MatcherKind::StringLit(s) => out.push(s.clone()),
                MatcherKind::Char(Char::Value(c)) => out.push(Rc::from(vec![*c])),
                _ => return None,
            }
        }
        Some(out)
    }

    pub fn first_of_strings(&mut self, literals: Vec<Rc<[char]>>) -> MatcherId {
        let key = literals.iter().map(|l| l.to_vec()).collect();
        self.intern(CacheKey::FirstOfStrings(key), Default::default(), || {
            MatcherKind::FirstOfStrings(Rc::new(Trie::build(&literals)))
        })
    }

    pub fn optional(&mut self, rule: MatcherId) -> MatcherId {
        self.intern(CacheKey::Optional(rule), Default::default(), || {
            MatcherKind::Optional(rule)
        })
    }

    pub fn zero_or_more(&mut self, rule: MatcherId) -> MatcherId {
        self.intern(CacheKey::ZeroOrMore(rule), Default::default(), || {
            MatcherKind::ZeroOrMore(rule)
        })
    }

    pub fn one_or_more(&mut self, rule: MatcherId) -> MatcherId {
        self.intern(CacheKey::OneOrMore(rule), Default::default(), || {
            MatcherKind::OneOrMore(rule)
        })
    }

    /// `Test`/`TestNot` never emit nodes, by construction.
    pub fn test(&mut self, rule: MatcherId) -> MatcherId {
        self.intern(CacheKey::Test(rule), predicate_flags(), || MatcherKind::Test(rule))
    }

    pub fn test_not(&mut self, rule: MatcherId) -> MatcherId {
        self.intern(CacheKey::TestNot(rule), predicate_flags(), || {
            MatcherKind::TestNot(rule)
        })
    }

    /// Actions have no structural identity to cache on — every call
    /// allocates a fresh matcher. `f` returns `Ok(true)`/`Ok(false)` for an
    /// ordinary match/fail, or `Err(message)` to raise a fault that's
    /// reported as `ErrorKind::ActionException` instead of an ordinary
    /// `InvalidInput`.
    pub fn action(
        &mut self,
        f: impl Fn(&mut ActionContext<'_, V>) -> Result<bool, String> + 'static,
    ) -> MatcherId {
        let flags = crate::matcher::Flags {
            suppress_node: true,
            ..Default::default()
        };
        self.push(MatcherKind::Action(Rc::new(f)), flags)
    }

    // -- labelling and recursion ---------------------------------------------

    /// Reserves an id for a recursive rule whose body references itself.
    /// Build the body using the returned id, then call [`Grammar::resolve`].
    pub fn forward_ref(&mut self) -> MatcherId {
        self.push(MatcherKind::Ref(MatcherId(u32::MAX)), Default::default())
    }

    /// Fills in a `forward_ref`'d id. Matching `id` afterwards is
    /// indistinguishable from matching `target` directly.
    pub fn resolve(&mut self, id: MatcherId, target: MatcherId) -> Result<(), GrammarError> {
        if !matches!(self.node(id).kind, MatcherKind::Ref(r) if r.0 == u32::MAX) {
            return Err(GrammarError {
                message: "resolve() called on an already-resolved or non-forward-ref matcher"
                    .to_string(),
            });
        }
        if target == id {
            return Err(GrammarError {
                message: "a forward reference cannot resolve directly to itself".to_string(),
            });
        }
        self.arena[id.index()].kind = MatcherKind::Ref(target);
        Ok(())
    }

    /// Wraps `target` with a custom label, without disturbing `target`'s own cached identity.
    pub fn labelled(&mut self, target: MatcherId, name: impl Into<Rc<str>>) -> MatcherId {
        let name = name.into();
        let key = CacheKey::Labelled(target, name.clone());
        self.intern(key, Default::default(), || MatcherKind::Labelled(target))
            .with_label(self, Label::Custom(name))
    }

    pub fn label_of(&self, id: MatcherId) -> &Label {
        &self.node(id).label
    }
}

/// A trie walk always commits to the *shortest* matching literal in the
/// set, since that terminal sits at the shallowest depth on any shared
/// path. That coincides with ordered-choice commitment only if, whenever
/// one literal is a proper prefix of another, the longer one is not
/// listed *before* the shorter one — otherwise the trie would pick the
/// shorter literal even though `FirstOf` would have tried (and matched)
/// the longer one first.
fn literal_order_is_trie_safe(literals: &[Rc<[char]>]) -> bool {
    for (j, earlier) in literals.iter().enumerate() {
        for later in &literals[j + 1..] {
            if later.len() < earlier.len() && earlier.starts_with(later.as_ref()) {
                return false;
            }
        }
    }
    true
}

fn leaf_flags() -> crate::matcher::Flags {
    crate::matcher::Flags {
        suppress_subnodes: true,
        ..Default::default()
    }
}

fn predicate_flags() -> crate::matcher::Flags {
    crate::matcher::Flags {
        suppress_node: true,
        node_suppressed_in_predicate: true,
        ..Default::default()
    }
}

fn set_key(set: &CharSet) -> (Vec<(char, char)>, bool) {
    // `CharSet` does not expose its fields publicly outside this crate's
    // matcher module, so re-derive the key through the public `contains`
    // surface would be wasteful; instead mirror the struct shape here.
    // (Kept as a free function rather than a method on `CharSet` because it
    // is purely a caching concern.)
    crate::matcher::char_set_parts(set)
}

trait WithLabel<V> {
    fn with_label(self, grammar: &mut Grammar<V>, label: Label) -> MatcherId;
}

impl<V> WithLabel<V> for MatcherId {
    fn with_label(self, grammar: &mut Grammar<V>, label: Label) -> MatcherId {
        grammar.arena[self.index()].label = label;
        self
    }
}
