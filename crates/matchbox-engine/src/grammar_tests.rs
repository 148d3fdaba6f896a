use crate::grammar::Grammar;
use crate::matcher::CharSet;

#[test]
fn repeated_calls_with_same_args_are_cached() {
    let mut g: Grammar<()> = Grammar::new();
    let a1 = g.char('a');
    let a2 = g.char('a');
    assert_eq!(a1, a2);
}

#[test]
fn distinct_args_are_not_cached_together() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let b = g.char('b');
    assert_ne!(a, b);
}

#[test]
fn actions_are_never_cached() {
    let mut g: Grammar<()> = Grammar::new();
    let a1 = g.action(|_| Ok(true));
    let a2 = g.action(|_| Ok(true));
    assert_ne!(a1, a2);
}

#[test]
fn single_element_sequence_folds_to_its_child() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let seq = g.sequence(vec![a]);
    assert_eq!(seq, a);
}

#[test]
fn single_element_first_of_folds_to_its_child() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let alt = g.first_of(vec![a]);
    assert_eq!(alt, a);
}

#[test]
fn ignore_case_without_case_distinction_folds_to_char() {
    let mut g: Grammar<()> = Grammar::new();
    let digit = g.ignore_case('5');
    let plain = g.char('5');
    assert_eq!(digit, plain);
}

#[test]
fn ignore_case_with_case_distinction_stays_distinct_from_char() {
    let mut g: Grammar<()> = Grammar::new();
    let ci = g.ignore_case('a');
    let plain = g.char('a');
    assert_ne!(ci, plain);
}

#[test]
fn any_of_singleton_folds_to_char() {
    let mut g: Grammar<()> = Grammar::new();
    let set = CharSet::inclusive(vec![('x', 'x')]);
    let any_of = g.any_of(set);
    let plain = g.char('x');
    assert_eq!(any_of, plain);
}

#[test]
fn single_char_string_folds_to_char() {
    let mut g: Grammar<()> = Grammar::new();
    let s = g.string("q");
    let plain = g.char('q');
    assert_eq!(s, plain);
}

#[test]
fn all_literal_first_of_folds_to_first_of_strings() {
    let mut g: Grammar<()> = Grammar::new();
    let foo = g.string("foo");
    let bar = g.string("bar");
    let alt = g.first_of(vec![foo, bar]);
    assert_eq!(g.label_of(alt).text(), "FirstOfStrings");
}

#[test]
fn mixed_first_of_does_not_fold_to_first_of_strings() {
    let mut g: Grammar<()> = Grammar::new();
    let foo = g.string("foo");
    let any = g.any();
    let alt = g.first_of(vec![foo, any]);
    assert_eq!(g.label_of(alt).text(), "FirstOf");
}

#[test]
fn longer_literal_listed_before_its_own_prefix_does_not_fold_to_a_trie() {
    // A trie walk always commits to the shortest matching literal on a
    // shared path, so folding `FirstOf("foobar", "foo")` into one would
    // silently reorder which alternative wins. Left as plain `FirstOf` so
    // ordered-choice semantics still hold.
    let mut g: Grammar<()> = Grammar::new();
    let foobar = g.string("foobar");
    let foo = g.string("foo");
    let alt = g.first_of(vec![foobar, foo]);
    assert_eq!(g.label_of(alt).text(), "FirstOf");
}

#[test]
fn labelled_does_not_disturb_targets_cache_entry() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let _labelled = g.labelled(a, "custom");
    let a_again = g.char('a');
    assert_eq!(a, a_again);
    assert!(!g.label_of(a).is_custom());
}

#[test]
fn forward_ref_then_resolve_is_transparent() {
    let mut g: Grammar<()> = Grammar::new();
    let placeholder = g.forward_ref();
    let a = g.char('a');
    g.resolve(placeholder, a).unwrap();
    assert!(g.resolve(placeholder, a).is_err());
}

#[test]
fn forward_ref_cannot_resolve_to_itself() {
    let mut g: Grammar<()> = Grammar::new();
    let placeholder = g.forward_ref();
    assert!(g.resolve(placeholder, placeholder).is_err());
}
