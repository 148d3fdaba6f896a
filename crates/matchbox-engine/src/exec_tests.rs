use matchbox_core::DefaultInputBuffer;

use crate::context::ExecState;
use crate::exec::{run, NoOpObserver};
use crate::grammar::Grammar;

fn parse<V: Clone>(grammar: &Grammar<V>, root: crate::matcher::MatcherId, input: &str) -> (Option<matchbox_core::Node<V>>, usize) {
    let buffer = DefaultInputBuffer::new(input);
    let mut state: ExecState<'_, V> = ExecState::new(&buffer);
    let mut observer = NoOpObserver;
    let tree = run(grammar, root, &mut state, &mut observer).unwrap();
    (tree, state.cursor)
}

#[test]
fn single_char_matches_and_advances() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let (tree, cursor) = parse(&g, a, "a");
    assert!(tree.is_some());
    assert_eq!(cursor, 1);
}

#[test]
fn single_char_failure_rolls_back_cursor() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let (tree, cursor) = parse(&g, a, "b");
    assert!(tree.is_none());
    assert_eq!(cursor, 0);
}

#[test]
fn sequence_matches_children_in_order() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let b = g.char('b');
    let seq = g.sequence(vec![a, b]);
    let (tree, cursor) = parse(&g, seq, "ab");
    let tree = tree.expect("sequence should match");
    assert_eq!(tree.children().len(), 2);
    assert_eq!(cursor, 2);
}

#[test]
fn sequence_rolls_back_whole_frame_on_partial_failure() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let b = g.char('b');
    let seq = g.sequence(vec![a, b]);
    let (tree, cursor) = parse(&g, seq, "ax");
    assert!(tree.is_none());
    assert_eq!(cursor, 0);
}

#[test]
fn first_of_tries_alternatives_left_to_right() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let b = g.char('b');
    let alt = g.first_of(vec![a, b]);
    let (tree, cursor) = parse(&g, alt, "b");
    assert!(tree.is_some());
    assert_eq!(cursor, 1);
}

#[test]
fn optional_succeeds_without_consuming_when_absent() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let opt = g.optional(a);
    let (tree, cursor) = parse(&g, opt, "b");
    let tree = tree.expect("optional always succeeds");
    assert_eq!(tree.children().len(), 0);
    assert_eq!(cursor, 0);
}

#[test]
fn zero_or_more_counts_every_repetition() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let star = g.zero_or_more(a);
    let (tree, cursor) = parse(&g, star, "aaab");
    let tree = tree.expect("zero_or_more always succeeds");
    assert_eq!(tree.children().len(), 3);
    assert_eq!(cursor, 3);
}

#[test]
fn one_or_more_requires_at_least_one_match() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let plus = g.one_or_more(a);
    let (tree, cursor) = parse(&g, plus, "b");
    assert!(tree.is_none());
    assert_eq!(cursor, 0);
}

#[test]
fn test_predicate_never_consumes_input() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let look = g.test(a);
    let (tree, cursor) = parse(&g, look, "a");
    assert!(tree.is_some());
    assert_eq!(cursor, 0);
}

#[test]
fn test_not_fails_when_subrule_matches() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let neg = g.test_not(a);
    let (tree, cursor) = parse(&g, neg, "a");
    assert!(tree.is_none());
    assert_eq!(cursor, 0);
}

#[test]
fn test_not_succeeds_when_subrule_fails() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let neg = g.test_not(a);
    let (tree, cursor) = parse(&g, neg, "b");
    assert!(tree.is_some());
    assert_eq!(cursor, 0);
}

#[test]
fn action_net_push_binds_value_to_enclosing_frame() {
    let mut g: Grammar<i32> = Grammar::new();
    let a = g.char('a');
    let act = g.action(|ctx| {
        ctx.push(42);
        Ok(true)
    });
    let seq = g.sequence(vec![a, act]);
    let (tree, _) = parse(&g, seq, "a");
    let tree = tree.expect("sequence should match");
    assert_eq!(tree.value(), Some(&42));
}

#[test]
fn action_returning_false_fails_the_frame() {
    let mut g: Grammar<i32> = Grammar::new();
    let act = g.action(|_ctx| Ok(false));
    let (tree, cursor) = parse(&g, act, "anything");
    assert!(tree.is_none());
    assert_eq!(cursor, 0);
}

#[test]
fn forward_ref_supports_left_recursive_style_repetition() {
    let mut g: Grammar<()> = Grammar::new();
    let placeholder = g.forward_ref();
    let a = g.char('a');
    let recurse = g.optional(placeholder);
    let body = g.sequence(vec![a, recurse]);
    g.resolve(placeholder, body).unwrap();

    let (tree, cursor) = parse(&g, body, "aaa");
    assert!(tree.is_some());
    assert_eq!(cursor, 3);
}

#[test]
fn labelled_wraps_target_without_changing_match_semantics() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let labelled = g.labelled(a, "letter-a");
    let (tree, cursor) = parse(&g, labelled, "a");
    assert!(tree.is_some());
    assert_eq!(cursor, 1);
    assert_eq!(g.label_of(labelled).text(), "letter-a");
}

#[test]
fn recursion_limit_aborts_the_parse() {
    // `placeholder` resolves to an `Optional` that recurses straight back
    // into `placeholder` with no base case; every round trip is a framed
    // `Optional` call, so the recursion guard is what stops this, not a
    // failing leaf matcher.
    let mut g: Grammar<()> = Grammar::new();
    let placeholder = g.forward_ref();
    let wrapped = g.optional(placeholder);
    g.resolve(placeholder, wrapped).unwrap();

    let buffer = DefaultInputBuffer::new("");
    let mut state: ExecState<'_, ()> = ExecState::new(&buffer);
    state.max_recursion = Some(3);
    let mut observer = NoOpObserver;
    let result = run(&g, placeholder, &mut state, &mut observer);
    assert!(result.is_err());
}
