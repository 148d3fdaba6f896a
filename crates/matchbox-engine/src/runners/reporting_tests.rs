use matchbox_core::{DefaultInputBuffer, ErrorKind};

use crate::grammar::Grammar;
use crate::limits::Limits;

use super::reporting::farthest_failure_error;
use super::{fresh_state, ReportingRunner, Runner};

#[test]
fn successful_parse_has_no_errors() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let buffer = DefaultInputBuffer::new("a");

    let outcome = ReportingRunner.parse(&g, a, &buffer, Limits::default()).unwrap();
    assert!(outcome.tree.is_some());
    assert!(outcome.errors.is_empty());
}

#[test]
fn failure_reports_the_farthest_position_reached() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let b = g.char('b');
    let c = g.char('c');
    // "ab" then "c": the failure should be reported at index 2, not index 0,
    // since the grammar got that far before giving up.
    let seq = g.sequence(vec![a, b, c]);
    let buffer = DefaultInputBuffer::new("abx");

    let outcome = ReportingRunner.parse(&g, seq, &buffer, Limits::default()).unwrap();
    assert!(outcome.tree.is_none());
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].range.start, 2);
    assert!(matches!(outcome.errors[0].kind, ErrorKind::InvalidInput { .. }));
}

#[test]
fn action_fault_is_reported_as_an_action_exception() {
    let mut g: Grammar<()> = Grammar::new();
    let act = g.action(|_ctx| Err("bad token".to_string()));
    let buffer = DefaultInputBuffer::new("anything");

    let mut state = fresh_state(&buffer, Limits::default());
    let (tree, errors) = farthest_failure_error(&g, act, &mut state).unwrap();

    assert!(tree.is_none());
    assert_eq!(errors.len(), 1);
    let ErrorKind::ActionException { message } = &errors[0].kind else {
        panic!("expected an ActionException");
    };
    assert_eq!(message, "bad token");
}

#[test]
fn failure_at_a_custom_labelled_rule_uses_that_label() {
    let mut g: Grammar<()> = Grammar::new();
    let digit = g.char_range('0', '9');
    let labelled = g.labelled(digit, "digit");
    let buffer = DefaultInputBuffer::new("x");

    let outcome = ReportingRunner.parse(&g, labelled, &buffer, Limits::default()).unwrap();
    let ErrorKind::InvalidInput { expected, .. } = &outcome.errors[0].kind else {
        panic!("expected InvalidInput");
    };
    assert_eq!(expected.as_ref().unwrap().text(), "digit");
}
