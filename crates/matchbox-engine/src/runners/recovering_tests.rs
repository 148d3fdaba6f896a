use matchbox_core::{DefaultInputBuffer, ErrorKind, RepairKind};

use crate::grammar::Grammar;
use crate::limits::Limits;

use super::{RecoveringRunner, Runner};

#[test]
fn successful_parse_needs_no_repair() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let buffer = DefaultInputBuffer::new("a");

    let outcome = RecoveringRunner.parse(&g, a, &buffer, Limits::default()).unwrap();
    assert!(outcome.tree.is_some());
    assert!(outcome.errors.is_empty());
}

#[test]
fn single_unexpected_character_is_deleted_and_recovered() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    // One stray leading character, then the expected match: the runner
    // should delete the '!' and succeed on the 'a' behind it.
    let buffer = DefaultInputBuffer::new("!a");

    let outcome = RecoveringRunner.parse(&g, a, &buffer, Limits::default()).unwrap();
    assert!(outcome.tree.is_some());
    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(
        outcome.errors[0].kind,
        ErrorKind::Repair { kind: RepairKind::Deletion }
    ));
    assert_eq!(outcome.errors[0].range, 0..1);
}

#[test]
fn a_bad_character_in_the_middle_of_a_sequence_is_deleted_in_place() {
    // Seq('a','b','c') on "abXc": the earlier cursor-shifting design threw
    // away the already-matched "ab" prefix when it restarted the whole
    // sequence from a later offset, so 'a' could never match again at the
    // new start. Retrying against a view with just the 'X' elided keeps
    // "ab" lined up and lets 'c' match right behind it.
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let b = g.char('b');
    let c = g.char('c');
    let seq = g.sequence(vec![a, b, c]);
    let buffer = DefaultInputBuffer::new("abXc");

    let outcome = RecoveringRunner.parse(&g, seq, &buffer, Limits::default()).unwrap();

    let tree = outcome.tree.expect("recovery should let the sequence still match");
    assert_eq!(tree.children().len(), 3);
    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(
        outcome.errors[0].kind,
        ErrorKind::Repair { kind: RepairKind::Deletion }
    ));
    assert_eq!(outcome.errors[0].range, 2..3);
}

#[test]
fn gives_up_and_reports_farthest_failure_when_unrecoverable() {
    let mut g: Grammar<()> = Grammar::new();
    let a = g.char('a');
    let buffer = DefaultInputBuffer::new("xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx");

    let outcome = RecoveringRunner.parse(&g, a, &buffer, Limits::default()).unwrap();
    assert!(outcome.tree.is_none());
    assert!(outcome.errors.iter().any(|e| matches!(e.kind, ErrorKind::InvalidInput { .. })));
}
