//! Farthest-failure reporting: on an unsuccessful parse, synthesize a single
//! `InvalidInput` error pointing at the deepest input position any matcher
//! failed at, labelled with the nearest custom-labelled ancestor.

use matchbox_core::{ErrorKind, InputBuffer, Label, Node, ParseError};

use crate::context::{ExecLimitExceeded, ExecState, PathEntry};
use crate::exec::{self, Observer};
use crate::grammar::Grammar;
use crate::limits::Limits;
use crate::matcher::{is_terminal, MatcherId};
use crate::path::expected_label;

use super::{fresh_state, outcome_from_state, Runner};

struct FarthestFailure {
    index: usize,
    path: Vec<PathEntry>,
    failed: Option<MatcherId>,
    alternatives: Vec<Label>,
}

impl FarthestFailure {
    fn new() -> Self {
        Self {
            index: 0,
            path: Vec::new(),
            failed: None,
            alternatives: Vec::new(),
        }
    }
}

/// The deepest point any `Action` raised a fault, tracked separately from
/// plain terminal failures since an `ActionException` outranks a generic
/// `InvalidInput` when they tie.
struct FarthestActionFault {
    index: usize,
    message: String,
}

struct FarthestFailureObserver<'g, V> {
    grammar: &'g Grammar<V>,
    farthest: FarthestFailure,
    action_fault: Option<FarthestActionFault>,
}

impl<'g, V> Observer<V> for FarthestFailureObserver<'g, V> {
    fn on_fail(&mut self, id: MatcherId, at: usize, path: &[PathEntry]) {
        if !is_terminal(&self.grammar.node(id).kind) {
            return;
        }
        let label = self.grammar.label_of(id).clone();
        match at.cmp(&self.farthest.index) {
            std::cmp::Ordering::Greater => {
                self.farthest = FarthestFailure {
                    index: at,
                    path: path.to_vec(),
                    failed: Some(id),
                    alternatives: vec![label],
                };
            }
            std::cmp::Ordering::Equal => {
                if self.farthest.failed.is_none() {
                    self.farthest.failed = Some(id);
                    self.farthest.path = path.to_vec();
                }
                if !self.farthest.alternatives.contains(&label) {
                    self.farthest.alternatives.push(label);
                }
            }
            std::cmp::Ordering::Less => {}
        }
    }

    fn on_action_fault(&mut self, _id: MatcherId, at: usize, message: &str) {
        let replace = match &self.action_fault {
            Some(existing) => at >= existing.index,
            None => true,
        };
        if replace {
            self.action_fault = Some(FarthestActionFault { index: at, message: message.to_string() });
        }
    }
}

/// Runs a grammar once against an already-positioned `state`; on failure,
/// returns a single `InvalidInput` error at the farthest position any
/// terminal matcher was tried against. Shared by [`ReportingRunner`] and the
/// give-up path of [`super::RecoveringRunner`].
pub(crate) fn farthest_failure_error<V: Clone>(
    grammar: &Grammar<V>,
    root: MatcherId,
    state: &mut ExecState<'_, V>,
) -> Result<(Option<Node<V>>, Vec<ParseError>), ExecLimitExceeded> {
    let mut observer = FarthestFailureObserver {
        grammar,
        farthest: FarthestFailure::new(),
        action_fault: None,
    };
    let tree = exec::run(grammar, root, state, &mut observer)?;

    if tree.is_some() {
        return Ok((tree, Vec::new()));
    }

    let farthest = observer.farthest;
    if let Some(fault) = observer.action_fault {
        if fault.index >= farthest.index {
            return Ok((
                None,
                vec![ParseError::new(
                    ErrorKind::ActionException { message: fault.message },
                    fault.index..fault.index + 1,
                )],
            ));
        }
    }

    let errors = match farthest.failed {
        Some(failed) => {
            let expected = expected_label(grammar, &farthest.path, failed, farthest.index);
            let alternatives: Vec<Label> = farthest
                .alternatives
                .into_iter()
                .filter(|l| *l != expected)
                .collect();
            vec![ParseError::new(
                ErrorKind::InvalidInput {
                    expected: Some(expected),
                    alternatives,
                },
                farthest.index..farthest.index + 1,
            )]
        }
        None => vec![ParseError::new(
            ErrorKind::InvalidInput {
                expected: None,
                alternatives: Vec::new(),
            },
            0..1,
        )],
    };

    Ok((None, errors))
}

/// Runs a grammar once; on failure, emits a single `InvalidInput` error at
/// the farthest position any terminal matcher was tried against.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportingRunner;

impl<V: Clone> Runner<V> for ReportingRunner {
    fn parse(
        &mut self,
        grammar: &Grammar<V>,
        root: MatcherId,
        buffer: &dyn InputBuffer,
        limits: Limits,
    ) -> super::RunResult<V> {
        let mut state = fresh_state(buffer, limits);
        let (tree, errors) = farthest_failure_error(grammar, root, &mut state)?;
        Ok(outcome_from_state(tree, errors, &state))
    }
}
