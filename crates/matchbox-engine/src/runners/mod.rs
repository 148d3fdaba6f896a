//! The four parse-runner strategies. Each drives the same [`crate::exec`]
//! match loop; they differ only in how they react to failure and in what
//! they plug into [`crate::exec::Observer`].

mod basic;
mod recovering;
mod reporting;
mod tracing_runner;

#[cfg(test)]
mod recovering_tests;
#[cfg(test)]
mod reporting_tests;

pub use basic::BasicRunner;
pub use recovering::RecoveringRunner;
pub use reporting::ReportingRunner;
pub use tracing_runner::TracingRunner;

use matchbox_core::{InputBuffer, Node, ParseError};

use crate::context::{ExecLimitExceeded, ExecState};
use crate::grammar::Grammar;
use crate::limits::Limits;
use crate::matcher::MatcherId;

/// What a runner produces: the parse tree (if the grammar matched at all),
/// whatever parse errors it collected along the way, and the value stack's
/// final state. `Basic` never populates `errors`; `Reporting`/`Recovering`
/// do. `result_value`/`value_stack` matter when an action pushes a value
/// that is never bound to exactly one tree node -- e.g. a reduce step that
/// folds several children's values into one before the enclosing frame's
/// own node is built -- since otherwise that value would be unreachable
/// once the runner's internal `ExecState` is dropped.
#[derive(Debug, Clone)]
pub struct ParseOutcome<V> {
    pub tree: Option<Node<V>>,
    pub errors: Vec<matchbox_core::ParseError>,
    /// Whatever sits on top of the value stack when the parse stopped.
    pub result_value: Option<V>,
    /// The value stack's full remaining contents, bottom to top.
    pub value_stack: Vec<V>,
}

/// Shared setup every runner starts from: an `ExecState` positioned at the
/// start of `buffer`, with `limits` applied.
pub(crate) fn fresh_state<'i, V>(
    buffer: &'i dyn InputBuffer,
    limits: Limits,
) -> crate::context::ExecState<'i, V> {
    let mut state = crate::context::ExecState::new(buffer);
    state.max_recursion = limits.max_recursion();
    state.steps_remaining = limits.max_steps();
    state
}

/// Assembles a [`ParseOutcome`] from a finished `ExecState`, snapshotting
/// whatever the value stack still holds before the state is dropped.
pub(crate) fn outcome_from_state<V: Clone>(
    tree: Option<Node<V>>,
    errors: Vec<ParseError>,
    state: &ExecState<'_, V>,
) -> ParseOutcome<V> {
    let value_stack = state.values.as_slice().to_vec();
    let result_value = value_stack.last().cloned();
    ParseOutcome { tree, errors, result_value, value_stack }
}

pub type RunResult<V> = Result<ParseOutcome<V>, ExecLimitExceeded>;

/// Common signature every runner exposes.
pub trait Runner<V> {
    fn parse(
        &mut self,
        grammar: &Grammar<V>,
        root: MatcherId,
        buffer: &dyn InputBuffer,
        limits: Limits,
    ) -> RunResult<V>;
}
