//! A runner with `Basic` semantics that also emits a `tracing` span per
//! matcher frame, for grammar authors debugging why a rule didn't fire the
//! way they expected.

use matchbox_core::InputBuffer;

use crate::exec::{self, Observer};
use crate::grammar::Grammar;
use crate::limits::Limits;
use crate::matcher::MatcherId;

use super::{fresh_state, outcome_from_state, Runner};

struct TraceObserver<'g, V> {
    #[allow(dead_code)]
    grammar: &'g Grammar<V>,
}

impl<'g, V> Observer<V> for TraceObserver<'g, V> {
    #[cfg(feature = "trace")]
    fn on_enter(&mut self, id: MatcherId, cursor: usize) {
        tracing::trace!(matcher = ?id, at = cursor, "enter");
    }

    #[cfg(feature = "trace")]
    fn on_success(&mut self, id: MatcherId, range: std::ops::Range<usize>) {
        tracing::trace!(matcher = ?id, start = range.start, end = range.end, "matched");
    }

    #[cfg(feature = "trace")]
    fn on_fail(&mut self, id: MatcherId, at: usize, _path: &[crate::context::PathEntry]) {
        tracing::trace!(matcher = ?id, at, "failed");
    }
}

/// Runs a grammar once, emitting `tracing` events for every matcher frame
/// when built with the `trace` feature; without it, behaves exactly like
/// [`super::BasicRunner`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRunner;

impl<V: Clone> Runner<V> for TracingRunner {
    fn parse(
        &mut self,
        grammar: &Grammar<V>,
        root: MatcherId,
        buffer: &dyn InputBuffer,
        limits: Limits,
    ) -> super::RunResult<V> {
        let mut state = fresh_state(buffer, limits);
        let mut observer = TraceObserver { grammar };
        let tree = exec::run(grammar, root, &mut state, &mut observer)?;
        Ok(outcome_from_state(tree, Vec::new(), &state))
    }
}
