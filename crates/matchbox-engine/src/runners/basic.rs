//! The plain runner: one pass, no error recovery, no diagnostics beyond
//! "did it match".

use matchbox_core::InputBuffer;

use crate::exec::{self, NoOpObserver};
use crate::grammar::Grammar;
use crate::limits::Limits;
use crate::matcher::MatcherId;

use super::{fresh_state, outcome_from_state, Runner};

/// Runs a grammar once and reports only whether it matched.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicRunner;

impl<V: Clone> Runner<V> for BasicRunner {
    fn parse(
        &mut self,
        grammar: &Grammar<V>,
        root: MatcherId,
        buffer: &dyn InputBuffer,
        limits: Limits,
    ) -> super::RunResult<V> {
        let mut state = fresh_state(buffer, limits);
        let mut observer = NoOpObserver;
        let tree = exec::run(grammar, root, &mut state, &mut observer)?;
        Ok(outcome_from_state(tree, Vec::new(), &state))
    }
}
