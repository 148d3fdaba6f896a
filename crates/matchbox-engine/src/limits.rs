//! Execution guards: how deep recursion may go and how many matcher steps a
//! single parse may spend before it is aborted rather than left to run away
//! on a pathological or accidentally-left-recursive grammar.

/// Resource limits applied to one parse run.
///
/// `Default` leaves both guards off, matching a grammar author's first
/// experience with a small, well-behaved grammar; production callers
/// parsing untrusted input should set both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    max_recursion: Option<u32>,
    max_steps: Option<u64>,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_recursion: None,
            max_steps: None,
        }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_recursion(mut self, max: u32) -> Self {
        self.max_recursion = Some(max);
        self
    }

    pub fn with_max_steps(mut self, max: u64) -> Self {
        self.max_steps = Some(max);
        self
    }

    pub fn max_recursion(&self) -> Option<u32> {
        self.max_recursion
    }

    pub fn max_steps(&self) -> Option<u64> {
        self.max_steps
    }
}
