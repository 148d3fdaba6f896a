//! Parse error records (the data; path-walking and formatting live in the
//! engine crate, which knows about matchers).

use std::ops::Range;

use crate::tree::Label;

/// What kind of parse error occurred.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// Input did not match at some index.
    #[error("invalid input")]
    InvalidInput {
        /// The deepest custom-labelled matcher on the failure path, if any.
        expected: Option<Label>,
        /// Other `FirstOf` branches that were tried at the same index, for a richer message.
        alternatives: Vec<Label>,
    },
    /// A user action raised a fault.
    #[error("action failed: {message}")]
    ActionException { message: String },
    /// A repair was applied by the recovering runner.
    #[error("{kind}")]
    Repair { kind: RepairKind },
}

/// Which local repair the recovering runner applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RepairKind {
    #[error("resynchronized by skipping input")]
    Resync,
    #[error("deleted one unexpected character")]
    Deletion,
    #[error("inserted a missing character")]
    Insertion,
}

/// One entry in a `parseErrors` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub range: Range<usize>,
    pub message: Option<String>,
}

impl ParseError {
    pub fn new(kind: ErrorKind, range: Range<usize>) -> Self {
        Self {
            kind,
            range,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// The matcher graph itself is malformed. Fatal, synchronous, and never
/// appears in `parseErrors`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("grammar error: {message}")]
pub struct GrammarError {
    pub message: String,
}
