//! Core data structures shared by the matchbox PEG engine.
//!
//! This crate has no notion of matchers or execution; it only defines the
//! data a parse is built from and built out of:
//! - **Character model** (`char_kind`): ordinary characters plus the EOI/INDENT/DEDENT sentinels.
//! - **Input buffers** (`buffer`): random-access character sources with line/column mapping.
//! - **Parse tree** (`tree`): the immutable, labelled output of a successful parse.
//! - **Value stack** (`value_stack`): the transactional LIFO stack actions operate on.
//! - **Parse errors** (`error`): the records produced by the reporting and recovering runners.

mod buffer;
mod char_kind;
mod error;
mod tree;
mod value_stack;

#[cfg(test)]
mod buffer_tests;
#[cfg(test)]
mod value_stack_tests;

pub use buffer::{DefaultInputBuffer, IndentDedentBuffer, InputBuffer, MixedIndentError, Position};
pub use char_kind::Char;
pub use error::{ErrorKind, GrammarError, ParseError, RepairKind};
pub use tree::{Label, Node, NodeBuilder};
pub use value_stack::ValueStack;
