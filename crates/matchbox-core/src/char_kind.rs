//! The character domain matchers operate over.
//!
//! Ordinary characters plus the three reserved sentinels from the data model:
//! end-of-input, and the indent/dedent markers emitted only by
//! [`IndentDedentBuffer`](crate::IndentDedentBuffer). Sentinels are part of
//! the same domain as ordinary characters rather than a side channel, so a
//! plain `Char(Char::Eoi)` matcher is "the explicit EOI matcher" rather than
//! a dedicated matcher variant.

use std::fmt;

/// One position in the input stream: an ordinary character, or one of the
/// three reserved sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Char {
    /// An ordinary input character.
    Value(char),
    /// Emitted once for every index at or beyond the real input length.
    Eoi,
    /// Emitted by [`IndentDedentBuffer`](crate::IndentDedentBuffer) when indentation increases.
    Indent,
    /// Emitted by [`IndentDedentBuffer`](crate::IndentDedentBuffer) when indentation decreases.
    Dedent,
}

impl Char {
    /// The ordinary character this position holds, if any.
    #[inline]
    pub fn as_value(self) -> Option<char> {
        match self {
            Char::Value(c) => Some(c),
            Char::Eoi | Char::Indent | Char::Dedent => None,
        }
    }

    /// True for any of the three reserved sentinels.
    #[inline]
    pub fn is_sentinel(self) -> bool {
        !matches!(self, Char::Value(_))
    }
}

impl fmt::Display for Char {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Char::Value(c) => write!(f, "{c}"),
            Char::Eoi => write!(f, "<EOI>"),
            Char::Indent => write!(f, "<INDENT>"),
            Char::Dedent => write!(f, "<DEDENT>"),
        }
    }
}

impl From<char> for Char {
    fn from(c: char) -> Self {
        Char::Value(c)
    }
}
