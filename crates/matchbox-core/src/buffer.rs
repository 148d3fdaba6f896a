//! Random-access character sources.
//!
//! Two concrete buffers are provided: [`DefaultInputBuffer`], a plain
//! character source, and [`IndentDedentBuffer`], a preprocessor that splices
//! `Char::Indent`/`Char::Dedent` sentinels into the stream based on each
//! line's leading whitespace.

use crate::char_kind::Char;

/// 1-based line/column of an index, plus the 0-based offset within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset_in_line: usize,
}

/// The interface every matcher ultimately reads through.
///
/// `length()` reports the number of addressable, non-EOI positions; `char_at`
/// yields `Char::Eoi` for every index at or beyond it, forever.
pub trait InputBuffer {
    fn char_at(&self, index: usize) -> Char;
    fn extract(&self, start: usize, end: usize) -> String;
    fn extract_line(&self, line_no: usize) -> String;
    fn position(&self, index: usize) -> Position;
    fn length(&self) -> usize;
}

fn line_starts(chars: &[char]) -> Vec<usize> {
    let mut starts = vec![0];
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\r' => {
                i += 1;
                if chars.get(i) == Some(&'\n') {
                    i += 1;
                }
                starts.push(i);
            }
            '\n' => {
                i += 1;
                starts.push(i);
            }
            _ => i += 1,
        }
    }
    starts
}

fn line_index_of(starts: &[usize], index: usize) -> usize {
    match starts.binary_search(&index) {
        Ok(i) => i,
        Err(i) => i - 1,
    }
}

fn line_text(chars: &[char], start: usize, next_start: Option<usize>) -> String {
    let end = next_start.unwrap_or(chars.len());
    let mut stop = end;
    while stop > start {
        match chars[stop - 1] {
            '\n' | '\r' => stop -= 1,
            _ => break,
        }
    }
    chars[start..stop].iter().collect()
}

/// A plain, unprocessed character source.
#[derive(Debug, Clone)]
pub struct DefaultInputBuffer {
    chars: Vec<char>,
    line_starts: Vec<usize>,
}

impl DefaultInputBuffer {
    pub fn new(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let line_starts = line_starts(&chars);
        Self { chars, line_starts }
    }
}

impl InputBuffer for DefaultInputBuffer {
    fn char_at(&self, index: usize) -> Char {
        self.chars.get(index).copied().map(Char::Value).unwrap_or(Char::Eoi)
    }

    fn extract(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        if start >= end {
            return String::new();
        }
        self.chars[start..end].iter().collect()
    }

    fn extract_line(&self, line_no: usize) -> String {
        let idx = line_no - 1;
        let start = self.line_starts[idx];
        let next = self.line_starts.get(idx + 1).copied();
        line_text(&self.chars, start, next)
    }

    fn position(&self, index: usize) -> Position {
        let idx = line_index_of(&self.line_starts, index.min(self.chars.len()));
        let start = self.line_starts[idx];
        Position {
            line: idx + 1,
            column: index - start + 1,
            offset_in_line: index - start,
        }
    }

    fn length(&self) -> usize {
        self.chars.len()
    }
}

/// Indentation was inconsistent (mixed tabs and spaces) in a leading run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixedIndentError {
    /// Source character index of the offending indentation run.
    pub index: usize,
}

/// A buffer that splices `Char::Indent`/`Char::Dedent` sentinels into the
/// token stream based on each line's leading whitespace, using a stack of
/// indentation columns (one level pushed per increase, one popped per
/// decrease; blank lines do not affect the stack).
///
/// The leading whitespace run of each non-blank line is consumed to compute
/// the indent change and does not itself appear as a `Char::Value` in the
/// resulting stream; the indent/dedent sentinels stand in for it.
#[derive(Debug, Clone)]
pub struct IndentDedentBuffer {
    source: DefaultInputBuffer,
    tokens: Vec<Char>,
    /// tokens[i] occupies this source character index (for position lookups).
    index_map: Vec<usize>,
}

impl IndentDedentBuffer {
    pub fn new(source: &str) -> Result<Self, MixedIndentError> {
        let default = DefaultInputBuffer::new(source);
        let chars = &default.chars;
        let starts = &default.line_starts;

        let mut tokens = Vec::new();
        let mut index_map = Vec::new();
        let mut indent_stack = vec![0usize];

        for (line_no, &line_start) in starts.iter().enumerate() {
            let line_end = starts.get(line_no + 1).copied().unwrap_or(chars.len());

            let mut i = line_start;
            let mut saw_space = false;
            let mut saw_tab = false;
            while i < line_end {
                match chars[i] {
                    ' ' => {
                        saw_space = true;
                        i += 1;
                    }
                    '\t' => {
                        saw_tab = true;
                        i += 1;
                    }
                    _ => break,
                }
            }
            if saw_space && saw_tab {
                return Err(MixedIndentError { index: line_start });
            }
            let content_start = i;
            let indent_width = content_start - line_start;
            let is_blank = content_start == line_end
                || matches!(chars[content_start], '\n' | '\r');

            if !is_blank {
                let top = *indent_stack.last().unwrap();
                if indent_width > top {
                    indent_stack.push(indent_width);
                    tokens.push(Char::Indent);
                    index_map.push(content_start);
                } else {
                    while *indent_stack.last().unwrap() > indent_width {
                        indent_stack.pop();
                        tokens.push(Char::Dedent);
                        index_map.push(content_start);
                    }
                }
            }

            for (k, &c) in chars[content_start..line_end].iter().enumerate() {
                tokens.push(Char::Value(c));
                index_map.push(content_start + k);
            }
        }

        for _ in 1..indent_stack.len() {
            tokens.push(Char::Dedent);
            index_map.push(chars.len());
        }

        Ok(Self {
            source: default,
            tokens,
            index_map,
        })
    }
}

impl InputBuffer for IndentDedentBuffer {
    fn char_at(&self, index: usize) -> Char {
        self.tokens.get(index).copied().unwrap_or(Char::Eoi)
    }

    fn extract(&self, start: usize, end: usize) -> String {
        let end = end.min(self.tokens.len());
        if start >= end {
            return String::new();
        }
        self.tokens[start..end]
            .iter()
            .filter_map(|t| t.as_value())
            .collect()
    }

    fn extract_line(&self, line_no: usize) -> String {
        self.source.extract_line(line_no)
    }

    fn position(&self, index: usize) -> Position {
        let source_index = self
            .index_map
            .get(index)
            .copied()
            .unwrap_or(self.source.length());
        self.source.position(source_index)
    }

    fn length(&self) -> usize {
        self.tokens.len()
    }
}
