//! Plain-text error rendering.
//!
//! Deliberately not built on `annotate-snippets`: that crate's renderer
//! wraps and decorates source excerpts in ways this engine's reporting
//! format predates and must match exactly (one line of source, one line of
//! carets, no box-drawing). A builder over a `String` gets that byte-for-byte.

use std::fmt::Write as _;

use matchbox_core::{InputBuffer, ParseError};

/// Renders one or more [`ParseError`]s against their source buffer as
/// `"<message> (line L, pos C):\n<source line>\n<caret line>\n"` blocks.
pub struct ErrorReport {
    buf: String,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    pub fn push(&mut self, buffer: &dyn InputBuffer, error: &ParseError, message: &str) -> &mut Self {
        let pos = buffer.position(error.range.start);
        let _ = writeln!(self.buf, "{message} (line {}, pos {}):", pos.line, pos.column);

        let line = buffer.extract_line(pos.line);
        let caret_len = caret_length(&error.range, line.len(), pos.column);
        self.buf.push_str(&line);
        self.buf.push('\n');

        for _ in 0..pos.offset_in_line {
            self.buf.push(' ');
        }
        for _ in 0..caret_len {
            self.buf.push('^');
        }
        self.buf.push('\n');
        self
    }

    pub fn push_all<'a>(
        &mut self,
        buffer: &dyn InputBuffer,
        errors: impl IntoIterator<Item = &'a ParseError>,
    ) -> &mut Self {
        for error in errors {
            let message = error
                .message
                .clone()
                .unwrap_or_else(|| error.kind.to_string());
            self.push(buffer, error, &message);
        }
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

impl Default for ErrorReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Caret run length: the error's own width, clamped so the caret line never
/// runs past the end of the rendered source line. `col` is the 1-based
/// column the error starts at.
fn caret_length(range: &std::ops::Range<usize>, line_len: usize, col: usize) -> usize {
    let width = range.len().max(1);
    let max_len = (line_len + 2).saturating_sub(col);
    width.min(max_len.max(1))
}
