//! Line/column cursor that advances over text fragments.
//!
//! Columns count `char`s, lines count `\n` characters. Used by the chunk
//! extractor to translate diff operations into line coordinates.

/// A position in a text buffer. Ordering is by line, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct TextPos {
    pub line: usize,
    pub ch: usize,
}

impl TextPos {
    pub fn new(line: usize, ch: usize) -> Self {
        TextPos { line, ch }
    }

    /// Returns the position right after `text` when it is consumed here.
    pub fn advanced(self, text: &str) -> TextPos {
        let mut out = self;
        out.move_over(text, None);
        out
    }

    /// Move this position past `text` in place.
    ///
    /// When `sibling` is given (the cursor of the other buffer during an
    /// equal run) it receives the same line delta, and its column is only
    /// reset when `text` contains a line break.
    pub fn move_over(&mut self, text: &str, sibling: Option<&mut TextPos>) {
        let breaks = text.bytes().filter(|&b| b == b'\n').count();
        let tail = match text.rfind('\n') {
            Some(nl) => text[nl + 1..].chars().count(),
            None => text.chars().count(),
        };

        self.step(breaks, tail);
        if let Some(other) = sibling {
            other.step(breaks, tail);
        }
    }

    fn step(&mut self, breaks: usize, tail: usize) {
        self.line += breaks;
        self.ch = if breaks > 0 { tail } else { self.ch + tail };
    }
}
