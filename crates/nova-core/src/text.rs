//! Text model primitives: byte offsets, ranges and line/column lookup.

pub use text_size::{TextRange, TextSize};

/// Zero-based line and byte column.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Pre-computed line start offsets for a source buffer.
///
/// Works on raw bytes so it can index sources that are not valid UTF-8.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(bytes: &[u8]) -> Self {
        let mut line_starts = Vec::with_capacity(64);
        line_starts.push(TextSize::from(0));

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                b'\r' => {
                    let step = if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                    line_starts.push(TextSize::from((i + step) as u32));
                    i += step;
                }
                _ => i += 1,
            }
        }

        Self {
            line_starts,
            len: TextSize::from(bytes.len() as u32),
        }
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Offsets past the end are clamped to the last position.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        };
        LineCol {
            line: line as u32,
            col: u32::from(offset - self.line_starts[line]),
        }
    }
}
