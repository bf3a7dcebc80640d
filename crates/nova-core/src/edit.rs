//! Byte-range replacements over a text snapshot.

use crate::{TextRange, TextSize};
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// Replace `len` bytes starting at `offset`.
    pub fn replace_at(offset: TextSize, len: TextSize, replacement: impl Into<String>) -> Self {
        Self::new(TextRange::at(offset, len), replacement)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum EditError {
    RangeOutOfBounds {
        range: TextRange,
        text_len: TextSize,
    },
    InvalidUtf8Boundary {
        offset: TextSize,
    },
    OverlappingEdits {
        first: TextRange,
        second: TextRange,
    },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::RangeOutOfBounds { range, text_len } => write!(
                f,
                "edit range {range:?} is out of bounds for text length {text_len:?}"
            ),
            EditError::InvalidUtf8Boundary { offset } => {
                write!(f, "offset {offset:?} is not a UTF-8 character boundary")
            }
            EditError::OverlappingEdits { first, second } => {
                write!(f, "overlapping edits: {first:?} overlaps {second:?}")
            }
        }
    }
}

impl std::error::Error for EditError {}

/// Apply `edits` to `text`, starting with the edit that begins last.
///
/// Every range refers to the original snapshot. Applying from the back keeps
/// the offsets of not-yet-applied edits valid even when replacements change
/// the text length. Overlapping ranges, and two edits starting at the same
/// offset, are rejected.
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let text_len = TextSize::from(text.len() as u32);

    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.range.start().cmp(&a.range.start()));

    for edit in &ordered {
        if edit.range.end() > text_len {
            return Err(EditError::RangeOutOfBounds {
                range: edit.range,
                text_len,
            });
        }
        for offset in [edit.range.start(), edit.range.end()] {
            if !text.is_char_boundary(u32::from(offset) as usize) {
                return Err(EditError::InvalidUtf8Boundary { offset });
            }
        }
    }

    // `ordered` is descending, so each pair is (later, earlier).
    for pair in ordered.windows(2) {
        let (later, earlier) = (pair[0], pair[1]);
        if earlier.range.end() > later.range.start()
            || earlier.range.start() == later.range.start()
        {
            return Err(EditError::OverlappingEdits {
                first: earlier.range,
                second: later.range,
            });
        }
    }

    let mut out = text.to_string();
    for edit in ordered {
        let start = u32::from(edit.range.start()) as usize;
        let end = u32::from(edit.range.end()) as usize;
        out.replace_range(start..end, &edit.replacement);
    }
    Ok(out)
}
