//! Core shared types for the template generator.
//!
//! This crate is intentionally small: text offsets, byte-range edits and the
//! write-once file primitive used for generated sources.

pub mod edit;
pub mod fs;
pub mod text;

pub use edit::{apply_text_edits, EditError, TextEdit};
pub use text::{LineCol, LineIndex, TextRange, TextSize};

/// Identity of a source file handed to the generator by the build harness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        FileId(raw)
    }

    #[inline]
    pub const fn to_raw(self) -> u32 {
        self.0
    }
}
