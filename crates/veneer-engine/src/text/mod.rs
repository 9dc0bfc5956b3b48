use std::borrow::Cow;

use xi_rope::Rope;

pub mod cursor;

pub use cursor::{ChunkCursor, Step};

/// Byte bounds of a single line. `end` excludes the trailing newline, so an
/// empty line has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub start: usize,
    pub end: usize,
}

/// Read-only text source for one composition call.
///
/// Wraps an `xi_rope::Rope` buffer. All positions are byte offsets into the
/// buffer and all ranges are half-open `[from, to)`; a line break counts as
/// one position. The buffer is never mutated here; callers that edit text
/// build a fresh `Document` (or share the rope, which is cheap to clone)
/// and compose again.
#[derive(Clone)]
pub struct Document {
    buffer: Rope,
}

impl Document {
    /// Create a document from raw bytes, validating UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self {
            buffer: Rope::from(text),
        })
    }

    /// Length of the document in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Slice a byte range out of the buffer.
    pub fn slice_to_cow(&self, range: std::ops::Range<usize>) -> Cow<'_, str> {
        self.buffer.slice_to_cow(range)
    }

    /// Bounds of the line containing `pos`.
    ///
    /// `pos` may equal the document length, in which case this returns the
    /// (possibly empty) last line.
    pub fn line_at(&self, pos: usize) -> Line {
        let line = self.buffer.line_of_offset(pos);
        let start = self.buffer.offset_of_line(line);
        let next = self.buffer.offset_of_line(line + 1);
        let end = if next > start && self.slice_to_cow(next - 1..next) == "\n" {
            next - 1
        } else {
            next
        };
        Line { start, end }
    }

    /// Forward chunk cursor starting at `offset`.
    pub fn cursor_at(&self, offset: usize) -> ChunkCursor<'_> {
        ChunkCursor::new(self, offset)
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
        }
    }
}
