use super::Document;

/// One step of the chunk cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A run of text with no line breaks in it.
    Chunk(String),
    /// A single line break (one byte position).
    LineBreak,
    /// End of document.
    Done,
}

/// Forward cursor over a document's text, yielding chunks and line breaks.
///
/// Tracks the absolute byte offset into the document; `next` can skip over
/// bytes without materializing them, which replaced-span handling relies on.
/// Chunks are owned strings for now, matching the line-iteration scaffold in
/// the rest of the codebase.
pub struct ChunkCursor<'a> {
    doc: &'a Document,
    offset: usize,
}

impl<'a> ChunkCursor<'a> {
    pub(crate) fn new(doc: &'a Document, offset: usize) -> Self {
        Self { doc, offset }
    }

    /// Current absolute byte offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Silently consume `skip` bytes (line breaks included), then report the
    /// next chunk or line break. Returns `Step::Done` once the document is
    /// exhausted.
    pub fn next(&mut self, skip: usize) -> Step {
        self.offset += skip;
        let len = self.doc.len();
        if self.offset >= len {
            self.offset = len;
            return Step::Done;
        }
        let line = self.doc.line_at(self.offset);
        if self.offset == line.end {
            // Sitting on the newline byte terminating this line.
            self.offset += 1;
            return Step::LineBreak;
        }
        let chunk = self.doc.slice_to_cow(self.offset..line.end).into_owned();
        self.offset = line.end;
        Step::Chunk(chunk)
    }
}
