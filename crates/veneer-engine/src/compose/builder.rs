use crate::compose::ComposeError;
use crate::compose::nodes::{
    BlockNode, BlockPlacement, BlockWidgetNode, InlineNode, InlineWidgetNode, LineNode, TextRun,
};
use crate::decoration::spans::{Open, SpanSink, iterate_spans};
use crate::decoration::{
    Decoration, DecorationKind, DecorationSet, MarkSpec, ReplaceSpec, ResolvedMarks, Side,
    resolve_marks,
};
use crate::text::{ChunkCursor, Document, Step};

/// The finished composition: top-level blocks in document order, plus
/// whether a line break sat immediately before the first emitted content
/// (set when the range starts just past a break with nothing in front of
/// it). Owned by the caller and immutable from here on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub blocks: Vec<BlockNode>,
    pub break_at_start: bool,
}

/// The accumulator at the heart of composition.
///
/// Registered as the span traversal's sink, it pulls text chunks on demand
/// and appends to a growing block vector. It never looks ahead or re-scans
/// decorations: both its own `pos` cursor and the event stream are
/// monotonically non-decreasing, so one pass suffices. The line currently
/// being appended to is tracked as an index into the vector (`cur_line`),
/// cleared whenever a line break or block widget closes it.
pub struct ContentBuilder<'a> {
    doc: &'a Document,
    pos: usize,
    content: Vec<BlockNode>,
    cur_line: Option<usize>,
    break_at_start: bool,
    cursor: ChunkCursor<'a>,
    text: String,
    text_off: usize,
    skip: usize,
}

impl<'a> ContentBuilder<'a> {
    pub fn new(doc: &'a Document, pos: usize) -> Self {
        Self {
            doc,
            pos,
            content: Vec::new(),
            cur_line: None,
            break_at_start: false,
            cursor: doc.cursor_at(pos),
            text: String::new(),
            text_off: 0,
            skip: 0,
        }
    }

    /// Compose `[from, to)` of `doc` under the given decoration sets.
    pub fn build(
        doc: &'a Document,
        from: usize,
        to: usize,
        decorations: &[DecorationSet],
    ) -> Result<Content, ComposeError> {
        if from > to || to > doc.len() {
            return Err(ComposeError::RangeOutOfBounds {
                from,
                to,
                len: doc.len(),
            });
        }
        let mut builder = ContentBuilder::new(doc, from);
        iterate_spans(decorations, from, to, &mut builder)?;
        builder.finish();
        Ok(Content {
            blocks: builder.content,
            break_at_start: builder.break_at_start,
        })
    }

    /// Whether the current position is already represented by emitted
    /// output. False means a line boundary here still needs an (empty)
    /// line node of its own.
    fn pos_covered(&self) -> bool {
        match self.content.last() {
            None => !self.break_at_start && self.doc.line_at(self.pos).start != self.pos,
            Some(BlockNode::Line(line)) => !line.break_after,
            Some(BlockNode::Widget(widget)) => {
                !widget.break_after && widget.placement != BlockPlacement::Before
            }
        }
    }

    /// The line currently open for appending, creating one on demand.
    fn line_mut(&mut self) -> &mut LineNode {
        let idx = match self.cur_line {
            Some(idx) => idx,
            None => {
                self.content.push(BlockNode::Line(LineNode::default()));
                let idx = self.content.len() - 1;
                self.cur_line = Some(idx);
                idx
            }
        };
        match &mut self.content[idx] {
            BlockNode::Line(line) => line,
            // cur_line always indexes a Line node; add_widget clears it.
            BlockNode::Widget(_) => unreachable!("cur_line points at a non-line block"),
        }
    }

    fn add_widget(&mut self, widget: BlockWidgetNode) {
        self.cur_line = None;
        self.content.push(BlockNode::Widget(widget));
    }

    /// Emit `length` positions of text styled by `marks`, pulling chunks
    /// from the cursor as needed. Line breaks close the current line and
    /// mark `break_after` on the last block (or `break_at_start` when no
    /// block exists yet), forcing an empty line first when the boundary is
    /// not covered.
    fn build_text(&mut self, mut length: usize, marks: &ResolvedMarks) -> Result<(), ComposeError> {
        while length > 0 {
            if self.text_off == self.text.len() {
                match self.cursor.next(self.skip) {
                    Step::Done => return Err(ComposeError::OutOfText),
                    Step::LineBreak => {
                        self.skip = 0;
                        if !self.pos_covered() {
                            self.line_mut();
                        }
                        match self.content.last_mut() {
                            Some(last) => last.set_break_after(true),
                            None => self.break_at_start = true,
                        }
                        self.cur_line = None;
                        length -= 1;
                        continue;
                    }
                    Step::Chunk(chunk) => {
                        self.skip = 0;
                        self.text = chunk;
                        self.text_off = 0;
                    }
                }
            }
            let take = (self.text.len() - self.text_off).min(length);
            let run = TextRun {
                text: self.text[self.text_off..self.text_off + take].to_string(),
                marks: marks.clone(),
            };
            self.line_mut().append(InlineNode::Text(run));
            length -= take;
            self.text_off += take;
        }
        Ok(())
    }

    /// Synthesize a trailing empty line if the final position is not
    /// covered, so every line boundary in the range has exactly one node.
    fn finish(&mut self) {
        if !self.pos_covered() {
            self.line_mut();
        }
    }
}

impl SpanSink for ContentBuilder<'_> {
    fn advance(&mut self, pos: usize, active: &[&MarkSpec]) -> Result<(), ComposeError> {
        // Guards duplicate and zero-length events.
        if pos <= self.pos {
            return Ok(());
        }
        let marks = resolve_marks(active);
        self.build_text(pos - self.pos, &marks)?;
        self.pos = pos;
        Ok(())
    }

    fn advance_replaced(
        &mut self,
        pos: usize,
        spec: &ReplaceSpec,
        open: Open,
    ) -> Result<(), ComposeError> {
        let len = pos - self.pos;
        if spec.block {
            self.add_widget(BlockWidgetNode {
                widget: spec.widget.clone(),
                len,
                placement: BlockPlacement::Range,
                open,
                break_after: false,
            });
        } else {
            self.line_mut().append(InlineNode::Widget(InlineWidgetNode {
                widget: spec.widget.clone(),
                len,
                side: Side::Neutral,
                open,
            }));
        }

        // Advance the cursor past the replaced span without materializing
        // it: consume from the in-hand chunk first, defer the rest to the
        // pending skip count.
        if self.text_off + len <= self.text.len() {
            self.text_off += len;
        } else {
            self.skip += len - (self.text.len() - self.text_off);
            self.text.clear();
            self.text_off = 0;
        }
        self.pos = pos;
        Ok(())
    }

    fn point(&mut self, deco: &Decoration) -> Result<(), ComposeError> {
        match &deco.kind {
            DecorationKind::Line(spec) => {
                // Line attributes only apply at the start of their line.
                if self.doc.line_at(self.pos).start == self.pos {
                    self.line_mut().attrs.add(spec);
                }
            }
            DecorationKind::Widget(spec) if spec.block => {
                // A widget rendering after an uncovered boundary still
                // needs that boundary's empty line in front of it.
                if spec.side == Side::After && !self.pos_covered() {
                    self.line_mut();
                }
                let placement = if spec.side == Side::Before {
                    BlockPlacement::Before
                } else {
                    BlockPlacement::After
                };
                self.add_widget(BlockWidgetNode {
                    widget: spec.widget.clone(),
                    len: 0,
                    placement,
                    open: Open::default(),
                    break_after: false,
                });
            }
            DecorationKind::Widget(spec) => {
                self.line_mut().append(InlineNode::Widget(InlineWidgetNode {
                    widget: spec.widget.clone(),
                    len: 0,
                    side: spec.side,
                    open: Open::default(),
                }));
            }
            // The traversal never delivers range decorations as points.
            DecorationKind::Mark(_) | DecorationKind::Replace(_) => {}
        }
        Ok(())
    }
}
