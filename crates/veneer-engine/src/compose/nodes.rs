use std::collections::BTreeMap;

use serde::Serialize;

use crate::decoration::spans::Open;
use crate::decoration::{LineSpec, ResolvedMarks, Side, Widget, push_class};

/// Where a block widget sits relative to the content at its position:
/// before the line boundary, after it, or replacing a text range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockPlacement {
    Before,
    After,
    Range,
}

/// Line-level attributes accumulated from Line decorations. Classes
/// concatenate space-joined and `style` values concatenate with `;`;
/// other attributes overwrite last-wins, mirroring the mark merge rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineAttrs {
    pub class: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl LineAttrs {
    pub(crate) fn add(&mut self, spec: &LineSpec) {
        if let Some(class) = &spec.class {
            push_class(&mut self.class, class);
        }
        for (name, value) in &spec.attributes {
            match name.as_str() {
                "class" => push_class(&mut self.class, value),
                "style" => match self.attributes.get_mut("style") {
                    Some(style) => {
                        style.push(';');
                        style.push_str(value);
                    }
                    None => {
                        self.attributes.insert(name.clone(), value.clone());
                    }
                },
                _ => {
                    self.attributes.insert(name.clone(), value.clone());
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.class.is_none() && self.attributes.is_empty()
    }
}

/// A slice of document text with the style resolved from active marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub marks: ResolvedMarks,
}

/// An inline widget placeholder. `len` is the document span it consumes
/// (0 for point widgets); `open` marks clipped edges for replaced spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineWidgetNode {
    pub widget: Widget,
    pub len: usize,
    pub side: Side,
    pub open: Open,
}

/// One run inside a line, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InlineNode {
    Text(TextRun),
    Widget(InlineWidgetNode),
}

impl InlineNode {
    /// Document positions this run accounts for.
    pub fn span_len(&self) -> usize {
        match self {
            InlineNode::Text(run) => run.text.len(),
            InlineNode::Widget(widget) => widget.len,
        }
    }
}

/// A line of inline content. `break_after` records that a line break
/// follows this node in the source (one document position).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineNode {
    pub runs: Vec<InlineNode>,
    pub attrs: LineAttrs,
    pub break_after: bool,
}

impl LineNode {
    pub(crate) fn append(&mut self, run: InlineNode) {
        self.runs.push(run);
    }
}

/// A block-level widget placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockWidgetNode {
    pub widget: Widget,
    /// Document span consumed (0 for point widgets).
    pub len: usize,
    pub placement: BlockPlacement,
    pub open: Open,
    pub break_after: bool,
}

/// A top-level output unit: a line of inline content or a block widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BlockNode {
    Line(LineNode),
    Widget(BlockWidgetNode),
}

impl BlockNode {
    /// Document positions this block accounts for, excluding any trailing
    /// line break (tracked separately by `break_after`).
    pub fn span_len(&self) -> usize {
        match self {
            BlockNode::Line(line) => line.runs.iter().map(InlineNode::span_len).sum(),
            BlockNode::Widget(widget) => widget.len,
        }
    }

    pub fn break_after(&self) -> bool {
        match self {
            BlockNode::Line(line) => line.break_after,
            BlockNode::Widget(widget) => widget.break_after,
        }
    }

    pub(crate) fn set_break_after(&mut self, break_after: bool) {
        match self {
            BlockNode::Line(line) => line.break_after = break_after,
            BlockNode::Widget(widget) => widget.break_after = break_after,
        }
    }
}
