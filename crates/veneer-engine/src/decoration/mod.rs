//! Decoration taxonomy: immutable, position-addressed annotations over
//! document text.
//!
//! A [`Decoration`] carries a half-open byte range `[from, to)` and one of
//! four payload variants:
//!
//! - **Mark** styles the covered text (tag name, class, attributes).
//!   Overlapping marks merge per [`resolve_marks`].
//! - **Widget** is a zero-width placeholder (`from == to`) placed inline or
//!   as its own block, ordered around the position by its [`Side`].
//! - **Replace** consumes the covered text and substitutes a widget.
//! - **Line** contributes class/attributes to the line it sits at the
//!   start of.
//!
//! Decorations are plain value records: constructing one never fails, and
//! validity of its range against the document is the caller's concern.
//! Collections are handed to the span traversal (see [`spans`]) as sorted
//! [`DecorationSet`]s.

use std::collections::BTreeMap;

use serde::Serialize;

pub mod spans;

pub use spans::{Open, SpanSink, iterate_spans};

/// Placement bias for zero-width decorations sharing a position.
///
/// Ordering is meaningful: `Before < Neutral < After` is the delivery order
/// at a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Side {
    Before = -1,
    #[default]
    Neutral = 0,
    After = 1,
}

/// Opaque reference to a widget the host layer knows how to materialize.
/// The composition core only tracks its placement and consumed length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Widget {
    pub kind: String,
}

impl Widget {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

/// Styling payload of a Mark decoration. The `attributes` map may carry
/// `class` and `style` entries, which merge instead of overwriting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkSpec {
    pub tag_name: Option<String>,
    pub class: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

/// Payload of a Widget decoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetSpec {
    pub widget: Widget,
    /// Render as its own block node rather than inline.
    pub block: bool,
    /// Placement relative to the position; only meaningful for zero-width
    /// decorations.
    pub side: Side,
}

/// Payload of a Replace decoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaceSpec {
    pub widget: Widget,
    pub block: bool,
}

/// Payload of a Line decoration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineSpec {
    pub class: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DecorationKind {
    Mark(MarkSpec),
    Widget(WidgetSpec),
    Replace(ReplaceSpec),
    Line(LineSpec),
}

/// An immutable annotation anchored to `[from, to)` in document bytes.
/// Point decorations (Widget, Line) have `from == to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub kind: DecorationKind,
}

impl Decoration {
    pub fn mark(from: usize, to: usize, spec: MarkSpec) -> Self {
        Self {
            from,
            to,
            kind: DecorationKind::Mark(spec),
        }
    }

    pub fn widget(pos: usize, spec: WidgetSpec) -> Self {
        Self {
            from: pos,
            to: pos,
            kind: DecorationKind::Widget(spec),
        }
    }

    pub fn replace(from: usize, to: usize, spec: ReplaceSpec) -> Self {
        Self {
            from,
            to,
            kind: DecorationKind::Replace(spec),
        }
    }

    pub fn line(pos: usize, spec: LineSpec) -> Self {
        Self {
            from: pos,
            to: pos,
            kind: DecorationKind::Line(spec),
        }
    }

    /// Widget and Line decorations are points; Mark and Replace are ranges
    /// (a Replace may still be zero-width).
    pub fn is_point(&self) -> bool {
        matches!(
            self.kind,
            DecorationKind::Widget(_) | DecorationKind::Line(_)
        )
    }

    pub(crate) fn side(&self) -> Side {
        match &self.kind {
            DecorationKind::Widget(spec) => spec.side,
            _ => Side::Neutral,
        }
    }
}

/// A collection of decorations sorted by `(from, side, to)`, the unit the
/// span traversal merges. Sorting happens once at construction; the set is
/// immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    pub fn of(mut decorations: Vec<Decoration>) -> Self {
        decorations.sort_by(|a, b| {
            a.from
                .cmp(&b.from)
                .then(a.side().cmp(&b.side()))
                .then(a.to.cmp(&b.to))
        });
        Self { decorations }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Decoration> {
        self.decorations.iter()
    }
}

/// Tag/class/attribute set resolved from the marks active at a position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedMarks {
    pub tag_name: Option<String>,
    pub class: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl ResolvedMarks {
    pub fn is_plain(&self) -> bool {
        self.tag_name.is_none() && self.class.is_none() && self.attributes.is_empty()
    }
}

/// Merge the ordered list of active marks into one attribute set.
///
/// Later entries win for the tag name and for plain attributes; classes
/// concatenate space-joined (the `class` attribute folds into the class
/// slot) and `style` values concatenate with `;`. The result depends only
/// on the order of `active`, which the traversal keeps stable.
pub fn resolve_marks(active: &[&MarkSpec]) -> ResolvedMarks {
    let mut out = ResolvedMarks::default();
    for spec in active {
        if let Some(tag) = &spec.tag_name {
            out.tag_name = Some(tag.clone());
        }
        if let Some(class) = &spec.class {
            push_class(&mut out.class, class);
        }
        for (name, value) in &spec.attributes {
            match name.as_str() {
                "class" => push_class(&mut out.class, value),
                "style" => match out.attributes.get_mut("style") {
                    Some(style) => {
                        style.push(';');
                        style.push_str(value);
                    }
                    None => {
                        out.attributes.insert(name.clone(), value.clone());
                    }
                },
                _ => {
                    out.attributes.insert(name.clone(), value.clone());
                }
            }
        }
    }
    out
}

pub(crate) fn push_class(slot: &mut Option<String>, class: &str) {
    match slot {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(class);
        }
        None => *slot = Some(class.to_string()),
    }
}
