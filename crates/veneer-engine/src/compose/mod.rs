/*!
 * # Content composition
 *
 * Turns a flat text buffer plus independently-authored decorations into an
 * ordered tree of renderable blocks covering an arbitrary sub-range of the
 * document: the answer to "what is the sequence of lines and inline runs
 * to render between `from` and `to`?".
 *
 * ## How a composition call runs
 *
 * 1. The caller hands [`ContentBuilder::build`] a text source, a half-open
 *    byte range, and an ordered list of decoration collections.
 * 2. The builder registers itself as the span traversal's sink; the
 *    traversal pushes boundary, replaced-span, and point events in
 *    position order.
 * 3. The builder pulls text chunks on demand, appending text runs and
 *    widget placeholders to the growing block vector, closing and opening
 *    lines at line breaks, and synthesizing empty lines so every line
 *    boundary in the range is represented exactly once.
 * 4. `finish` caps the tree and the caller receives an immutable
 *    [`Content`].
 *
 * The whole call is synchronous and single-pass: O(events + text length),
 * no backtracking, no lookahead. Nodes are built fresh per call and never
 * reused across calls.
 *
 * ## Viewport slices
 *
 * When the range is a slice of a larger document, replaced spans crossing
 * the slice boundary carry open-start/open-end bits so adjacent slices can
 * be stitched without duplicating or dropping a span (see
 * [`crate::decoration::spans::Open`]).
 *
 * ## Usage
 *
 * ```rust
 * use veneer_engine::compose::ContentBuilder;
 * use veneer_engine::decoration::{Decoration, DecorationSet, MarkSpec};
 * use veneer_engine::text::Document;
 *
 * let doc = Document::from("ab\ncd");
 * let mark = Decoration::mark(0, 2, MarkSpec {
 *     class: Some("keyword".to_string()),
 *     ..Default::default()
 * });
 * let sets = [DecorationSet::of(vec![mark])];
 *
 * let content = ContentBuilder::build(&doc, 0, 5, &sets).unwrap();
 * assert_eq!(content.blocks.len(), 2);
 * assert!(content.blocks[0].break_after());
 * ```
 */

pub mod builder;
pub mod nodes;

pub use builder::{Content, ContentBuilder};
pub use nodes::{
    BlockNode, BlockPlacement, BlockWidgetNode, InlineNode, InlineWidgetNode, LineAttrs, LineNode,
    TextRun,
};

use thiserror::Error;

/// Fatal composition failures.
///
/// Both variants mean the inputs disagree with each other: the core never
/// produces a partially-correct tree, and retrying without rebuilding the
/// inputs cannot succeed. No user-facing formatting happens here; the host
/// layer reports these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    /// The decoration traversal requested more text than the document
    /// holds in the composed range.
    #[error("ran out of text content while composing inline runs")]
    OutOfText,
    /// The requested composition range lies outside the document.
    #[error("composition range {from}..{to} is outside the document (length {len})")]
    RangeOutOfBounds { from: usize, to: usize, len: usize },
}
