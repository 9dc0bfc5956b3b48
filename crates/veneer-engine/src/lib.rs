pub mod compose;
pub mod decoration;
pub mod text;

// Re-export key types for easier usage
pub use compose::{BlockNode, ComposeError, Content, ContentBuilder, InlineNode};
pub use decoration::{Decoration, DecorationKind, DecorationSet, Open, SpanSink, iterate_spans};
pub use text::Document;
