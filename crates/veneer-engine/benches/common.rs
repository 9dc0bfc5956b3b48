// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
use veneer_engine::decoration::{Decoration, DecorationSet, MarkSpec, ReplaceSpec, Widget};

#[allow(dead_code)]
pub fn generate_text(lines: usize) -> String {
    let base = "the quick brown fox jumps over the lazy dog\n";
    base.repeat(lines)
}

/// Marks striping every line of `generate_text` output, plus a sprinkling
/// of replace decorations collapsing one word per tenth line.
#[allow(dead_code)]
pub fn generate_decorations(lines: usize) -> Vec<DecorationSet> {
    let line_len = "the quick brown fox jumps over the lazy dog\n".len();
    let mut marks = Vec::new();
    let mut replaces = Vec::new();
    for i in 0..lines {
        let start = i * line_len;
        marks.push(Decoration::mark(
            start + 4,
            start + 9,
            MarkSpec {
                class: Some("word".to_string()),
                ..Default::default()
            },
        ));
        if i % 10 == 0 {
            replaces.push(Decoration::replace(
                start + 10,
                start + 15,
                ReplaceSpec {
                    widget: Widget::new("ellipsis"),
                    block: false,
                },
            ));
        }
    }
    vec![DecorationSet::of(marks), DecorationSet::of(replaces)]
}
