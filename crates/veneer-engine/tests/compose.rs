use pretty_assertions::assert_eq;
use rstest::rstest;
use veneer_engine::compose::{BlockNode, Content, ContentBuilder, InlineNode};
use veneer_engine::decoration::{
    Decoration, DecorationSet, MarkSpec, ReplaceSpec, Side, Widget, WidgetSpec,
};
use veneer_engine::text::Document;

fn class_mark(from: usize, to: usize, class: &str) -> Decoration {
    Decoration::mark(
        from,
        to,
        MarkSpec {
            class: Some(class.to_string()),
            ..Default::default()
        },
    )
}

fn replace(from: usize, to: usize, name: &str) -> Decoration {
    Decoration::replace(
        from,
        to,
        ReplaceSpec {
            widget: Widget::new(name),
            block: false,
        },
    )
}

/// Document positions accounted for by the composed tree: node spans plus
/// line breaks (`break_after` flags and `break_at_start`).
fn covered_len(content: &Content) -> usize {
    let spans: usize = content.blocks.iter().map(BlockNode::span_len).sum();
    let breaks = content.blocks.iter().filter(|b| b.break_after()).count()
        + content.break_at_start as usize;
    spans + breaks
}

#[rstest]
#[case("ab\ncd", 0, 5, vec![])]
#[case("ab\ncd", 2, 5, vec![])]
#[case("ab\ncd", 3, 3, vec![])]
#[case("ab\n", 0, 3, vec![])]
#[case("hello", 0, 5, vec![class_mark(1, 4, "x")])]
#[case("ab\ncd", 0, 5, vec![replace(1, 4, "w")])]
#[case("abcdef", 1, 5, vec![replace(0, 3, "w"), class_mark(2, 6, "x")])]
fn every_position_is_covered_exactly_once(
    #[case] text: &str,
    #[case] from: usize,
    #[case] to: usize,
    #[case] decorations: Vec<Decoration>,
) {
    let doc = Document::from(text);
    let sets = [DecorationSet::of(decorations)];
    let content = ContentBuilder::build(&doc, from, to, &sets).unwrap();
    assert_eq!(covered_len(&content), to - from);
}

#[test]
fn line_breaks_inside_range_match_line_node_count() {
    let doc = Document::from("a\nb\nc");
    let content = ContentBuilder::build(&doc, 0, 5, &[]).unwrap();
    let lines = content
        .blocks
        .iter()
        .filter(|b| matches!(b, BlockNode::Line(_)))
        .count();
    // Two breaks strictly inside [0, 5) and the range starts mid-line.
    assert_eq!(lines, 3);
    assert!(!content.break_at_start);
}

#[test]
fn mark_order_across_collections_is_stable() {
    let doc = Document::from("ab");
    let sets = [
        DecorationSet::of(vec![class_mark(0, 2, "a")]),
        DecorationSet::of(vec![class_mark(0, 2, "b")]),
    ];
    let content = ContentBuilder::build(&doc, 0, 2, &sets).unwrap();
    match &content.blocks[0] {
        BlockNode::Line(line) => match &line.runs[0] {
            InlineNode::Text(run) => assert_eq!(run.marks.class.as_deref(), Some("a b")),
            other => panic!("expected a text run, got {other:?}"),
        },
        other => panic!("expected a line node, got {other:?}"),
    }
}

#[test]
fn adjacent_slices_of_a_straddling_replace_carry_open_bits() {
    let doc = Document::from("abcdef");
    let sets = [DecorationSet::of(vec![replace(2, 5, "w")])];

    let first = ContentBuilder::build(&doc, 0, 3, &sets).unwrap();
    let second = ContentBuilder::build(&doc, 3, 6, &sets).unwrap();

    let widget_of = |content: &Content| -> (usize, bool, bool) {
        for block in &content.blocks {
            if let BlockNode::Line(line) = block {
                for run in &line.runs {
                    if let InlineNode::Widget(w) = run {
                        return (w.len, w.open.start, w.open.end);
                    }
                }
            }
        }
        panic!("no widget run in slice");
    };

    // First slice sees [2, 3) of the replace, clipped at its end.
    assert_eq!(widget_of(&first), (1, false, true));
    // Second slice sees [3, 5), clipped at its start.
    assert_eq!(widget_of(&second), (2, true, false));

    // Stitched, the two slices account for the whole document.
    assert_eq!(covered_len(&first) + covered_len(&second), doc.len());
}

#[test]
fn mixed_decoration_collections_compose_into_one_tree() {
    // "hello world\nsecond line\n" with a mark over "hello", a replace
    // swallowing "world\nsecond", and a line-level class on the first line.
    let doc = Document::from("hello world\nsecond line\n");
    let sets = [
        DecorationSet::of(vec![
            class_mark(0, 5, "kw"),
            Decoration::line(
                0,
                veneer_engine::decoration::LineSpec {
                    class: Some("hl".to_string()),
                    ..Default::default()
                },
            ),
        ]),
        DecorationSet::of(vec![replace(6, 18, "collapsed")]),
    ];
    let content = ContentBuilder::build(&doc, 0, doc.len(), &sets).unwrap();

    assert_eq!(covered_len(&content), doc.len());
    assert_eq!(content.blocks.len(), 2);

    let first = match &content.blocks[0] {
        BlockNode::Line(line) => line,
        other => panic!("expected a line node, got {other:?}"),
    };
    assert_eq!(first.attrs.class.as_deref(), Some("hl"));
    assert!(first.break_after);

    let texts: Vec<String> = first
        .runs
        .iter()
        .map(|run| match run {
            InlineNode::Text(t) => t.text.clone(),
            InlineNode::Widget(w) => format!("[{}:{}]", w.widget.kind, w.len),
        })
        .collect();
    assert_eq!(texts, vec!["hello", " ", "[collapsed:12]", " line"]);
    match &first.runs[0] {
        InlineNode::Text(run) => assert_eq!(run.marks.class.as_deref(), Some("kw")),
        other => panic!("expected a text run, got {other:?}"),
    }

    // The trailing newline leaves an empty final line.
    assert_eq!(content.blocks[1], BlockNode::Line(Default::default()));
}

#[test]
fn block_widgets_interleave_with_lines_in_document_order() {
    let doc = Document::from("ab\ncd");
    let sets = [DecorationSet::of(vec![Decoration::widget(
        3,
        WidgetSpec {
            widget: Widget::new("banner"),
            block: true,
            side: Side::Before,
        },
    )])];
    let content = ContentBuilder::build(&doc, 0, 5, &sets).unwrap();
    let kinds: Vec<&str> = content
        .blocks
        .iter()
        .map(|b| match b {
            BlockNode::Line(_) => "line",
            BlockNode::Widget(_) => "widget",
        })
        .collect();
    assert_eq!(kinds, vec!["line", "widget", "line"]);
}
