//! Ordered span traversal: merges N decoration collections over a query
//! range into a single position-ordered event stream and pushes it into a
//! [`SpanSink`].
//!
//! The sink never searches decorations itself; everything it learns arrives
//! through these callbacks, in non-decreasing position order. That keeps a
//! consumer O(events + text) regardless of how many collections were merged,
//! and makes it testable against a recording mock sink.

use std::cmp::Ordering;

use crate::compose::ComposeError;
use crate::decoration::{Decoration, DecorationKind, DecorationSet, MarkSpec, ReplaceSpec};

use serde::Serialize;

/// Marks whether a span's edge coincides with the clipped boundary of the
/// queried range (or with truncation by an earlier overlapping replace)
/// rather than a genuine decoration edge. Callers composing viewport slices
/// use these bits to stitch adjacent slices without duplicating or dropping
/// a span that straddles the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Open {
    pub start: bool,
    pub end: bool,
}

/// Receiver for the traversal's event stream.
///
/// `advance` reports a boundary with the marks active over the preceding
/// gap; `advance_replaced` a consumed span; `point` a zero-width Widget or
/// Line decoration at the current position. The `ignore_*` hooks let a sink
/// opt out of specific decorations; the defaults never ignore.
pub trait SpanSink {
    fn advance(&mut self, pos: usize, active: &[&MarkSpec]) -> Result<(), ComposeError>;

    fn advance_replaced(
        &mut self,
        pos: usize,
        spec: &ReplaceSpec,
        open: Open,
    ) -> Result<(), ComposeError>;

    fn point(&mut self, deco: &Decoration) -> Result<(), ComposeError>;

    fn ignore_range(&self, _spec: &ReplaceSpec) -> bool {
        false
    }

    fn ignore_point(&self, _deco: &Decoration) -> bool {
        false
    }
}

// Delivery order for events sharing a position: points by side, then mark
// starts, then replace starts (longest first, so the widest of several
// overlapping replaces wins).
const RANK_MARK: i8 = 2;
const RANK_REPLACE: i8 = 3;

struct Event<'a> {
    deco: &'a Decoration,
    rank: i8,
    seq: usize,
}

fn event_rank(deco: &Decoration) -> i8 {
    match &deco.kind {
        DecorationKind::Widget(_) | DecorationKind::Line(_) => deco.side() as i8,
        DecorationKind::Mark(_) => RANK_MARK,
        DecorationKind::Replace(_) => RANK_REPLACE,
    }
}

/// Drive `sink` with every decoration in `sets` overlapping `[from, to)`.
///
/// Ranges crossing the query boundary are clipped and reported with the
/// matching [`Open`] bits. Point decorations at `from` and `to` are
/// included. Decorations strictly inside a consumed replace span are
/// dropped; the uncovered tail of a replace overlapping an earlier one is
/// delivered as a further replaced span with `open.start` set.
///
/// The active-mark order handed to `advance` is `(from, side, collection
/// index, insertion order)`, stable across runs, which is what makes the
/// mark merge rule deterministic.
pub fn iterate_spans<S: SpanSink>(
    sets: &[DecorationSet],
    from: usize,
    to: usize,
    sink: &mut S,
) -> Result<(), ComposeError> {
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut seq = 0;
    for set in sets {
        for deco in set.iter() {
            let included = if deco.is_point() {
                from <= deco.from && deco.from <= to
            } else {
                deco.from < to && deco.to > from
            };
            if included {
                events.push(Event {
                    deco,
                    rank: event_rank(deco),
                    seq,
                });
            }
            seq += 1;
        }
    }
    events.sort_by(|a, b| {
        a.deco
            .from
            .max(from)
            .cmp(&b.deco.from.max(from))
            .then(a.rank.cmp(&b.rank))
            .then_with(|| {
                if a.rank == RANK_REPLACE {
                    b.deco.to.cmp(&a.deco.to)
                } else {
                    Ordering::Equal
                }
            })
            .then(a.seq.cmp(&b.seq))
    });

    // Active marks as (clipped end, spec), in activation order.
    let mut active: Vec<(usize, &MarkSpec)> = Vec::new();
    let mut pos = from;
    let mut i = 0;

    loop {
        while i < events.len() && events[i].deco.from.max(from) <= pos {
            let deco = events[i].deco;
            i += 1;
            match &deco.kind {
                DecorationKind::Mark(spec) => {
                    let end = deco.to.min(to);
                    if end > pos {
                        active.push((end, spec));
                    }
                }
                DecorationKind::Replace(spec) => {
                    if sink.ignore_range(spec) {
                        continue;
                    }
                    let end = deco.to.min(to);
                    // Ranges already consumed by an earlier replace are
                    // dropped; a genuine zero-width replace at the current
                    // position still goes through.
                    if end < pos || (end == pos && deco.from < deco.to) {
                        continue;
                    }
                    let open = Open {
                        start: deco.from < pos,
                        end: deco.to > to,
                    };
                    sink.advance_replaced(end, spec, open)?;
                    pos = end;
                }
                DecorationKind::Widget(_) | DecorationKind::Line(_) => {
                    if deco.from < pos || sink.ignore_point(deco) {
                        continue;
                    }
                    sink.point(deco)?;
                }
            }
        }
        active.retain(|(end, _)| *end > pos);
        if pos >= to {
            break;
        }

        let next_event = events.get(i).map(|e| e.deco.from.max(from)).unwrap_or(to);
        let next_end = active.iter().map(|(end, _)| *end).min().unwrap_or(to);
        let next = next_event.min(next_end).min(to);
        debug_assert!(next > pos, "span traversal must make progress");

        let marks: Vec<&MarkSpec> = active.iter().map(|&(_, spec)| spec).collect();
        sink.advance(next, &marks)?;
        pos = next;
    }
    Ok(())
}
