//! Match traces.
//!
//! While simulating, each thread carries a `Path`: a persistent list of
//! events shared between threads that forked from a common prefix. Only the
//! path of the accepting thread is materialized into a `MatchPath`.
//!
//! Rule spans are recorded when a call completes, not when it starts. A call
//! made in tail position shares its caller's node and is recorded as a
//! `Tail` event, closed by the next `Exit` of that node.

use std::cmp::Reverse;
use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;

use super::stack::FrameId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    /// Element at this position was consumed by an atom.
    Atom(usize),
    /// Rule entered in tail position of the call `frame`.
    Tail {
        frame: FrameId,
        name: Arc<str>,
        start: usize,
    },
    /// The call `frame` completed.
    Exit {
        frame: FrameId,
        name: Arc<str>,
        start: usize,
        end: usize,
    },
}

struct Link {
    event: Event,
    prev: Path,
}

/// Persistent event list, newest first.
#[derive(Clone, Default)]
pub(crate) struct Path(Option<Rc<Link>>);

impl Path {
    pub(crate) fn push(&self, event: Event) -> Path {
        Path(Some(Rc::new(Link {
            event,
            prev: self.clone(),
        })))
    }

    /// Events oldest first.
    pub(crate) fn events(&self) -> Vec<Event> {
        let mut events = Vec::new();
        let mut cursor = &self.0;
        while let Some(link) = cursor {
            events.push(link.event.clone());
            cursor = &link.prev.0;
        }
        events.reverse();
        events
    }
}

// Unlink iteratively; long inputs produce long chains.
impl Drop for Path {
    fn drop(&mut self) {
        let mut next = self.0.take();
        while let Some(link) = next {
            match Rc::try_unwrap(link) {
                Ok(mut link) => next = link.prev.0.take(),
                Err(_) => break,
            }
        }
    }
}

/// The consumed spans of an accepted match, nested by rule.
///
/// Spans are half-open element positions `start..end`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MatchPath {
    pub segments: Vec<Segment>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Consecutive elements consumed directly by atoms.
    Atoms { start: usize, end: usize },
    /// A completed rule call.
    Symbol {
        name: String,
        start: usize,
        end: usize,
        children: Vec<Segment>,
    },
}

impl MatchPath {
    pub(crate) fn from_path(path: &Path) -> Self {
        Self::from_events(&path.events())
    }

    pub(crate) fn from_events(events: &[Event]) -> Self {
        let mut spans = Vec::new();
        let mut tails: Vec<(FrameId, &Arc<str>, usize)> = Vec::new();
        let mut exits = 0;

        for event in events {
            match event {
                Event::Atom(position) => spans.push(Span {
                    start: *position,
                    end: position + 1,
                    name: None,
                    order: (Reverse(0), 0),
                }),
                Event::Tail { frame, name, start } => tails.push((*frame, name, *start)),
                Event::Exit {
                    frame,
                    name,
                    start,
                    end,
                } => {
                    exits += 1;
                    spans.push(Span {
                        start: *start,
                        end: *end,
                        name: Some(name),
                        order: (Reverse(exits), 0),
                    });
                    let mut depth = 0;
                    tails.retain(|(owner, name, start)| {
                        if owner != frame {
                            return true;
                        }
                        depth += 1;
                        spans.push(Span {
                            start: *start,
                            end: *end,
                            name: Some(*name),
                            order: (Reverse(exits), depth),
                        });
                        false
                    });
                }
            }
        }

        // Outer spans first. Among equal spans, later completions enclose
        // earlier ones, and atoms are innermost.
        spans.sort_by_key(|span| {
            (
                span.start,
                Reverse(span.end),
                span.name.is_none(),
                span.order,
            )
        });

        let mut open: Vec<(Span<'_>, Vec<Segment>)> = Vec::new();
        let mut segments = Vec::new();
        for span in spans {
            while open
                .last()
                .is_some_and(|(outer, _)| span.start < outer.start || span.end > outer.end)
            {
                close(&mut open, &mut segments);
            }
            match span.name {
                Some(_) => open.push((span, Vec::new())),
                None => {
                    let current = match open.last_mut() {
                        Some((_, children)) => children,
                        None => &mut segments,
                    };
                    push_atom(current, span.start);
                }
            }
        }
        while !open.is_empty() {
            close(&mut open, &mut segments);
        }

        Self { segments }
    }

    /// Total span covered, if anything was consumed or entered.
    pub fn span(&self) -> Option<(usize, usize)> {
        let start = self.segments.first()?.start();
        let end = self.segments.last()?.end();
        Some((start, end))
    }
}

impl Segment {
    pub fn start(&self) -> usize {
        match self {
            Segment::Atoms { start, .. } | Segment::Symbol { start, .. } => *start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            Segment::Atoms { end, .. } | Segment::Symbol { end, .. } => *end,
        }
    }
}

/// A rule span, or an atom when `name` is `None`.
struct Span<'e> {
    start: usize,
    end: usize,
    name: Option<&'e Arc<str>>,
    /// Completion order, latest first, then tail depth.
    order: (Reverse<usize>, usize),
}

fn close(open: &mut Vec<(Span<'_>, Vec<Segment>)>, segments: &mut Vec<Segment>) {
    let Some((span, children)) = open.pop() else {
        return;
    };
    let closed = Segment::Symbol {
        name: span.name.map(ToString::to_string).unwrap_or_default(),
        start: span.start,
        end: span.end,
        children,
    };
    match open.last_mut() {
        Some((_, parent)) => parent.push(closed),
        None => segments.push(closed),
    }
}

fn push_atom(segments: &mut Vec<Segment>, position: usize) {
    if let Some(Segment::Atoms { end, .. }) = segments.last_mut() {
        if *end == position {
            *end = position + 1;
            return;
        }
    }
    segments.push(Segment::Atoms {
        start: position,
        end: position + 1,
    });
}
