//! Frontier seeding and stepping.
//!
//! Seeding activates the resolved successors of a state at one position,
//! following every completion that happens without consuming input. It
//! runs off a worklist, so the native stack stays flat however deep the
//! rule calls go.
//!
//! Activating a `Symbolic` state opens a call node in the frontier's call
//! set (see `stack`) and continues in the rule's graph. A call whose caller
//! would return immediately afterwards reuses the caller's node instead, so
//! right recursion runs in constant space. Reaching `MATCH` inside a rule
//! completes its node and resumes every caller registered on it.
//!
//! Stepping feeds one element to every thread and seeds the successors of
//! the ones that consumed it into the frontier for the next position.

use std::sync::Arc;

use sieve_compiler::{CompiledSymbol, Graph, MATCH, State, StateId, SymbolCache, SymbolId};

use super::frontier::{Ctx, Frontier, Key, Thread, ThreadKind};
use super::limits::Limits;
use super::path::{Event, Path};
use super::stack::{CallSet, Frame};
use super::trace::Tracer;

/// Input position and exclusion nesting depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct At {
    pub(super) position: usize,
    pub(super) depth: u32,
}

impl At {
    pub(super) fn top(position: usize) -> Self {
        Self { position, depth: 0 }
    }

    pub(super) fn deeper(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    pub(super) fn advance(self) -> Self {
        Self {
            position: self.position + 1,
            ..self
        }
    }
}

/// A state waiting to be activated.
pub(super) struct Item {
    pub(super) ctx: Ctx,
    pub(super) state: StateId,
    pub(super) frame: Option<Frame>,
    pub(super) path: Path,
}

impl Item {
    /// The entry of a frontier's own graph.
    pub(super) fn root(state: StateId, path: Path) -> Self {
        Self {
            ctx: Ctx::Local,
            state,
            frame: None,
            path,
        }
    }
}

pub(crate) struct Simulation<'s, E, T> {
    symbols: &'s SymbolCache<E>,
    /// Cache entries fetched so far, by `SymbolId` index.
    resolved: Vec<Option<Arc<CompiledSymbol<E>>>>,
    limits: Limits,
    track_paths: bool,
    pub(super) tracer: T,
    truncated: bool,
    /// Call sets created so far; gives each one a distinct id.
    call_sets: u64,
}

impl<'s, E: 'static, T: Tracer> Simulation<'s, E, T> {
    pub(super) fn new(
        symbols: &'s SymbolCache<E>,
        limits: Limits,
        track_paths: bool,
        tracer: T,
    ) -> Self {
        Self {
            symbols,
            resolved: Vec::new(),
            limits,
            track_paths,
            tracer,
            truncated: false,
            call_sets: 0,
        }
    }

    pub(super) fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub(super) fn tracks_paths(&self) -> bool {
        self.track_paths
    }

    pub(super) fn into_tracer(self) -> T {
        self.tracer
    }

    pub(super) fn start(&mut self, graph: &Graph<E>) -> Frontier {
        let mut frontier = Frontier::new();
        let entry = Item::root(graph.entry(), Path::default());
        self.seed(graph, &mut frontier, entry, At::top(0));
        frontier
    }

    pub(super) fn extend(&self, path: &Path, event: Event) -> Path {
        if self.track_paths {
            path.push(event)
        } else {
            path.clone()
        }
    }

    /// Activates every resolved successor of `item` into `into`, along with
    /// everything reachable from them without consuming input.
    ///
    /// `local` is the graph of `Ctx::Local` threads in `into`.
    pub(super) fn seed(&mut self, local: &Graph<E>, into: &mut Frontier, item: Item, at: At) {
        let mut work = vec![item];

        while let Some(item) = work.pop() {
            let rule;
            let graph = match item.ctx {
                Ctx::Local => local,
                Ctx::Rule(id) => {
                    rule = self.symbol(id);
                    rule.graph(self.symbols)
                }
            };

            for &state in graph.resolve(item.state) {
                let key = Key::new(item.ctx, state, item.frame.as_ref());
                if !into.visit(key) {
                    continue;
                }
                match graph.state(state) {
                    State::Match => match &item.frame {
                        Some(frame) => self.complete(frame, &item.path, at, &mut work),
                        None => into.insert_plain(key, None, item.path.clone()),
                    },
                    State::Symbolic { symbol, next } => {
                        self.call(graph, *symbol, *next, &item, into, at, &mut work);
                    }
                    State::Exclusion { .. } => self.exclude(graph, key, &item, into, at, &mut work),
                    _ => into.insert_plain(key, item.frame.clone(), item.path.clone()),
                }
            }
        }
    }

    /// Completes `frame` and queues every caller's continuation.
    fn complete(&mut self, frame: &Frame, path: &Path, at: At, work: &mut Vec<Item>) {
        let name = frame.name();
        self.tracer.trace_return(&name, at.position);
        let exited = self.extend(
            path,
            Event::Exit {
                frame: frame.id(),
                name,
                start: frame.start(),
                end: at.position,
            },
        );
        // Queued in reverse so callers resume in registration order.
        for resume in frame.complete(&exited, at.position).into_iter().rev() {
            work.push(Item {
                ctx: resume.ctx,
                state: resume.next,
                frame: resume.frame,
                path: exited.clone(),
            });
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn call(
        &mut self,
        graph: &Graph<E>,
        symbol: SymbolId,
        next: StateId,
        item: &Item,
        into: &mut Frontier,
        at: At,
        work: &mut Vec<Item>,
    ) {
        let rule = self.symbol(symbol);
        let entry = rule.graph(self.symbols).entry();

        if let Some(frame) = &item.frame {
            if graph.resolve(next) == [MATCH] {
                self.tracer.trace_call(rule.name(), at.position);
                let path = self.extend(
                    &item.path,
                    Event::Tail {
                        frame: frame.id(),
                        name: Arc::clone(rule.name()),
                        start: at.position,
                    },
                );
                work.push(Item {
                    ctx: Ctx::Rule(symbol),
                    state: entry,
                    frame: Some(frame.clone()),
                    path,
                });
                return;
            }
        }

        let serial = &mut self.call_sets;
        let calls = into.calls(|| {
            *serial += 1;
            CallSet::new(*serial, at.position)
        });

        if let Some(frame) = Frame::find(&calls, symbol) {
            self.tracer.trace_join(rule.name(), at.position);
            if let Some(done) = frame.add_return(item.ctx, next, item.frame.as_ref()) {
                work.push(Item {
                    ctx: item.ctx,
                    state: next,
                    frame: item.frame.clone(),
                    path: done,
                });
            }
            return;
        }

        let height = item.frame.as_ref().map_or(at.depth, Frame::height) + 1;
        if height > self.limits.get_recursion_limit() {
            self.truncated = true;
            self.tracer.trace_recursion_limit(rule.name(), height);
            return;
        }

        self.tracer.trace_call(rule.name(), at.position);
        let frame = Frame::open(&calls, symbol, Arc::clone(rule.name()), height);
        frame.add_return(item.ctx, next, item.frame.as_ref());
        work.push(Item {
            ctx: Ctx::Rule(symbol),
            state: entry,
            frame: Some(frame),
            path: item.path.clone(),
        });
    }

    /// Consumes `element` at `at.position`, returning the frontier for the
    /// next position.
    pub(super) fn step(
        &mut self,
        local: &Graph<E>,
        frontier: Frontier,
        element: &E,
        at: At,
    ) -> Frontier {
        let mut out = Frontier::new();

        for (key, thread) in frontier.into_threads() {
            let rule;
            let graph = match key.ctx {
                Ctx::Local => local,
                Ctx::Rule(id) => {
                    rule = self.symbol(id);
                    rule.graph(self.symbols)
                }
            };

            match (graph.state(key.state), thread.kind) {
                (State::Consuming { atom, next }, ThreadKind::Plain(path)) => {
                    if atom.matches(element) {
                        let path = self.extend(&path, Event::Atom(at.position));
                        let item = Item {
                            ctx: key.ctx,
                            state: *next,
                            frame: thread.frame,
                            path,
                        };
                        self.seed(local, &mut out, item, at.advance());
                    }
                }
                (State::Exclusion { .. }, ThreadKind::Exclusion(groups)) => {
                    let thread = Thread::exclusion(thread.frame, groups);
                    self.step_exclusion(local, graph, key, thread, element, at, &mut out);
                }
                // Accepted threads consume nothing.
                _ => {}
            }
        }

        out
    }

    fn symbol(&mut self, id: SymbolId) -> Arc<CompiledSymbol<E>> {
        let index = id.index();
        if index >= self.resolved.len() {
            self.resolved.resize(index + 1, None);
        }
        let symbols = self.symbols;
        Arc::clone(self.resolved[index].get_or_insert_with(|| symbols.get(id)))
    }
}
