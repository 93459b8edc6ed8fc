//! Incremental matching.
//!
//! A `Stepper` consumes one element per call and reports whether the input
//! seen so far is matched and whether any further input could change that.
//! Callers stop feeding once `done` is reported; stepping past that point
//! is allowed and never matches.

use std::mem;

use sieve_compiler::{Automaton, Graph};

use super::frontier::Frontier;
use super::limits::Limits;
use super::matcher::Outcome;
use super::path::{MatchPath, Path};
use super::simulation::{At, Simulation};
use super::trace::{NoopTracer, Tracer};

/// Result of consuming one element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepStatus {
    /// No live state can consume another element.
    pub done: bool,
    /// The input consumed so far is matched.
    pub matches: bool,
}

pub struct Stepper<'a, E, T: Tracer = NoopTracer> {
    graph: &'a Graph<E>,
    simulation: Simulation<'a, E, T>,
    frontier: Frontier,
    position: usize,
    longest: Option<usize>,
    longest_path: Option<Path>,
    reported_done: bool,
}

impl<'a, E: 'static, T: Tracer> Stepper<'a, E, T> {
    pub(crate) fn new(
        automaton: &'a Automaton<E>,
        limits: Limits,
        track_paths: bool,
        tracer: T,
    ) -> Self {
        let graph = automaton.graph();
        let mut simulation = Simulation::new(automaton.symbols(), limits, track_paths, tracer);
        let frontier = simulation.start(graph);
        let mut stepper = Self {
            graph,
            simulation,
            frontier,
            position: 0,
            longest: None,
            longest_path: None,
            reported_done: false,
        };
        stepper.observe();
        stepper
    }

    pub fn step(&mut self, element: &E) -> StepStatus {
        let frontier = mem::take(&mut self.frontier);
        self.frontier = self
            .simulation
            .step(self.graph, frontier, element, At::top(self.position));
        self.position += 1;
        self.simulation
            .tracer
            .trace_step(self.position, self.frontier.len());
        self.observe()
    }

    fn observe(&mut self) -> StepStatus {
        let matches = self.frontier.contains_match();
        if matches {
            self.longest = Some(self.position);
            self.longest_path = self.frontier.match_path().cloned();
            self.simulation.tracer.trace_accept(self.position);
        }

        let done = self.frontier.is_exhausted();
        if done && !self.reported_done {
            self.reported_done = true;
            self.simulation.tracer.trace_exhausted(self.position);
        }

        StepStatus { done, matches }
    }

    pub fn is_done(&self) -> bool {
        self.frontier.is_exhausted()
    }

    pub fn is_matching(&self) -> bool {
        self.frontier.contains_match()
    }

    /// Number of elements consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Length of the longest matched prefix so far.
    pub fn longest_match(&self) -> Option<usize> {
        self.longest
    }

    pub fn has_matched(&self) -> bool {
        self.longest.is_some()
    }

    /// Some rule calls were pruned by the recursion limit.
    pub fn is_truncated(&self) -> bool {
        self.simulation.is_truncated()
    }

    /// Live states in the top-level frontier.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Live threads across all nesting levels.
    pub fn thread_count(&self) -> usize {
        self.frontier.weight()
    }

    /// Trace of the current match. Empty unless path tracking is enabled.
    pub fn match_path(&self) -> Option<MatchPath> {
        self.frontier.match_path().map(MatchPath::from_path)
    }

    /// Trace of the longest match so far. Empty unless path tracking is enabled.
    pub fn longest_match_path(&self) -> Option<MatchPath> {
        self.longest_path.as_ref().map(MatchPath::from_path)
    }

    pub fn into_tracer(self) -> T {
        self.simulation.into_tracer()
    }

    pub(crate) fn finish(self, leftover: bool) -> Outcome {
        Outcome {
            matched: !leftover && self.is_matching(),
            longest_prefix: self.longest,
            consumed: self.position,
            path: if self.simulation.tracks_paths() {
                self.longest_match_path()
            } else {
                None
            },
            truncated: self.is_truncated(),
        }
    }
}
