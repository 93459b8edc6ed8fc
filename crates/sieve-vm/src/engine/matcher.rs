//! Whole-input matching queries.

use std::borrow::Borrow;

use sieve_compiler::Automaton;

use super::error::RuntimeError;
use super::limits::Limits;
use super::path::MatchPath;
use super::stepper::Stepper;
use super::trace::{NoopTracer, Tracer};

/// Result of running a matcher over an input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// The whole input is matched.
    pub matched: bool,
    /// Length of the longest matched prefix, `Some(0)` if only the empty
    /// prefix matches.
    pub longest_prefix: Option<usize>,
    /// Elements consumed before the run stopped.
    pub consumed: usize,
    /// Trace of the longest matched prefix, when path tracking is enabled.
    pub path: Option<MatchPath>,
    /// Some rule calls were pruned by the recursion limit.
    pub truncated: bool,
}

impl Outcome {
    pub fn has_matching_prefix(&self) -> bool {
        self.longest_prefix.is_some()
    }
}

/// Runs inputs against a compiled automaton.
///
/// Matching stops as soon as no live state can consume more input.
pub struct Matcher<'a, E> {
    automaton: &'a Automaton<E>,
    limits: Limits,
    track_paths: bool,
}

/// Builder for `Matcher` instances.
pub struct MatcherBuilder<'a, E> {
    automaton: &'a Automaton<E>,
    limits: Limits,
    track_paths: bool,
}

impl<'a, E: 'static> MatcherBuilder<'a, E> {
    pub fn new(automaton: &'a Automaton<E>) -> Self {
        Self {
            automaton,
            limits: Limits::default(),
            track_paths: false,
        }
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.limits = self.limits.recursion_limit(limit);
        self
    }

    /// Record a `MatchPath` for accepted input.
    pub fn track_paths(mut self, track: bool) -> Self {
        self.track_paths = track;
        self
    }

    pub fn build(self) -> Matcher<'a, E> {
        Matcher {
            automaton: self.automaton,
            limits: self.limits,
            track_paths: self.track_paths,
        }
    }
}

impl<'a, E: 'static> Matcher<'a, E> {
    pub fn new(automaton: &'a Automaton<E>) -> Self {
        Self::builder(automaton).build()
    }

    pub fn builder(automaton: &'a Automaton<E>) -> MatcherBuilder<'a, E> {
        MatcherBuilder::new(automaton)
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn stepper(&self) -> Stepper<'a, E> {
        self.stepper_with(NoopTracer)
    }

    pub fn stepper_with<T: Tracer>(&self, tracer: T) -> Stepper<'a, E, T> {
        Stepper::new(self.automaton, self.limits, self.track_paths, tracer)
    }

    /// The whole input is matched.
    pub fn matches<I>(&self, input: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        self.run(input).matched
    }

    /// Some prefix of the input, possibly empty, is matched.
    ///
    /// Returns at the first accepted prefix without reading further.
    pub fn has_matching_prefix<I>(&self, input: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        let mut stepper = self.stepper();
        if stepper.is_matching() {
            return true;
        }
        for element in input {
            let status = stepper.step(element.borrow());
            if status.matches {
                return true;
            }
            if status.done {
                break;
            }
        }
        false
    }

    /// The longest matched prefix of `input`, if any prefix matches.
    pub fn longest_matching_prefix<'i>(&self, input: &'i [E]) -> Option<&'i [E]> {
        self.run(input).longest_prefix.map(|end| &input[..end])
    }

    /// Trace of a whole-input match, with path tracking forced on.
    pub fn match_path<I>(&self, input: I) -> Option<MatchPath>
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        let tracking = Matcher {
            track_paths: true,
            ..*self
        };
        let outcome = tracking.run(input);
        if outcome.matched { outcome.path } else { None }
    }

    pub fn run<I>(&self, input: I) -> Outcome
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        self.run_with(input, NoopTracer)
    }

    pub fn run_with<I, T>(&self, input: I, tracer: T) -> Outcome
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
        T: Tracer,
    {
        let mut stepper = self.stepper_with(tracer);
        let mut leftover = false;
        for element in input {
            if stepper.is_done() {
                leftover = true;
                break;
            }
            stepper.step(element.borrow());
        }
        stepper.finish(leftover)
    }

    /// Like `run`, but fails if the recursion limit pruned any rule call.
    pub fn try_run<I>(&self, input: I) -> Result<Outcome, RuntimeError>
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        let outcome = self.run(input);
        if outcome.truncated {
            return Err(RuntimeError::RecursionLimitExceeded(
                self.limits.get_recursion_limit(),
            ));
        }
        Ok(outcome)
    }
}
