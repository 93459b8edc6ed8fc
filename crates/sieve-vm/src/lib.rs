//! Matching engine for compiled sieve graphs.
//!
//! The engine simulates all live states at once. Named rules run as
//! subroutines on a shared graph-structured call stack, and exclusions step
//! their two operands side by side. Input is consumed strictly left to right,
//! one element per step, with no backtracking.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;
mod invariants;

pub use engine::{
    Limits, MatchPath, Matcher, MatcherBuilder, NoopTracer, Outcome, PrintTracer, RuntimeError,
    Segment, StepStatus, Stepper, Tracer, Verbosity,
};
