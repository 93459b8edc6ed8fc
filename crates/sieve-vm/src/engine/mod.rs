//! Frontier simulation.
//!
//! ```text
//! Matcher ─► Stepper ─► Simulation ─► Frontier
//!                          │             ├─ Thread: Plain | Exclusion
//!                          │             └─ CallSet (rule calls, shared by position)
//!                          └─ SymbolCache (rule graphs, compiled on demand)
//! ```

mod error;
mod exclusion;
mod frontier;
mod limits;
mod matcher;
mod path;
mod simulation;
mod stack;
mod stepper;
mod trace;

#[cfg(test)]
mod trace_tests;

pub use error::RuntimeError;
pub use limits::Limits;
pub use matcher::{Matcher, MatcherBuilder, Outcome};
pub use path::{MatchPath, Segment};
pub use stepper::{StepStatus, Stepper};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
