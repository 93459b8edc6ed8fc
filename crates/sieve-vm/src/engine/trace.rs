//! Tracing infrastructure for debugging simulation.
//!
//! `NoopTracer` methods are `#[inline(always)]` and empty, so an untraced
//! matcher carries no tracing cost. `PrintTracer` collects one line per
//! event, filtered by `Verbosity`.

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Accepts, exclusions, pruning, exhaustion.
    #[default]
    Default,
    /// Adds rule calls, joins, and returns.
    Verbose,
    /// Adds one line per consumed element.
    VeryVerbose,
}

/// Instrumentation hooks called by the simulation.
///
/// Positions count consumed elements: position 0 is before the first
/// element.
pub trait Tracer {
    /// Called after an element is consumed, with the size of the new frontier.
    fn trace_step(&mut self, position: usize, frontier: usize);

    /// Called when a rule call starts.
    fn trace_call(&mut self, name: &str, position: usize);

    /// Called when a rule call completes.
    fn trace_return(&mut self, name: &str, position: usize);

    /// Called when an exclusion's accepted operand completes but the
    /// excluded operand completes on the same span.
    fn trace_excluded(&mut self, position: usize);

    /// Called when a rule call joins a call of the same rule already started
    /// at the same position, as left-recursive calls do.
    fn trace_join(&mut self, name: &str, position: usize);

    /// Called when a rule call is pruned by the recursion limit. `depth` is
    /// the nesting the call would have reached.
    fn trace_recursion_limit(&mut self, name: &str, depth: u32);

    /// Called when the top-level frontier holds an accept.
    fn trace_accept(&mut self, position: usize);

    /// Called once when no state can consume further.
    fn trace_exhausted(&mut self, position: usize);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_step(&mut self, _position: usize, _frontier: usize) {}

    #[inline(always)]
    fn trace_call(&mut self, _name: &str, _position: usize) {}

    #[inline(always)]
    fn trace_return(&mut self, _name: &str, _position: usize) {}

    #[inline(always)]
    fn trace_excluded(&mut self, _position: usize) {}

    #[inline(always)]
    fn trace_join(&mut self, _name: &str, _position: usize) {}

    #[inline(always)]
    fn trace_recursion_limit(&mut self, _name: &str, _depth: u32) {}

    #[inline(always)]
    fn trace_accept(&mut self, _position: usize) {}

    #[inline(always)]
    fn trace_exhausted(&mut self, _position: usize) {}
}

impl<T: Tracer + ?Sized> Tracer for &mut T {
    fn trace_step(&mut self, position: usize, frontier: usize) {
        (**self).trace_step(position, frontier);
    }

    fn trace_call(&mut self, name: &str, position: usize) {
        (**self).trace_call(name, position);
    }

    fn trace_return(&mut self, name: &str, position: usize) {
        (**self).trace_return(name, position);
    }

    fn trace_excluded(&mut self, position: usize) {
        (**self).trace_excluded(position);
    }

    fn trace_join(&mut self, name: &str, position: usize) {
        (**self).trace_join(name, position);
    }

    fn trace_recursion_limit(&mut self, name: &str, depth: u32) {
        (**self).trace_recursion_limit(name, depth);
    }

    fn trace_accept(&mut self, position: usize) {
        (**self).trace_accept(position);
    }

    fn trace_exhausted(&mut self, position: usize) {
        (**self).trace_exhausted(position);
    }
}

/// Tracer that collects execution trace lines.
#[derive(Debug, Default)]
pub struct PrintTracer {
    verbosity: Verbosity,
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn dump(&self) -> String {
        self.lines.join("\n")
    }

    fn push(&mut self, level: Verbosity, line: String) {
        if self.verbosity >= level {
            self.lines.push(line);
        }
    }
}

impl Tracer for PrintTracer {
    fn trace_step(&mut self, position: usize, frontier: usize) {
        self.push(
            Verbosity::VeryVerbose,
            format!("step @{position}: {frontier} live"),
        );
    }

    fn trace_call(&mut self, name: &str, position: usize) {
        self.push(Verbosity::Verbose, format!("call <{name}> @{position}"));
    }

    fn trace_return(&mut self, name: &str, position: usize) {
        self.push(Verbosity::Verbose, format!("return <{name}> @{position}"));
    }

    fn trace_excluded(&mut self, position: usize) {
        self.push(Verbosity::Default, format!("excluded @{position}"));
    }

    fn trace_join(&mut self, name: &str, position: usize) {
        self.push(Verbosity::Verbose, format!("join <{name}> @{position}"));
    }

    fn trace_recursion_limit(&mut self, name: &str, depth: u32) {
        self.push(
            Verbosity::Default,
            format!("recursion limit <{name}> at depth {depth}"),
        );
    }

    fn trace_accept(&mut self, position: usize) {
        self.push(Verbosity::Default, format!("accept @{position}"));
    }

    fn trace_exhausted(&mut self, position: usize) {
        self.push(Verbosity::Default, format!("exhausted @{position}"));
    }
}
