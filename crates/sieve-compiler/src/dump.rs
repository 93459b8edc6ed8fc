//! Text dump of compiled graphs for snapshot tests and debugging.
//!
//! ```text
//! entry: S4
//! S0: MATCH
//! S1: DEAD
//! S2: 'a' → S0
//! S3: <Word> → S0
//! S4: ε → S2, S3
//! ```
//!
//! Exclusion operands are printed after the states as indented `G<n>`
//! blocks.

use std::fmt::Write;

use crate::cache::{SymbolCache, SymbolId};
use crate::graph::{Graph, State};

pub struct GraphPrinter<'a, E> {
    graph: &'a Graph<E>,
    symbols: Option<&'a SymbolCache<E>>,
}

impl<'a, E: 'static> GraphPrinter<'a, E> {
    pub fn new(graph: &'a Graph<E>) -> Self {
        Self {
            graph,
            symbols: None,
        }
    }

    /// Resolve symbol names through `symbols`. Without it, symbols print by id.
    pub fn symbols(mut self, symbols: &'a SymbolCache<E>) -> Self {
        self.symbols = Some(symbols);
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(self.graph, 0, &mut out)
            .expect("String write never fails");
        out
    }

    fn format(&self, graph: &Graph<E>, depth: usize, w: &mut String) -> std::fmt::Result {
        let pad = "  ".repeat(depth);
        writeln!(w, "{pad}entry: S{}", graph.entry())?;

        for (id, state) in graph.iter() {
            write!(w, "{pad}S{id}: ")?;
            match state {
                State::Match => w.push_str("MATCH"),
                State::Dead => w.push_str("DEAD"),
                State::Consuming { atom, next } => write!(w, "{atom:?} → S{next}")?,
                State::Branch { first, second } => write!(w, "ε → S{first}, S{second}")?,
                State::Symbolic { symbol, next } => {
                    write!(w, "<{}> → S{next}", self.symbol_name(*symbol))?
                }
                State::Exclusion {
                    accept,
                    reject,
                    next,
                } => write!(w, "G{accept} ÷ G{reject} → S{next}")?,
            }
            w.push('\n');
        }

        for (i, subgraph) in graph.subgraphs().iter().enumerate() {
            writeln!(w, "{pad}G{i}:")?;
            self.format(subgraph, depth + 1, w)?;
        }

        Ok(())
    }

    fn symbol_name(&self, id: SymbolId) -> String {
        match self.symbols {
            Some(symbols) => symbols.get(id).name().to_string(),
            None => id.to_string(),
        }
    }
}
