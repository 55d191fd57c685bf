// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Plain-text DG printer with a vertex visibility stack.
//!
//! Layout and rendering back-ends live elsewhere; this printer decides
//! which vertices are shown and emits a line-oriented listing.
use std::fmt::Write as _;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::dg::{Dg, DgError};
use crate::graph::Graph;

/// Errors emitted by the printer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PrinterError {
    /// [`Printer::pop_vertex_visible`] on an empty stack.
    #[error("Can not pop from an empty vertex visibility stack.")]
    StackUnderflow,
    /// The DG could not be queried.
    #[error(transparent)]
    Dg(#[from] DgError),
}

/// Predicate deciding whether a vertex is rendered.
#[derive(Clone)]
pub enum VertexVisible {
    /// Same answer for every vertex.
    Const(bool),
    /// Decided per graph, with the DG available for context.
    Fn(Arc<dyn Fn(&Graph, &Dg) -> bool + Send + Sync>),
}

impl VertexVisible {
    /// Wraps a closure.
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Graph, &Dg) -> bool + Send + Sync + 'static,
    {
        Self::Fn(Arc::new(f))
    }

    fn eval(&self, graph: &Graph, dg: &Dg) -> bool {
        match self {
            Self::Const(b) => *b,
            Self::Fn(f) => f(graph, dg),
        }
    }
}

impl From<bool> for VertexVisible {
    fn from(b: bool) -> Self {
        Self::Const(b)
    }
}

impl core::fmt::Debug for VertexVisible {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Const(b) => f.debug_tuple("Const").field(b).finish(),
            Self::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

/// DG printer. With an empty visibility stack every vertex is shown.
#[derive(Clone, Debug, Default)]
pub struct Printer {
    visibility: Vec<VertexVisible>,
}

impl Printer {
    /// Creates a printer with an empty visibility stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `predicate`; it governs visibility until popped.
    pub fn push_vertex_visible(&mut self, predicate: impl Into<VertexVisible>) {
        self.visibility.push(predicate.into());
    }

    /// Removes the top predicate.
    ///
    /// # Errors
    /// [`PrinterError::StackUnderflow`] if the stack is empty.
    pub fn pop_vertex_visible(&mut self) -> Result<(), PrinterError> {
        if self.visibility.pop().is_none() {
            warn!("vertex visibility pop on an empty stack");
            return Err(PrinterError::StackUnderflow);
        }
        Ok(())
    }

    /// Pushes `predicate` and returns a guard that pops it when dropped.
    pub fn scoped_vertex_visible(
        &mut self,
        predicate: impl Into<VertexVisible>,
    ) -> VisibilityGuard<'_> {
        self.push_vertex_visible(predicate);
        VisibilityGuard { printer: self }
    }

    /// Depth of the visibility stack.
    #[must_use]
    pub fn visibility_depth(&self) -> usize {
        self.visibility.len()
    }

    /// Evaluates the active predicate for `graph`.
    pub fn is_vertex_visible(&self, graph: &Graph, dg: &Dg) -> bool {
        self.visibility.last().is_none_or(|p| p.eval(graph, dg))
    }

    /// Renders the visible vertices of `dg` and the edges whose endpoints
    /// are all visible.
    pub fn print(&self, dg: &Dg) -> Result<String, PrinterError> {
        let mut visible = Vec::with_capacity(dg.num_vertices()?);
        for (_, g) in dg.vertices()? {
            visible.push(self.is_vertex_visible(g, dg));
        }
        let shown = visible.iter().filter(|v| **v).count();
        let mut out = String::new();
        // Writing to a String is infallible.
        let _ = writeln!(
            out,
            "dg {} [{:?}]: {shown}/{} vertices visible, {} edges",
            dg.id(),
            dg.state(),
            visible.len(),
            dg.num_edges()?
        );
        for (v, g) in dg.vertices()? {
            if visible[v.index()] {
                let _ = writeln!(out, "v{} {g}", v.index());
            }
        }
        for (e, record) in dg.edges()? {
            let all_visible = record
                .sources()
                .iter()
                .chain(record.targets())
                .all(|v| visible[v.index()]);
            if !all_visible {
                continue;
            }
            let side = |vs: &[crate::Vertex]| {
                vs.iter()
                    .map(|v| format!("v{}", v.index()))
                    .collect::<Vec<_>>()
                    .join(" + ")
            };
            let _ = write!(
                out,
                "e{}: {} -> {}",
                e.index(),
                side(record.sources()),
                side(record.targets())
            );
            if !record.rule_names().is_empty() {
                let _ = write!(out, " [{}]", record.rule_names().join(", "));
            }
            out.push('\n');
        }
        Ok(out)
    }
}

/// Keeps a visibility predicate pushed for its lifetime.
pub struct VisibilityGuard<'p> {
    printer: &'p mut Printer,
}

impl core::ops::Deref for VisibilityGuard<'_> {
    type Target = Printer;

    fn deref(&self) -> &Printer {
        self.printer
    }
}

impl core::ops::DerefMut for VisibilityGuard<'_> {
    fn deref_mut(&mut self) -> &mut Printer {
        self.printer
    }
}

impl Drop for VisibilityGuard<'_> {
    fn drop(&mut self) {
        self.printer.visibility.pop();
    }
}
