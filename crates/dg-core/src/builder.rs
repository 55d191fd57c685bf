// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Exclusive write handle on a derivation graph.
use tracing::instrument;

use crate::descriptor::{Edge, Vertex};
use crate::dg::{Dg, DgError};
use crate::exec::{ExecuteResult, Executor, GraphState};
use crate::graph::Graph;
use crate::rule::{Derivation, Rule};
use crate::strategy::Strategy;

/// The single writer of a [`Dg`].
///
/// Obtained from [`Dg::build`]. The borrow it holds keeps every other
/// writer out; dropping it (or calling [`Builder::release`]) locks the DG
/// for good. Read access during construction goes through [`Builder::dg`].
pub struct Builder<'dg> {
    dg: &'dg mut Dg,
}

impl<'dg> Builder<'dg> {
    pub(crate) fn new(dg: &'dg mut Dg) -> Self {
        Self { dg }
    }

    /// Read-only view of the DG under construction.
    #[must_use]
    pub fn dg(&self) -> &Dg {
        self.dg
    }

    /// Adds `graph` as a vertex, returning the existing vertex if present.
    pub fn add_graph(&mut self, graph: &Graph) -> Vertex {
        self.dg.insert_vertex(graph).0
    }

    /// Records `derivation` as a hyperedge, optionally annotated with the
    /// rule that produced it. Missing vertices are added first.
    ///
    /// # Errors
    /// [`DgError::EmptyDerivation`] if either side is empty.
    pub fn add_derivation(
        &mut self,
        derivation: &Derivation,
        rule: Option<&dyn Rule>,
    ) -> Result<Edge, DgError> {
        let annotation = rule.map(|r| (r.id(), r.name()));
        self.dg
            .insert_derivation(&derivation.sources, &derivation.targets, annotation)
            .map(|(edge, _)| edge)
    }

    /// Applies `rule` to `graphs` and records every derivation it reports.
    ///
    /// Returns the hyperedges that did not exist before.
    #[instrument(skip_all, fields(dg = %self.dg.id(), rule = rule.name()))]
    pub fn apply(&mut self, graphs: &[Graph], rule: &dyn Rule) -> Vec<Edge> {
        for g in graphs {
            self.dg.insert_vertex(g);
        }
        Executor::new(&mut *self.dg).apply_rule(graphs, rule)
    }

    /// Executes `strategy` from an empty state.
    #[instrument(skip_all, fields(dg = %self.dg.id()))]
    pub fn execute(&mut self, strategy: &Strategy) -> ExecuteResult {
        Executor::new(&mut *self.dg).run(strategy, &GraphState::new())
    }

    /// Executes `strategy` starting from a prior state, e.g. the result of an
    /// earlier execution on the same builder.
    #[instrument(skip_all, fields(dg = %self.dg.id()))]
    pub fn execute_from(&mut self, strategy: &Strategy, input: GraphState) -> ExecuteResult {
        Executor::new(&mut *self.dg).run(strategy, &input)
    }

    /// Ends the build session, locking the DG. Equivalent to dropping.
    pub fn release(self) {}
}

impl Drop for Builder<'_> {
    fn drop(&mut self) {
        self.dg.lock();
    }
}

impl core::fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Builder").field("dg", &self.dg).finish()
    }
}
