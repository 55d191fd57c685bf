// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The derivation graph and its builder lifecycle.
use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::builder::Builder;
use crate::config::DgConfig;
use crate::descriptor::{check_not_null, resolve_multiset, Edge, Side, Vertex, VertexDescriptor};
use crate::graph::Graph;
use crate::ident::{next_dg_id, DgId, GraphId, RuleId};
use crate::rule::RuleSet;

/// Lifecycle of a [`Dg`].
///
/// `Unbuilt → Building → Locked`; `Locked` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DgState {
    /// No builder has been requested yet; queries are rejected.
    Unbuilt,
    /// A builder is active; it is the only path to mutation.
    Building,
    /// The builder was released; the DG is permanently read-only.
    Locked,
}

/// Errors emitted by DG lifecycle and query operations.
///
/// The display strings are part of the public contract.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DgError {
    /// A query was issued before [`Dg::build`] was ever called.
    #[error("The DG neither has an active builder nor is locked yet.")]
    NotQueryable,
    /// A source descriptor passed to an edge lookup was null.
    #[error("Source vertex descriptor is null.")]
    NullSource,
    /// A target descriptor passed to an edge lookup was null.
    #[error("Target vertex descriptor is null.")]
    NullTarget,
    /// [`Dg::build`] was called while a builder is still active.
    #[error("The DG already has an active builder.")]
    BuilderActive,
    /// [`Dg::build`] was called after the DG was locked.
    #[error("The DG is locked.")]
    Locked,
    /// A derivation with no sources or no targets was offered to the builder.
    #[error("A derivation needs at least one source and one target.")]
    EmptyDerivation,
}

impl DgError {
    /// The offending side for null-descriptor errors.
    #[must_use]
    pub fn null_side(&self) -> Option<Side> {
        match self {
            Self::NullSource => Some(Side::Source),
            Self::NullTarget => Some(Side::Target),
            _ => None,
        }
    }
}

/// Stored hyperedge: source/target vertex multisets plus the rules that
/// produced it.
#[derive(Clone, Debug)]
pub struct DerivationRecord {
    sources: Vec<Vertex>,
    targets: Vec<Vertex>,
    rules: Vec<RuleId>,
    rule_names: Vec<String>,
}

impl DerivationRecord {
    /// Source vertices in the order first recorded.
    #[must_use]
    pub fn sources(&self) -> &[Vertex] {
        &self.sources
    }

    /// Target vertices in the order first recorded.
    #[must_use]
    pub fn targets(&self) -> &[Vertex] {
        &self.targets
    }

    /// Ids of the rules that produced this derivation.
    #[must_use]
    pub fn rules(&self) -> &[RuleId] {
        &self.rules
    }

    /// Names of the rules that produced this derivation.
    #[must_use]
    pub fn rule_names(&self) -> &[String] {
        &self.rule_names
    }
}

/// Summary counters, serialisable for tooling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DgStats {
    /// Lifecycle state when the stats were taken.
    pub state: DgState,
    /// Number of vertices.
    pub vertices: usize,
    /// Number of hyperedges.
    pub edges: usize,
    /// Number of graphs first discovered as rule products.
    pub products: usize,
}

type EdgeKey = (Vec<usize>, Vec<usize>);

/// Derivation graph: vertices are graphs, hyperedges are derivations.
///
/// Mutation happens only through the [`Builder`] returned by [`Dg::build`].
/// Every query requires that `build` has been called at least once.
pub struct Dg {
    id: DgId,
    state: DgState,
    config: DgConfig,
    rules: RuleSet,
    graphs: Vec<Graph>,
    vertex_of: FxHashMap<GraphId, usize>,
    edges: Vec<DerivationRecord>,
    edge_of: FxHashMap<EdgeKey, usize>,
    products: Vec<Graph>,
}

impl Default for Dg {
    fn default() -> Self {
        Self::new()
    }
}

impl Dg {
    /// Creates an empty, unbuilt DG with the default configuration and no
    /// rules.
    pub fn new() -> Self {
        Self::with_config(DgConfig::default())
    }

    /// Creates an empty, unbuilt DG with an explicit configuration.
    pub fn with_config(config: DgConfig) -> Self {
        Self {
            id: next_dg_id(),
            state: DgState::Unbuilt,
            config,
            rules: RuleSet::new(),
            graphs: Vec::new(),
            vertex_of: FxHashMap::default(),
            edges: Vec::new(),
            edge_of: FxHashMap::default(),
            products: Vec::new(),
        }
    }

    /// Installs the rules applied after each top-level strategy execution.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Process-unique id of this DG.
    #[must_use]
    pub fn id(&self) -> DgId {
        self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> DgState {
        self.state
    }

    /// `true` while a builder is active.
    #[must_use]
    pub fn has_active_builder(&self) -> bool {
        self.state == DgState::Building
    }

    /// `true` once the builder has been released.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state == DgState::Locked
    }

    /// Configuration this DG was created with.
    #[must_use]
    pub fn config(&self) -> &DgConfig {
        &self.config
    }

    /// Rules applied after each top-level strategy execution.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Hands out the unique builder and moves the DG to `Building`.
    ///
    /// # Errors
    /// [`DgError::BuilderActive`] if a builder was handed out and never
    /// released, [`DgError::Locked`] if the DG is already locked.
    pub fn build(&mut self) -> Result<Builder<'_>, DgError> {
        match self.state {
            DgState::Unbuilt => {}
            DgState::Building => return Err(DgError::BuilderActive),
            DgState::Locked => return Err(DgError::Locked),
        }
        self.state = DgState::Building;
        info!(dg = %self.id, "builder acquired");
        Ok(Builder::new(self))
    }

    /// Runs `f` with the builder and releases it afterwards, on every exit
    /// path including unwinding.
    pub fn with_builder<T>(&mut self, f: impl FnOnce(&mut Builder<'_>) -> T) -> Result<T, DgError> {
        let mut builder = self.build()?;
        Ok(f(&mut builder))
    }

    fn ensure_queryable(&self) -> Result<(), DgError> {
        match self.state {
            DgState::Unbuilt => Err(DgError::NotQueryable),
            DgState::Building | DgState::Locked => Ok(()),
        }
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> Result<usize, DgError> {
        self.ensure_queryable()?;
        Ok(self.graphs.len())
    }

    /// All vertices with their graphs, in insertion order.
    pub fn vertices(&self) -> Result<impl Iterator<Item = (Vertex, &Graph)> + '_, DgError> {
        self.ensure_queryable()?;
        let id = self.id;
        Ok(self
            .graphs
            .iter()
            .enumerate()
            .map(move |(i, g)| (Vertex::new(id, i), g)))
    }

    /// Number of hyperedges.
    pub fn num_edges(&self) -> Result<usize, DgError> {
        self.ensure_queryable()?;
        Ok(self.edges.len())
    }

    /// All hyperedges, in insertion order.
    pub fn edges(&self) -> Result<impl Iterator<Item = (Edge, &DerivationRecord)> + '_, DgError> {
        self.ensure_queryable()?;
        let id = self.id;
        Ok(self
            .edges
            .iter()
            .enumerate()
            .map(move |(i, e)| (Edge::new(id, i), e)))
    }

    /// Graph attached to `vertex`, or `None` for a handle of another DG.
    pub fn graph_of(&self, vertex: Vertex) -> Result<Option<&Graph>, DgError> {
        self.ensure_queryable()?;
        if vertex.dg_id() != self.id {
            return Ok(None);
        }
        Ok(self.graphs.get(vertex.index()))
    }

    /// Record behind `edge`, or `None` for a handle of another DG.
    pub fn derivation(&self, edge: Edge) -> Result<Option<&DerivationRecord>, DgError> {
        self.ensure_queryable()?;
        if edge.dg_id() != self.id {
            return Ok(None);
        }
        Ok(self.edges.get(edge.index()))
    }

    /// Vertex carrying `graph`, or `None` if the graph is not a member.
    pub fn find_vertex(&self, graph: &Graph) -> Result<Option<Vertex>, DgError> {
        self.ensure_queryable()?;
        Ok(self
            .vertex_of
            .get(&graph.id())
            .map(|&i| Vertex::new(self.id, i)))
    }

    /// Hyperedge whose source and target multisets equal the given lists.
    ///
    /// Null descriptors are rejected, sources checked before targets.
    /// Descriptors issued by another DG never match.
    pub fn find_edge(
        &self,
        sources: &[VertexDescriptor],
        targets: &[VertexDescriptor],
    ) -> Result<Option<Edge>, DgError> {
        self.ensure_queryable()?;
        check_not_null(sources, targets)?;
        let n = self.graphs.len();
        let (Some(src), Some(tgt)) = (
            resolve_multiset(self.id, n, sources),
            resolve_multiset(self.id, n, targets),
        ) else {
            return Ok(None);
        };
        Ok(self
            .edge_of
            .get(&(src, tgt))
            .map(|&i| Edge::new(self.id, i)))
    }

    /// Like [`Dg::find_edge`], resolving each graph with
    /// [`Dg::find_vertex`] first; a non-member becomes a null descriptor.
    pub fn find_edge_by_graphs(
        &self,
        sources: &[Graph],
        targets: &[Graph],
    ) -> Result<Option<Edge>, DgError> {
        let resolve = |gs: &[Graph]| -> Result<Vec<VertexDescriptor>, DgError> {
            gs.iter()
                .map(|g| self.find_vertex(g).map(VertexDescriptor::from))
                .collect()
        };
        let src = resolve(sources)?;
        let tgt = resolve(targets)?;
        self.find_edge(&src, &tgt)
    }

    /// Every graph attached to a vertex, in insertion order.
    pub fn graph_database(&self) -> Result<&[Graph], DgError> {
        self.ensure_queryable()?;
        Ok(&self.graphs)
    }

    /// Graphs first introduced as the product of a rule.
    pub fn products(&self) -> Result<&[Graph], DgError> {
        self.ensure_queryable()?;
        Ok(&self.products)
    }

    /// Summary counters.
    pub fn stats(&self) -> Result<DgStats, DgError> {
        self.ensure_queryable()?;
        Ok(DgStats {
            state: self.state,
            vertices: self.graphs.len(),
            edges: self.edges.len(),
            products: self.products.len(),
        })
    }

    // --- mutation, reachable only through `Builder` ---

    pub(crate) fn lock(&mut self) {
        self.state = DgState::Locked;
        info!(
            dg = %self.id,
            vertices = self.graphs.len(),
            edges = self.edges.len(),
            "builder released; DG locked"
        );
    }

    /// Returns the vertex for `graph`, inserting it when absent.
    pub(crate) fn insert_vertex(&mut self, graph: &Graph) -> (Vertex, bool) {
        if let Some(&i) = self.vertex_of.get(&graph.id()) {
            return (Vertex::new(self.id, i), false);
        }
        let i = self.graphs.len();
        self.graphs.push(graph.clone());
        self.vertex_of.insert(graph.id(), i);
        (Vertex::new(self.id, i), true)
    }

    /// Records a derivation, inserting missing vertices first.
    ///
    /// Targets that were not yet vertices are remembered as products. A
    /// derivation that already exists only gains the rule annotation.
    pub(crate) fn insert_derivation(
        &mut self,
        sources: &[Graph],
        targets: &[Graph],
        rule: Option<(RuleId, &str)>,
    ) -> Result<(Edge, bool), DgError> {
        if sources.is_empty() || targets.is_empty() {
            return Err(DgError::EmptyDerivation);
        }
        let src: Vec<Vertex> = sources.iter().map(|g| self.insert_vertex(g).0).collect();
        let mut tgt = Vec::with_capacity(targets.len());
        for g in targets {
            let (v, fresh) = self.insert_vertex(g);
            if fresh {
                self.products.push(g.clone());
            }
            tgt.push(v);
        }
        let key = (sorted_indices(&src), sorted_indices(&tgt));
        let (index, fresh) = match self.edge_of.get(&key) {
            Some(&i) => (i, false),
            None => {
                let i = self.edges.len();
                self.edges.push(DerivationRecord {
                    sources: src,
                    targets: tgt,
                    rules: Vec::new(),
                    rule_names: Vec::new(),
                });
                self.edge_of.insert(key, i);
                (i, true)
            }
        };
        if let Some((id, name)) = rule {
            let record = &mut self.edges[index];
            if !record.rules.contains(&id) {
                record.rules.push(id);
                record.rule_names.push(name.to_owned());
            }
        }
        Ok((Edge::new(self.id, index), fresh))
    }
}

fn sorted_indices(vs: &[Vertex]) -> Vec<usize> {
    let mut out: Vec<usize> = vs.iter().map(Vertex::index).collect();
    out.sort_unstable();
    out
}

impl core::fmt::Debug for Dg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dg")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("vertices", &self.graphs.len())
            .field("edges", &self.edges.len())
            .finish_non_exhaustive()
    }
}
