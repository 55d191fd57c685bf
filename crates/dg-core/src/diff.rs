// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Structural comparison of two derivation graphs.
//!
//! Not an isomorphism check: vertices are equal when they carry the same
//! graph, edges when their source and target graph multisets are equal.
use std::collections::BTreeSet;

use crate::dg::{Dg, DgError};
use crate::graph::Graph;
use crate::ident::GraphId;

type EdgeKey = (Vec<GraphId>, Vec<GraphId>);

/// Vertices and edges found on one side only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffSide {
    /// Graphs that are vertices on this side only.
    pub vertices: Vec<Graph>,
    /// `(sources, targets)` of edges present on this side only.
    pub edges: Vec<(Vec<Graph>, Vec<Graph>)>,
}

impl DiffSide {
    /// `true` when nothing is unique to this side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }
}

/// Result of [`diff`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DgDiff {
    /// Present in the first DG only.
    pub only_in_first: DiffSide,
    /// Present in the second DG only.
    pub only_in_second: DiffSide,
}

impl DgDiff {
    /// `true` when the two DGs are equal under this comparison.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.only_in_first.is_empty() && self.only_in_second.is_empty()
    }
}

/// Compares `first` and `second`. Both must be queryable.
pub fn diff(first: &Dg, second: &Dg) -> Result<DgDiff, DgError> {
    let a = collect(first)?;
    let b = collect(second)?;
    Ok(DgDiff {
        only_in_first: one_side(&a, &b),
        only_in_second: one_side(&b, &a),
    })
}

struct Collected {
    vertices: Vec<Graph>,
    vertex_ids: BTreeSet<GraphId>,
    edges: Vec<(EdgeKey, Vec<Graph>, Vec<Graph>)>,
    edge_keys: BTreeSet<EdgeKey>,
}

fn collect(dg: &Dg) -> Result<Collected, DgError> {
    let vertices: Vec<Graph> = dg.vertices()?.map(|(_, g)| g.clone()).collect();
    let vertex_ids = vertices.iter().map(Graph::id).collect();
    let mut edges = Vec::new();
    let mut edge_keys = BTreeSet::new();
    for (_, record) in dg.edges()? {
        let graphs = |vs: &[crate::Vertex]| -> Vec<Graph> {
            vs.iter()
                .filter_map(|v| vertices.get(v.index()).cloned())
                .collect()
        };
        let sources = graphs(record.sources());
        let targets = graphs(record.targets());
        let key = (sorted_ids(&sources), sorted_ids(&targets));
        edge_keys.insert(key.clone());
        edges.push((key, sources, targets));
    }
    Ok(Collected {
        vertices,
        vertex_ids,
        edges,
        edge_keys,
    })
}

fn sorted_ids(gs: &[Graph]) -> Vec<GraphId> {
    let mut ids: Vec<GraphId> = gs.iter().map(Graph::id).collect();
    ids.sort_unstable();
    ids
}

fn one_side(this: &Collected, other: &Collected) -> DiffSide {
    DiffSide {
        vertices: this
            .vertices
            .iter()
            .filter(|g| !other.vertex_ids.contains(&g.id()))
            .cloned()
            .collect(),
        edges: this
            .edges
            .iter()
            .filter(|(key, _, _)| !other.edge_keys.contains(key))
            .map(|(_, s, t)| (s.clone(), t.clone()))
            .collect(),
    }
}
