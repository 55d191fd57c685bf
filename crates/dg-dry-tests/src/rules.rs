// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixture rules.
//!
//! Real matching is out of scope for the core, so fixtures describe their
//! derivations up front. Product graphs are created once, which keeps graph
//! identities stable across repeated applications.

use dg_core::{Derivation, Graph, Rule};

/// Rule that never derives anything.
#[derive(Debug, Clone)]
pub struct NoOpRule {
    name: String,
}

impl NoOpRule {
    /// Creates a no-op rule called `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
        }
    }
}

impl Rule for NoOpRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, _: &[Graph], _: &[Graph]) -> Vec<Derivation> {
        Vec::new()
    }
}

/// Rule backed by a fixed table of derivations.
///
/// An entry fires when every source is available (in the subset or the
/// universe) and at least one source is in the subset.
#[derive(Debug, Clone)]
pub struct TableRule {
    name: String,
    entries: Vec<Derivation>,
}

impl TableRule {
    /// Creates an empty table rule called `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            entries: Vec::new(),
        }
    }

    /// Adds the entry `sources -> targets`.
    pub fn derive(mut self, sources: &[&Graph], targets: &[&Graph]) -> Self {
        self.entries.push(Derivation::new(
            sources.iter().map(|g| (*g).clone()),
            targets.iter().map(|g| (*g).clone()),
        ));
        self
    }
}

impl Rule for TableRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, subset: &[Graph], universe: &[Graph]) -> Vec<Derivation> {
        let available = |g: &Graph| subset.contains(g) || universe.contains(g);
        self.entries
            .iter()
            .filter(|d| {
                d.sources.iter().all(|g| available(g))
                    && d.sources.iter().any(|g| subset.contains(g))
            })
            .cloned()
            .collect()
    }
}
