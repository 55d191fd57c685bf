// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transformation rule seam.
//!
//! Matching and rewriting live outside this crate. A [`Rule`] only has to
//! report which derivations it can produce from the graphs it is offered;
//! the executor records them as hyperedges.
use std::sync::Arc;

use crate::graph::Graph;
use crate::ident::{make_rule_id, RuleId};

/// One reaction step: `sources` are consumed, `targets` are produced.
///
/// Both sides must be non-empty for the derivation to be recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Derivation {
    /// Educt graphs, in order (repeats allowed).
    pub sources: Vec<Graph>,
    /// Product graphs, in order (repeats allowed).
    pub targets: Vec<Graph>,
}

impl Derivation {
    /// Convenience constructor.
    pub fn new(
        sources: impl IntoIterator<Item = Graph>,
        targets: impl IntoIterator<Item = Graph>,
    ) -> Self {
        Self {
            sources: sources.into_iter().collect(),
            targets: targets.into_iter().collect(),
        }
    }

    /// `true` when either side is empty.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.sources.is_empty() || self.targets.is_empty()
    }
}

/// A transformation rule implemented by an external matcher.
pub trait Rule: Send + Sync {
    /// Human-readable name for logs, printing and edge annotations.
    fn name(&self) -> &str;

    /// Stable identifier; defaults to [`make_rule_id`] of the name.
    fn id(&self) -> RuleId {
        make_rule_id(self.name())
    }

    /// Derivations obtainable by using at least one graph of `subset`,
    /// with any graph of `universe` available as a co-educt.
    fn apply(&self, subset: &[Graph], universe: &[Graph]) -> Vec<Derivation>;
}

impl core::fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name())
            .field("id", &self.id().short())
            .finish()
    }
}

/// Ordered collection of rules, unique by [`RuleId`].
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `rule` unless a rule with the same id is already present.
    ///
    /// Returns `false` when the rule was a duplicate.
    pub fn push(&mut self, rule: Arc<dyn Rule>) -> bool {
        let id = rule.id();
        if self.rules.iter().any(|r| r.id() == id) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// `true` when the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }
}

impl FromIterator<Arc<dyn Rule>> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Rule>>>(iter: I) -> Self {
        let mut set = Self::new();
        for rule in iter {
            set.push(rule);
        }
        set
    }
}

impl core::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}
