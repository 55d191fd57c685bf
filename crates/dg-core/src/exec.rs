// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Strategy executor.
//!
//! Interprets a [`Strategy`] tree against the DG held by a builder. Each
//! node maps an input [`GraphState`] to an output state; sequences thread
//! the state through their children left to right, which makes the result
//! independent of how nested sequences are associated.
use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::descriptor::Edge;
use crate::dg::Dg;
use crate::graph::Graph;
use crate::ident::GraphId;
use crate::rule::{Derivation, Rule};
use crate::strategy::Strategy;

#[derive(Clone, Debug, Default)]
struct GraphList {
    order: Vec<Graph>,
    members: FxHashSet<GraphId>,
}

impl GraphList {
    fn insert(&mut self, g: &Graph) -> bool {
        if self.members.insert(g.id()) {
            self.order.push(g.clone());
            true
        } else {
            false
        }
    }

    fn contains(&self, g: &Graph) -> bool {
        self.members.contains(&g.id())
    }
}

/// The `(subset, universe)` pair threaded through execution.
///
/// Invariant: every subset member is also a universe member. Both lists
/// keep insertion order and hold no duplicates. Equality compares them as
/// sets.
#[derive(Clone, Debug, Default)]
pub struct GraphState {
    subset: GraphList,
    universe: GraphList,
}

impl GraphState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Graphs currently exposed as output.
    #[must_use]
    pub fn subset(&self) -> &[Graph] {
        &self.subset.order
    }

    /// Every graph known to the execution so far.
    #[must_use]
    pub fn universe(&self) -> &[Graph] {
        &self.universe.order
    }

    /// `true` if `g` is in the subset.
    #[must_use]
    pub fn in_subset(&self, g: &Graph) -> bool {
        self.subset.contains(g)
    }

    /// `true` if `g` is in the universe.
    #[must_use]
    pub fn in_universe(&self, g: &Graph) -> bool {
        self.universe.contains(g)
    }

    /// Adds `g` to the universe.
    pub fn add_to_universe(&mut self, g: &Graph) {
        self.universe.insert(g);
    }

    /// Adds `g` to the subset (and therefore to the universe).
    pub fn add_to_subset(&mut self, g: &Graph) {
        self.universe.insert(g);
        self.subset.insert(g);
    }

    fn with_universe(universe: &GraphList) -> Self {
        Self {
            subset: GraphList::default(),
            universe: universe.clone(),
        }
    }
}

impl PartialEq for GraphState {
    fn eq(&self, other: &Self) -> bool {
        self.subset.members == other.subset.members
            && self.universe.members == other.universe.members
    }
}

impl Eq for GraphState {}

/// Outcome of executing a top-level strategy.
#[derive(Clone, Debug)]
pub struct ExecuteResult {
    state: GraphState,
    edges: Vec<Edge>,
}

impl ExecuteResult {
    /// Final subset.
    #[must_use]
    pub fn subset(&self) -> &[Graph] {
        self.state.subset()
    }

    /// Final universe.
    #[must_use]
    pub fn universe(&self) -> &[Graph] {
        self.state.universe()
    }

    /// Final state, e.g. to continue with [`crate::Builder::execute_from`].
    #[must_use]
    pub fn state(&self) -> &GraphState {
        &self.state
    }

    /// Consumes the result, returning the final state.
    #[must_use]
    pub fn into_state(self) -> GraphState {
        self.state
    }

    /// Hyperedges created during this execution, in creation order.
    #[must_use]
    pub fn new_edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Name-level summary for tooling.
    #[must_use]
    pub fn summary(&self) -> ExecuteSummary {
        ExecuteSummary {
            subset: self.subset().iter().map(|g| g.name().to_owned()).collect(),
            universe: self.universe().iter().map(|g| g.name().to_owned()).collect(),
            new_edges: self.edges.len(),
        }
    }
}

/// Serialisable view of an [`ExecuteResult`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExecuteSummary {
    /// Subset graph names, in order.
    pub subset: Vec<String>,
    /// Universe graph names, in order.
    pub universe: Vec<String>,
    /// Number of hyperedges created.
    pub new_edges: usize,
}

struct Step {
    output: GraphState,
    consumed: FxHashSet<GraphId>,
}

pub(crate) struct Executor<'a> {
    dg: &'a mut Dg,
    verbose: bool,
    edges: Vec<Edge>,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(dg: &'a mut Dg) -> Self {
        let verbose = dg.config().verbose;
        Self {
            dg,
            verbose,
            edges: Vec::new(),
        }
    }

    /// Executes `strategy` from `input`, then applies the DG's rule set over
    /// the resulting universe when configured to.
    ///
    /// Every graph of the input universe becomes a vertex first.
    pub(crate) fn run(mut self, strategy: &Strategy, input: &GraphState) -> ExecuteResult {
        for g in input.universe() {
            self.dg.insert_vertex(g);
        }
        let step = self.exec(strategy, input, 0);
        if self.dg.config().derive_after_execute {
            self.derive_over(step.output.universe());
        }
        ExecuteResult {
            state: step.output,
            edges: self.edges,
        }
    }

    /// Applies one rule to `graphs` (as both subset and universe).
    pub(crate) fn apply_rule(mut self, graphs: &[Graph], rule: &dyn Rule) -> Vec<Edge> {
        let derivations = rule.apply(graphs, graphs);
        for d in &derivations {
            self.record(d, rule);
        }
        self.edges
    }

    fn trace(&self, depth: usize, what: &str, state: &GraphState) {
        let subset = state.subset().len();
        let universe = state.universe().len();
        if self.verbose {
            info!(depth, subset, universe, "{what}");
        } else {
            debug!(depth, subset, universe, "{what}");
        }
    }

    fn exec(&mut self, strategy: &Strategy, input: &GraphState, depth: usize) -> Step {
        let step = match strategy {
            Strategy::AddSubset(src) | Strategy::AddUniverse(src) => {
                let only_universe = matches!(strategy, Strategy::AddUniverse(_));
                let mut output = input.clone();
                for g in src.graphs() {
                    self.dg.insert_vertex(&g);
                    if only_universe {
                        output.add_to_universe(&g);
                    } else {
                        output.add_to_subset(&g);
                    }
                }
                Step {
                    output,
                    consumed: FxHashSet::default(),
                }
            }
            Strategy::Sequence(children) => {
                let mut state = input.clone();
                let mut consumed = FxHashSet::default();
                for child in children.iter() {
                    let step = self.exec(child, &state, depth + 1);
                    consumed.extend(step.consumed);
                    state = step.output;
                }
                Step {
                    output: state,
                    consumed,
                }
            }
            Strategy::Rule(rule) => self.exec_rule(rule.as_ref(), input),
            Strategy::Take { limit, universe } => {
                let output = if *universe {
                    let mut kept = GraphList::default();
                    for g in input.universe().iter().take(*limit) {
                        kept.insert(g);
                    }
                    let mut output = GraphState::with_universe(&kept);
                    for g in input.subset() {
                        if kept.contains(g) {
                            output.subset.insert(g);
                        }
                    }
                    output
                } else {
                    let mut output = GraphState::with_universe(&input.universe);
                    for g in input.subset().iter().take(*limit) {
                        output.subset.insert(g);
                    }
                    output
                };
                Step {
                    output,
                    consumed: FxHashSet::default(),
                }
            }
            Strategy::Revive(inner) => {
                let mut step = self.exec(inner, input, depth + 1);
                for g in input.subset() {
                    if !step.consumed.contains(&g.id()) && step.output.in_universe(g) {
                        step.output.subset.insert(g);
                    }
                }
                step
            }
        };
        self.trace(depth, strategy_kind(strategy), &step.output);
        step
    }

    fn exec_rule(&mut self, rule: &dyn Rule, input: &GraphState) -> Step {
        let mut output = GraphState::with_universe(&input.universe);
        let mut consumed = FxHashSet::default();
        for d in rule.apply(input.subset(), input.universe()) {
            if !self.record(&d, rule) {
                continue;
            }
            consumed.extend(d.sources.iter().map(Graph::id));
            for g in &d.sources {
                output.add_to_universe(g);
            }
            for g in &d.targets {
                output.add_to_subset(g);
            }
        }
        Step { output, consumed }
    }

    fn derive_over(&mut self, universe: &[Graph]) {
        let rules = self.dg.rules().clone();
        if rules.is_empty() {
            return;
        }
        let before = self.edges.len();
        for rule in rules.iter() {
            for d in rule.apply(universe, universe) {
                self.record(&d, rule.as_ref());
            }
        }
        info!(
            rules = rules.len(),
            new_edges = self.edges.len() - before,
            "derivations computed over universe"
        );
    }

    /// Stores `d` as a hyperedge; returns `false` if it was dropped.
    fn record(&mut self, d: &Derivation, rule: &dyn Rule) -> bool {
        match self
            .dg
            .insert_derivation(&d.sources, &d.targets, Some((rule.id(), rule.name())))
        {
            Ok((edge, fresh)) => {
                if fresh {
                    self.edges.push(edge);
                }
                true
            }
            Err(err) => {
                warn!(rule = rule.name(), %err, "dropping derivation");
                false
            }
        }
    }
}

fn strategy_kind(strategy: &Strategy) -> &'static str {
    match strategy {
        Strategy::AddSubset(_) => "add subset",
        Strategy::AddUniverse(_) => "add universe",
        Strategy::Sequence(_) => "sequence",
        Strategy::Rule(_) => "rule",
        Strategy::Take { universe: false, .. } => "take subset",
        Strategy::Take { universe: true, .. } => "take universe",
        Strategy::Revive(_) => "revive",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::named;

    #[test]
    fn subset_members_join_the_universe() {
        let g = named("O");
        let mut state = GraphState::new();
        state.add_to_subset(&g);
        state.add_to_subset(&g);
        assert_eq!(state.subset(), [g.clone()]);
        assert_eq!(state.universe(), [g.clone()]);
        assert!(state.in_subset(&g));
        assert!(state.in_universe(&g));
    }

    #[test]
    fn state_equality_ignores_order() {
        let (a, b) = (named("A"), named("B"));
        let mut left = GraphState::new();
        left.add_to_subset(&a);
        left.add_to_universe(&b);
        let mut right = GraphState::new();
        right.add_to_universe(&b);
        right.add_to_subset(&a);
        assert_eq!(left, right);
        right.add_to_subset(&b);
        assert_ne!(left, right);
    }
}
