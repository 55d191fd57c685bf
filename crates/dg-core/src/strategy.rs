// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Strategy algebra describing how a derivation graph grows.
//!
//! Strategies are immutable trees. Leaves add graphs, apply a rule or trim
//! the state; composites sequence or revive sub-strategies. Cloning is
//! cheap: children are shared.
use std::sync::Arc;

use thiserror::Error;

use crate::graph::Graph;
use crate::rule::Rule;

/// Errors raised while constructing strategies.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StrategyError {
    /// [`Strategy::make_sequence`] was given no elements.
    #[error("Can not create an empty-length sequence strategy.")]
    EmptySequence,
}

/// Callback producing graphs when an add strategy executes.
pub type GraphGenerator = Arc<dyn Fn() -> Vec<Graph> + Send + Sync>;

/// Where an add strategy takes its graphs from.
#[derive(Clone)]
pub enum GraphSource {
    /// A fixed list captured at construction time.
    Fixed(Arc<[Graph]>),
    /// A generator invoked on every execution.
    Generator(GraphGenerator),
}

impl GraphSource {
    /// Materialises the graphs for one execution.
    pub(crate) fn graphs(&self) -> Vec<Graph> {
        match self {
            Self::Fixed(gs) => gs.to_vec(),
            Self::Generator(f) => f(),
        }
    }
}

impl core::fmt::Debug for GraphSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(gs) => f.debug_list().entries(gs.iter()).finish(),
            Self::Generator(_) => f.write_str("<generator>"),
        }
    }
}

/// A node of the strategy tree.
#[derive(Clone, Debug)]
pub enum Strategy {
    /// Add graphs to the universe and to the output subset.
    AddSubset(GraphSource),
    /// Add graphs to the universe only.
    AddUniverse(GraphSource),
    /// Run children in order, threading the state through. Never empty.
    Sequence(Arc<[Strategy]>),
    /// Apply a rule to the current subset with the universe available.
    Rule(Arc<dyn Rule>),
    /// Keep the first `limit` graphs of the subset, or of the universe.
    Take {
        /// How many graphs survive.
        limit: usize,
        /// Trim the universe (subset restricted accordingly) instead of the subset.
        universe: bool,
    },
    /// Run the inner strategy, then restore unconsumed input subset graphs.
    Revive(Arc<Strategy>),
}

impl Strategy {
    /// Leaf adding `graphs` to both the universe and the subset.
    pub fn add_subset(graphs: impl IntoIterator<Item = Graph>) -> Self {
        Self::AddSubset(GraphSource::Fixed(graphs.into_iter().collect()))
    }

    /// Leaf adding `graphs` to the universe only.
    pub fn add_universe(graphs: impl IntoIterator<Item = Graph>) -> Self {
        Self::AddUniverse(GraphSource::Fixed(graphs.into_iter().collect()))
    }

    /// Like [`Strategy::add_subset`], with graphs produced at execution time.
    pub fn add_subset_with<F>(generator: F) -> Self
    where
        F: Fn() -> Vec<Graph> + Send + Sync + 'static,
    {
        Self::AddSubset(GraphSource::Generator(Arc::new(generator)))
    }

    /// Like [`Strategy::add_universe`], with graphs produced at execution time.
    pub fn add_universe_with<F>(generator: F) -> Self
    where
        F: Fn() -> Vec<Graph> + Send + Sync + 'static,
    {
        Self::AddUniverse(GraphSource::Generator(Arc::new(generator)))
    }

    /// Sequence of `strategies`, executed in order.
    ///
    /// # Errors
    /// [`StrategyError::EmptySequence`] if `strategies` is empty.
    pub fn make_sequence(strategies: Vec<Strategy>) -> Result<Self, StrategyError> {
        if strategies.is_empty() {
            return Err(StrategyError::EmptySequence);
        }
        Ok(Self::Sequence(strategies.into()))
    }

    /// Two-element sequence: `self`, then `next`.
    ///
    /// No flattening happens; nested sequences execute identically to a
    /// flat one.
    pub fn then(self, next: Strategy) -> Self {
        Self::Sequence(Arc::from([self, next]))
    }

    /// Leaf applying `rule`.
    pub fn rule(rule: Arc<dyn Rule>) -> Self {
        Self::Rule(rule)
    }

    /// Keep the first `limit` graphs of the subset.
    pub fn take_subset(limit: usize) -> Self {
        Self::Take {
            limit,
            universe: false,
        }
    }

    /// Keep the first `limit` graphs of the universe.
    pub fn take_universe(limit: usize) -> Self {
        Self::Take {
            limit,
            universe: true,
        }
    }

    /// Wrap `inner` so unconsumed input subset graphs survive it.
    pub fn revive(inner: Strategy) -> Self {
        Self::Revive(Arc::new(inner))
    }

    fn write_tree(&self, f: &mut core::fmt::Formatter<'_>, depth: usize) -> core::fmt::Result {
        let pad = depth * 2;
        match self {
            Self::AddSubset(src) | Self::AddUniverse(src) => {
                let kind = if matches!(self, Self::AddSubset(_)) {
                    "AddSubset"
                } else {
                    "AddUniverse"
                };
                write!(f, "{:pad$}{kind}:", "")?;
                match src {
                    GraphSource::Fixed(gs) => {
                        for g in gs.iter() {
                            write!(f, " {g}")?;
                        }
                    }
                    GraphSource::Generator(_) => f.write_str(" <generator>")?,
                }
                writeln!(f)
            }
            Self::Sequence(children) => {
                writeln!(f, "{:pad$}Sequence:", "")?;
                for child in children.iter() {
                    child.write_tree(f, depth + 1)?;
                }
                Ok(())
            }
            Self::Rule(rule) => writeln!(f, "{:pad$}Rule: {}", "", rule.name()),
            Self::Take { limit, universe } => {
                let of = if *universe { "universe" } else { "subset" };
                writeln!(f, "{:pad$}Take {of}: limit = {limit}", "")
            }
            Self::Revive(inner) => {
                writeln!(f, "{:pad$}Revive:", "")?;
                inner.write_tree(f, depth + 1)
            }
        }
    }
}

impl core::fmt::Display for Strategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.write_tree(f, 0)
    }
}
