// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Strategy execution assertions.
//!
//! Execution results are compared as unordered sets of graphs; the order in
//! which a strategy discovers graphs is not part of its contract.

use std::collections::BTreeSet;

use dg_core::{Dg, ExecuteResult, Graph, Strategy};

/// Asserts that `actual` and `expected` hold the same graphs, ignoring order
/// and repeats.
///
/// # Panics
/// When the sets differ; the message names both sides.
pub fn assert_same_graphs(what: &str, actual: &[Graph], expected: &[Graph]) {
    let a: BTreeSet<&Graph> = actual.iter().collect();
    let e: BTreeSet<&Graph> = expected.iter().collect();
    assert!(
        a == e,
        "{what} mismatch: got {:?}, expected {:?}",
        names(actual),
        names(expected)
    );
}

fn names(gs: &[Graph]) -> Vec<&str> {
    gs.iter().map(Graph::name).collect()
}

/// Executes `strategy` on a fresh DG and checks the final subset and
/// universe. Returns the locked DG and the result for further checks.
///
/// # Panics
/// When the result differs from the expectation.
pub fn exe_strat(strategy: &Strategy, subset: &[Graph], universe: &[Graph]) -> (Dg, ExecuteResult) {
    exe_strat_with(Dg::new(), strategy, subset, universe)
}

/// Like [`exe_strat`], on a caller-prepared (unbuilt) DG.
///
/// # Panics
/// When the DG cannot be built or the result differs from the expectation.
#[allow(clippy::panic)]
pub fn exe_strat_with(
    mut dg: Dg,
    strategy: &Strategy,
    subset: &[Graph],
    universe: &[Graph],
) -> (Dg, ExecuteResult) {
    let result = match dg.with_builder(|b| b.execute(strategy)) {
        Ok(result) => result,
        Err(err) => panic!("could not build DG: {err}"),
    };
    assert_same_graphs("subset", result.subset(), subset);
    assert_same_graphs("universe", result.universe(), universe);
    (dg, result)
}
