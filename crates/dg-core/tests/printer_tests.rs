// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use std::sync::Arc;

use dg_core::{Dg, Graph, Printer, PrinterError, Strategy, VertexVisible};
use dg_dry_tests::{exe_strat, labelled, TableRule};

/// Two inputs, condensed then rearranged: `A + B -> C`, `C -> D`.
fn grammar() -> (Dg, Vec<Graph>) {
    let (a, b, c, d) = (labelled("A"), labelled("B"), labelled("C"), labelled("D"));
    let inputs = vec![a.clone(), b.clone()];
    let condense = TableRule::new("condense").derive(&[&a, &b], &[&c]);
    let rearrange = TableRule::new("rearrange").derive(&[&c], &[&d]);
    let s = Strategy::add_subset(inputs.clone())
        .then(Strategy::rule(Arc::new(condense)))
        .then(Strategy::rule(Arc::new(rearrange)));
    let (dg, _) = exe_strat(&s, &[d.clone()], &[a, b, c, d]);
    (dg, inputs)
}

fn header(dg: &Dg, shown: usize) -> String {
    format!("dg {} [Locked]: {shown}/4 vertices visible, 2 edges\n", dg.id())
}

#[test]
fn const_false_hides_everything() {
    let (dg, _) = grammar();
    let mut printer = Printer::new();
    printer.push_vertex_visible(false);
    assert_eq!(printer.print(&dg).unwrap(), header(&dg, 0));
    printer.pop_vertex_visible().unwrap();
}

#[test]
fn const_true_shows_everything() {
    let (dg, _) = grammar();
    let mut printer = Printer::new();
    printer.push_vertex_visible(true);
    let expected = format!(
        "{}v0 A\nv1 B\nv2 C\nv3 D\ne0: v0 + v1 -> v2 [condense]\ne1: v2 -> v3 [rearrange]\n",
        header(&dg, 4)
    );
    assert_eq!(printer.print(&dg).unwrap(), expected);
    printer.pop_vertex_visible().unwrap();
    // An empty stack shows everything too.
    assert_eq!(printer.print(&dg).unwrap(), expected);
}

#[test]
fn predicate_hides_inputs_and_their_edges() {
    let (dg, inputs) = grammar();
    let mut printer = Printer::new();
    printer.push_vertex_visible(VertexVisible::func(move |g, _| inputs.iter().all(|a| g != a)));
    let expected = format!("{}v2 C\nv3 D\ne1: v2 -> v3 [rearrange]\n", header(&dg, 2));
    assert_eq!(printer.print(&dg).unwrap(), expected);
    printer.pop_vertex_visible().unwrap();
}

#[test]
fn predicate_can_consult_the_dg() {
    let (dg, _) = grammar();
    let products_only = VertexVisible::func(|g, dg| dg.products().is_ok_and(|ps| ps.contains(g)));
    let mut printer = Printer::new();
    let guard = printer.scoped_vertex_visible(products_only);
    let text = guard.print(&dg).unwrap();
    assert!(text.starts_with(&header(&dg, 2)));
    assert!(text.contains("v2 C\n"));
    assert!(!text.contains("v0 A\n"));
    drop(guard);
    assert_eq!(printer.visibility_depth(), 0);
}

#[test]
fn unbalanced_pop_is_reported() {
    let mut printer = Printer::new();
    printer.push_vertex_visible(true);
    printer.pop_vertex_visible().unwrap();
    let err = printer.pop_vertex_visible().unwrap_err();
    assert_eq!(err, PrinterError::StackUnderflow);
    assert_eq!(
        err.to_string(),
        "Can not pop from an empty vertex visibility stack."
    );
}
