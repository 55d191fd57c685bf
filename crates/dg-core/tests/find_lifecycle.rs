// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use dg_core::{Derivation, Dg, DgError, DgState, Graph, Side, Vertex, VertexDescriptor};
use dg_dry_tests::labelled;

const NULL: VertexDescriptor = VertexDescriptor::Null;

fn vd(v: Vertex) -> VertexDescriptor {
    VertexDescriptor::from(v)
}

fn expect_err<T: std::fmt::Debug>(res: Result<T, DgError>, want: DgError, msg: &str) {
    match res {
        Err(err) if err == want => assert_eq!(err.to_string(), msg),
        other => panic!("expected {want:?}, got {other:?}"),
    }
}

/// Lookups available on both an active and a locked DG.
fn check_queryable(dg: &Dg) {
    let g = labelled("O");
    assert_eq!(dg.find_vertex(&g).unwrap(), None);
    expect_err(
        dg.find_edge(&[NULL], &[]),
        DgError::NullSource,
        "Source vertex descriptor is null.",
    );
    expect_err(
        dg.find_edge(&[], &[NULL]),
        DgError::NullTarget,
        "Target vertex descriptor is null.",
    );
    expect_err(
        dg.find_edge_by_graphs(&[g.clone()], &[]),
        DgError::NullSource,
        "Source vertex descriptor is null.",
    );
    expect_err(
        dg.find_edge_by_graphs(&[], &[g]),
        DgError::NullTarget,
        "Target vertex descriptor is null.",
    );
}

#[test]
fn unbuilt_dg_rejects_queries() {
    let dg = Dg::new();
    let g = labelled("O");
    let msg = "The DG neither has an active builder nor is locked yet.";
    assert_eq!(dg.state(), DgState::Unbuilt);
    expect_err(dg.find_vertex(&g), DgError::NotQueryable, msg);
    expect_err(dg.find_edge(&[NULL], &[NULL]), DgError::NotQueryable, msg);
    expect_err(dg.find_edge_by_graphs(&[g.clone()], &[g]), DgError::NotQueryable, msg);
    expect_err(dg.num_vertices(), DgError::NotQueryable, msg);
    expect_err(dg.stats(), DgError::NotQueryable, msg);
}

#[test]
fn find_behaves_the_same_while_building_and_once_locked() {
    let mut dg = Dg::new();
    let b = dg.build().unwrap();
    assert!(b.dg().has_active_builder());
    check_queryable(b.dg());
    drop(b);
    assert!(dg.is_locked());
    assert!(!dg.has_active_builder());
    check_queryable(&dg);
}

/// Nulls mixed with member descriptors, on either side.
fn check_nulls_beside_members(dg: &Dg, a: &Graph, c: &Graph) {
    let va = vd(dg.find_vertex(a).unwrap().expect("a is a member"));
    let vc = vd(dg.find_vertex(c).unwrap().expect("c is a member"));
    assert!(dg.find_edge(&[va], &[vc]).unwrap().is_some());

    let source = "Source vertex descriptor is null.";
    let target = "Target vertex descriptor is null.";
    expect_err(dg.find_edge(&[NULL], &[vc]), DgError::NullSource, source);
    expect_err(dg.find_edge(&[va, NULL], &[vc]), DgError::NullSource, source);
    expect_err(dg.find_edge(&[NULL, va], &[vc, NULL]), DgError::NullSource, source);
    expect_err(dg.find_edge(&[va], &[NULL]), DgError::NullTarget, target);
    expect_err(dg.find_edge(&[va], &[vc, NULL]), DgError::NullTarget, target);
}

#[test]
fn null_descriptors_fail_next_to_valid_ones() {
    let (a, c) = (labelled("A"), labelled("C"));
    let mut dg = Dg::new();
    let mut b = dg.build().unwrap();
    b.add_derivation(&Derivation::new([a.clone()], [c.clone()]), None).unwrap();
    check_nulls_beside_members(b.dg(), &a, &c);
    b.release();
    assert!(dg.is_locked());
    check_nulls_beside_members(&dg, &a, &c);
}

#[test]
fn null_sources_are_reported_before_null_targets() {
    let mut dg = Dg::new();
    dg.with_builder(|_| ()).unwrap();
    let err = dg.find_edge(&[NULL], &[NULL]).unwrap_err();
    assert_eq!(err, DgError::NullSource);
    assert_eq!(err.null_side(), Some(Side::Source));
    assert_eq!(DgError::NullTarget.null_side(), Some(Side::Target));
    assert_eq!(DgError::Locked.null_side(), None);
}

#[test]
fn locked_dg_cannot_be_built_again() {
    let mut dg = Dg::new();
    dg.build().unwrap().release();
    expect_err(dg.build(), DgError::Locked, "The DG is locked.");
    expect_err(dg.with_builder(|_| ()), DgError::Locked, "The DG is locked.");
}

#[test]
fn edges_are_found_by_multiset_in_any_order() {
    let (a, b, c) = (labelled("A"), labelled("B"), labelled("C"));
    let mut dg = Dg::new();
    let edge = dg
        .with_builder(|bld| {
            let d = Derivation::new([a.clone(), a.clone(), b.clone()], [c.clone()]);
            bld.add_derivation(&d, None)
        })
        .unwrap()
        .unwrap();

    let va = dg.find_vertex(&a).unwrap().unwrap();
    let vb = dg.find_vertex(&b).unwrap().unwrap();
    let vc = dg.find_vertex(&c).unwrap().unwrap();
    let reordered = [vd(va), vd(vb), vd(va)];
    assert_eq!(dg.find_edge(&reordered, &[vd(vc)]).unwrap(), Some(edge));
    assert_eq!(
        dg.find_edge_by_graphs(&[b.clone(), a.clone(), a.clone()], &[c.clone()])
            .unwrap(),
        Some(edge)
    );
    // Multiplicity matters.
    assert_eq!(dg.find_edge(&[vd(va), vd(vb)], &[vd(vc)]).unwrap(), None);
    // Direction matters.
    assert_eq!(dg.find_edge(&[vd(vc)], &[vd(va)]).unwrap(), None);
}

#[test]
fn descriptors_from_another_dg_never_match() {
    let g = labelled("O");
    let h = labelled("C");
    let d = Derivation::new([g.clone()], [h.clone()]);

    let mut first = Dg::new();
    first
        .with_builder(|b| b.add_derivation(&d, None))
        .unwrap()
        .unwrap();
    let mut second = Dg::new();
    second
        .with_builder(|b| b.add_derivation(&d, None))
        .unwrap()
        .unwrap();

    let vg = first.find_vertex(&g).unwrap().unwrap();
    let vh = first.find_vertex(&h).unwrap().unwrap();
    assert!(first.find_edge(&[vd(vg)], &[vd(vh)]).unwrap().is_some());
    assert_eq!(second.find_edge(&[vd(vg)], &[vd(vh)]).unwrap(), None);
    assert_eq!(second.graph_of(vg).unwrap(), None);
}

#[test]
fn enumeration_follows_insertion_order() {
    let (o, c, n) = (labelled("O"), labelled("C"), labelled("N"));
    let mut dg = Dg::new();
    dg.with_builder(|b| {
        for g in [&o, &c, &n, &o] {
            b.add_graph(g);
        }
    })
    .unwrap();
    assert_eq!(dg.num_vertices().unwrap(), 3);
    let names: Vec<&str> = dg.vertices().unwrap().map(|(_, g)| g.name()).collect();
    assert_eq!(names, ["O", "C", "N"]);
    assert_eq!(dg.graph_database().unwrap(), [o, c, n]);
    assert_eq!(dg.num_edges().unwrap(), 0);
    assert!(dg.products().unwrap().is_empty());
}
