// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vertex and edge handles, plus resolution of descriptor lists.
use crate::dg::DgError;
use crate::ident::DgId;

/// Resolved handle to a vertex slot of one DG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Vertex {
    dg: DgId,
    index: usize,
}

impl Vertex {
    pub(crate) fn new(dg: DgId, index: usize) -> Self {
        Self { dg, index }
    }

    /// The DG that issued this handle.
    #[must_use]
    pub fn dg_id(&self) -> DgId {
        self.dg
    }

    /// Slot index within the issuing DG (insertion order).
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Handle to a derivation hyperedge of one DG.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Edge {
    dg: DgId,
    index: usize,
}

impl Edge {
    pub(crate) fn new(dg: DgId, index: usize) -> Self {
        Self { dg, index }
    }

    /// The DG that issued this handle.
    #[must_use]
    pub fn dg_id(&self) -> DgId {
        self.dg
    }

    /// Slot index within the issuing DG (insertion order).
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A vertex reference that may be null.
///
/// `Null` is a value callers pass in ("no graph"); it is distinct from a
/// lookup that finds nothing, which is reported as `Ok(None)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum VertexDescriptor {
    /// Refers to no vertex.
    #[default]
    Null,
    /// Refers to a vertex of some DG.
    Resolved(Vertex),
}

impl VertexDescriptor {
    /// `true` for [`VertexDescriptor::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The referenced vertex, if any.
    #[must_use]
    pub fn vertex(&self) -> Option<Vertex> {
        match self {
            Self::Null => None,
            Self::Resolved(v) => Some(*v),
        }
    }
}

impl From<Vertex> for VertexDescriptor {
    fn from(v: Vertex) -> Self {
        Self::Resolved(v)
    }
}

impl From<Option<Vertex>> for VertexDescriptor {
    fn from(v: Option<Vertex>) -> Self {
        v.map_or(Self::Null, Self::Resolved)
    }
}

/// Which side of a hyperedge a descriptor list describes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Side {
    /// Educt side.
    Source,
    /// Product side.
    Target,
}

/// Rejects null descriptors, sources first, then targets.
pub(crate) fn check_not_null(
    sources: &[VertexDescriptor],
    targets: &[VertexDescriptor],
) -> Result<(), DgError> {
    if sources.iter().any(VertexDescriptor::is_null) {
        return Err(DgError::NullSource);
    }
    if targets.iter().any(VertexDescriptor::is_null) {
        return Err(DgError::NullTarget);
    }
    Ok(())
}

/// Maps non-null descriptors to sorted slot indices of `dg`.
///
/// Returns `None` when any descriptor belongs to another DG or points past
/// the `num_vertices` slots of this one.
pub(crate) fn resolve_multiset(
    dg: DgId,
    num_vertices: usize,
    descriptors: &[VertexDescriptor],
) -> Option<Vec<usize>> {
    let mut out = Vec::with_capacity(descriptors.len());
    for d in descriptors {
        let v = d.vertex()?;
        if v.dg != dg || v.index >= num_vertices {
            return None;
        }
        out.push(v.index);
    }
    out.sort_unstable();
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sources_are_reported_before_null_targets() {
        let null = [VertexDescriptor::Null];
        assert_eq!(check_not_null(&null, &null), Err(DgError::NullSource));
        assert_eq!(check_not_null(&[], &null), Err(DgError::NullTarget));
        assert_eq!(check_not_null(&null, &[]), Err(DgError::NullSource));
        assert_eq!(check_not_null(&[], &[]), Ok(()));
    }

    #[test]
    fn a_null_anywhere_fails_regardless_of_the_other_side() {
        let v: VertexDescriptor = Vertex::new(DgId(1), 0).into();
        let null = VertexDescriptor::Null;
        assert_eq!(check_not_null(&[null], &[v]), Err(DgError::NullSource));
        assert_eq!(check_not_null(&[v, null], &[v]), Err(DgError::NullSource));
        assert_eq!(check_not_null(&[v], &[null]), Err(DgError::NullTarget));
        assert_eq!(check_not_null(&[v], &[v, null]), Err(DgError::NullTarget));
        assert_eq!(check_not_null(&[v, v], &[v]), Ok(()));
    }

    #[test]
    fn foreign_and_dangling_vertices_do_not_resolve() {
        let here = DgId(1);
        let there = DgId(2);
        let own: VertexDescriptor = Vertex::new(here, 0).into();
        let foreign: VertexDescriptor = Vertex::new(there, 0).into();
        let dangling: VertexDescriptor = Vertex::new(here, 5).into();
        assert_eq!(resolve_multiset(here, 1, &[own, own]), Some(vec![0, 0]));
        assert_eq!(resolve_multiset(here, 1, &[foreign]), None);
        assert_eq!(resolve_multiset(here, 1, &[dangling]), None);
    }

    #[test]
    fn optional_vertices_convert_to_descriptors() {
        assert!(VertexDescriptor::from(None).is_null());
        let v = Vertex::new(DgId(3), 1);
        assert_eq!(VertexDescriptor::from(Some(v)).vertex(), Some(v));
        assert!(VertexDescriptor::default().is_null());
    }
}
