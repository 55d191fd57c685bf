// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Opaque graph handles supplied by the surrounding application.
use std::sync::Arc;

use crate::ident::{next_graph_id, GraphId};

/// A graph object owned by an external registry (for example a parsed
/// molecule).
///
/// The derivation graph never inspects the structure; it only needs a name
/// for printing and logs.
pub trait GraphObject: core::fmt::Debug + Send + Sync {
    /// Human-readable name used by printers and logs.
    fn name(&self) -> &str;
}

/// Shared, immutable handle to a [`GraphObject`] with identity semantics.
///
/// Equality, hashing and ordering use the [`GraphId`] assigned when the
/// object was wrapped, so clones of a handle are equal while two handles
/// wrapping equal-looking objects are not.
#[derive(Clone)]
pub struct Graph {
    id: GraphId,
    object: Arc<dyn GraphObject>,
}

impl Graph {
    /// Wraps `object`, assigning it a fresh identity.
    pub fn new<G>(object: G) -> Self
    where
        G: GraphObject + 'static,
    {
        Self::from_arc(Arc::new(object))
    }

    /// Wraps an already shared object, assigning it a fresh identity.
    pub fn from_arc(object: Arc<dyn GraphObject>) -> Self {
        Self {
            id: next_graph_id(),
            object,
        }
    }

    /// Identity of this graph.
    #[must_use]
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Name reported by the wrapped object.
    #[must_use]
    pub fn name(&self) -> &str {
        self.object.name()
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Graph {}

impl core::hash::Hash for Graph {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Graph {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Graph {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl core::fmt::Debug for Graph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Graph")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}

impl core::fmt::Display for Graph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug)]
    pub(crate) struct Named(pub(crate) &'static str);

    impl GraphObject for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    pub(crate) fn named(label: &'static str) -> Graph {
        Graph::new(Named(label))
    }

    #[test]
    fn clones_share_identity() {
        let g = named("O");
        let h = g.clone();
        assert_eq!(g, h);
        assert_eq!(g.id(), h.id());
        assert_eq!(h.name(), "O");
    }

    #[test]
    fn separately_wrapped_objects_differ() {
        let a = named("O");
        let b = named("O");
        assert_ne!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }
}
