// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifier and hashing utilities.
use std::sync::atomic::{AtomicU64, Ordering};

use blake3::Hasher;

/// Canonical 256-bit hash used for rule identities.
pub type Hash = [u8; 32];

/// Process-unique identity of a wrapped graph object.
///
/// Assigned once when a [`crate::Graph`] handle is created; clones of the
/// handle share it. Two separately wrapped objects never compare equal, even
/// when they describe the same molecule.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct GraphId(pub u64);

/// Process-unique identity of a derivation graph instance.
///
/// Vertex and edge handles carry the id of the DG that issued them so a
/// handle from one DG is never mistaken for a slot of another.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DgId(pub u64);

/// Strongly typed identifier for a transformation rule.
///
/// Produced by [`make_rule_id`]; derivation edges record the ids of every
/// rule that produced them.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RuleId(pub Hash);

impl RuleId {
    /// Hex encoding of the first 8 bytes, for logs.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl core::fmt::Display for DgId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl core::fmt::Display for GraphId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Produces a stable, domain‑separated rule identifier (prefix `b"rule:"`) using BLAKE3.
pub fn make_rule_id(name: &str) -> RuleId {
    let mut hasher = Hasher::new();
    hasher.update(b"rule:");
    hasher.update(name.as_bytes());
    RuleId(hasher.finalize().into())
}

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_DG_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_graph_id() -> GraphId {
    GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
}

pub(crate) fn next_dg_id() -> DgId {
    DgId(NEXT_DG_ID.fetch_add(1, Ordering::Relaxed))
}
