// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Labelled placeholder graphs.
//!
//! Tests need graph identities, not chemistry. A [`Labelled`] object keeps
//! the notation it was "parsed" from and an optional display name.

use dg_core::{Graph, GraphObject};

/// Placeholder graph object: a notation string plus a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labelled {
    /// Notation the graph stands for (e.g. `"O"`).
    pub notation: String,
    /// Name reported to printers and logs.
    pub name: String,
}

impl GraphObject for Labelled {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Wraps a fresh placeholder graph named after its notation.
///
/// # Example
///
/// ```
/// use dg_dry_tests::labelled;
///
/// let water = labelled("O");
/// assert_eq!(water.name(), "O");
/// assert_ne!(water, labelled("O"));
/// ```
pub fn labelled(notation: &str) -> Graph {
    labelled_as(notation, notation)
}

/// Wraps a fresh placeholder graph with an explicit display name.
pub fn labelled_as(notation: &str, name: &str) -> Graph {
    Graph::new(Labelled {
        notation: notation.to_owned(),
        name: name.to_owned(),
    })
}
