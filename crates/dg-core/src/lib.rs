// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! dg-core: derivation graph construction driven by composable strategies.
//!
//! A [`Dg`] starts out unbuilt. [`Dg::build`] hands out the single
//! [`Builder`] allowed to mutate it; once that builder is released the DG is
//! locked and stays queryable (read-only) for the rest of its lifetime.
//! Growth of the network is described with [`Strategy`] values which the
//! builder executes against the DG.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod builder;
/// Configuration values and the storage port used to persist them.
pub mod config;
mod descriptor;
mod dg;
mod diff;
mod exec;
mod graph;
mod ident;
mod printer;
mod rule;
mod strategy;

/// Exclusive write handle on a DG.
pub use builder::Builder;
/// Engine configuration (re-exported for convenience).
pub use config::DgConfig;
/// Vertex/edge handles and the nullable vertex descriptor.
pub use descriptor::{Edge, Side, Vertex, VertexDescriptor};
/// Derivation graph, lifecycle state and query errors.
pub use dg::{DerivationRecord, Dg, DgError, DgState, DgStats};
/// Structural comparison of two DGs.
pub use diff::{diff, DgDiff, DiffSide};
/// Strategy execution state and results.
pub use exec::{ExecuteResult, ExecuteSummary, GraphState};
/// External graph seam.
pub use graph::{Graph, GraphObject};
/// Identifier types.
pub use ident::{make_rule_id, DgId, GraphId, Hash, RuleId};
/// DG printing with a vertex visibility stack.
pub use printer::{Printer, PrinterError, VertexVisible, VisibilityGuard};
/// External rule seam.
pub use rule::{Derivation, Rule, RuleSet};
/// Strategy algebra.
pub use strategy::{GraphGenerator, GraphSource, Strategy, StrategyError};
