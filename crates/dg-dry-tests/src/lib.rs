// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for derivation graph crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`exec`] - Strategy execution assertions comparing graphs as sets
//! - [`graphs`] - Labelled placeholder graphs standing in for parsed molecules
//! - [`rules`] - Table-driven and no-op rules

pub mod config;
pub mod exec;
pub mod graphs;
pub mod rules;

pub use config::InMemoryConfigStore;
pub use exec::{assert_same_graphs, exe_strat, exe_strat_with};
pub use graphs::{labelled, labelled_as, Labelled};
pub use rules::{NoOpRule, TableRule};
