//! Crate-level tests that drive the whole simulation.
//!
//! # Test Structure
//!
//! - `scenarios.rs`: End-to-end lock and dash scenarios through `Simulation`
//! - `determinism.rs`: Identical inputs produce identical runs
//! - `properties.rs`: Property tests for the lock resolver and controller
//! - `helpers.rs`: Test setup utilities and factory functions

mod helpers;
mod properties;

pub use helpers::*;
