//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`plugin`] — Scripted [`OrchestratorPlugin`](crate::port::outbound::orchestrator::OrchestratorPlugin)
//!   recording every dispatch: `RecordingPlugin`.
//! - [`domain`] — Builders for nodes, topologies and locations.
//! - [`runtime`] — A fully wired runtime over in-memory adapters.

pub mod domain;
pub mod plugin;
pub mod runtime;
