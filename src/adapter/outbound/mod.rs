//! Outbound adapters (driven side).

pub mod context;
pub mod memory;
pub mod registry;
