//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the collaborators the runtime depends on:
//! orchestrator plugins, storage, location lookup and type resolution.

pub mod context;
pub mod orchestrator;
pub mod store;
