//! Infrastructure configuration modules.

pub mod logging;
pub mod orchestrator;
pub mod scaling;
pub mod settings;
