//! Application services.
//!
//! - [`runtime`]: lifecycle operations on running deployments

pub mod runtime;
