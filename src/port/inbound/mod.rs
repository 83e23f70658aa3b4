//! Inbound (driving) ports consumed by the upper service/API layer.

pub mod runtime;
