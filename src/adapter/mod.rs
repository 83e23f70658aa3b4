//! Adapters implementing the ports.

pub mod outbound;
