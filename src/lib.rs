//! Deploy Runtime - runtime control of deployed application topologies.
//!
//! This crate drives the *active* deployment of an application environment
//! through a pluggable orchestrator backend: custom operations, maintenance
//! mode toggles, and scaling with an optimistic topology write that is rolled
//! back when the orchestrator reports failure.
//!
//! # Architecture
//!
//! - **`domain`** - Storage-agnostic types: deployments, topologies, locations
//! - **`port`** - Inbound runtime trait and outbound collaborator traits
//! - **`application::runtime`** - `DeploymentRuntimeService`, the orchestration core
//! - **`adapter`** - In-memory store, plugin registry, context builder
//! - **`infrastructure`** - TOML configuration, logging and wiring
//!
//! # Modules
//!
//! - [`domain`] - Identifiers, topology model, execution contexts
//! - [`error`] - Error types and platform error codes
//! - [`port`] - Trait seams between the core and its collaborators
//! - [`application`] - Runtime operations
//! - [`adapter`] - Concrete collaborator implementations
//! - [`infrastructure`] - Configuration and bootstrap
//!
//! # Features
//!
//! - `testkit` - Recording orchestrator plugin and fixtures for integration tests
//!
//! # Example
//!
//! ```no_run
//! use deploy_runtime::domain::EnvironmentId;
//! use deploy_runtime::infrastructure::bootstrap::build_default_runtime;
//! use deploy_runtime::infrastructure::config::settings::Config;
//! use deploy_runtime::port::outbound::orchestrator::PaasCallback;
//!
//! let config = Config::default();
//! let (runtime, _store, _plugins) = build_default_runtime(&config);
//! let (callback, _outcome) = PaasCallback::channel();
//! let _ = runtime.scale(None, &EnvironmentId::new("env-1"), "web", 2, callback);
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
