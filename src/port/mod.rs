//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!   inbound::runtime │  DeploymentRuntime-     │
//!   ───────────────▶ │  Service (application)  │
//!                    └───────────┬─────────────┘
//!          ┌─────────────────────┼─────────────────────┐
//!          ▼                     ▼                     ▼
//!   ┌─────────────┐       ┌─────────────┐       ┌─────────────┐
//!   │ Orchestrator│       │  Topology / │       │ TypeContext │
//!   │   Plugin    │       │  Deployment │       │  + Context  │
//!   │  (registry) │       │    stores   │       │   Builder   │
//!   └─────────────┘       └─────────────┘       └─────────────┘
//! ```

pub mod inbound;
pub mod outbound;
