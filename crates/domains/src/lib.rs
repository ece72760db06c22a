//! The central domain logic and interface definitions for StackIt.
//!
//! Everything here is storage- and transport-agnostic: entity models, the
//! pure voting/acceptance/reputation rules, the port traits adapters must
//! implement, and the error taxonomy shared across the workspace.

pub mod error;
pub mod models;
pub mod ports;
pub mod votes;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use ports::*;
pub use votes::*;
