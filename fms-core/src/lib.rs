//! FMS Core - Core data structures and trait definitions
//!
//! This module defines the data model, the remote API contract and the ambient
//! infrastructure (errors, logging, configuration) shared by every FMS crate.

pub mod config;
pub mod error;
pub mod logging;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tracing;
