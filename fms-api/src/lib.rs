//! FMS API - HTTP access to the remote feedback service
//!
//! Implements the `AuthApi` and `FeedbackApi` contracts from `fms-core` over `reqwest`.

pub mod api;

pub use api::*;
