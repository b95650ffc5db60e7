//! Session Management Module
//!
//! The client's belief about the current authenticated identity, and the
//! durable storage it is persisted to.

pub mod storage;
pub mod store;
pub mod types;

pub use storage::{FileStorage, LocalStorage, MemoryStorage, FEEDBACKS_KEY, USER_KEY};
pub use store::SessionStore;
pub use types::*;
