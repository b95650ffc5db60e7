//! Authentication and Access Control Module
//!
//! - [`AuthGateway`]: login and signup round trips, settled into the session store
//! - [`check_access`] / [`guard_route`]: the role gate in front of each view

pub mod gateway;
pub mod guard;

pub use gateway::AuthGateway;
pub use guard::{check_access, guard_route, GuardDecision, Route};
