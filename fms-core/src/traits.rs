//! Core trait definitions
//!
//! The remote feedback API, split by concern. `fms-api` provides the HTTP
//! implementation; tests substitute in-memory fakes.

use crate::error::FmsResult;
use crate::types::*;
use async_trait::async_trait;

/// Authentication endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /login`
    async fn login(&self, request: &LoginRequest) -> FmsResult<User>;

    /// `POST /signup`
    ///
    /// Returns `None` when the server acknowledged the signup without
    /// returning the created user record.
    async fn signup(&self, request: &SignupRequest) -> FmsResult<Option<User>>;
}

/// Feedback record endpoints
#[async_trait]
pub trait FeedbackApi: Send + Sync {
    /// `GET /customer-feedback`
    async fn list_feedback(&self) -> FmsResult<Vec<Feedback>>;

    /// `POST /`
    async fn create_feedback(&self, draft: &FeedbackDraft) -> FmsResult<Feedback>;

    /// `PUT /{id}`
    async fn update_feedback(&self, id: &str, draft: &FeedbackDraft) -> FmsResult<Feedback>;

    /// `DELETE /{id}`
    async fn delete_feedback(&self, id: &str) -> FmsResult<()>;
}
