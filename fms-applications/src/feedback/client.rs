//! Feedback Client - validated CRUD over the feedback API
//!
//! Every operation is a single round trip. Nothing is cached or retried and
//! a failure in one call has no effect on the others.

use super::form::FeedbackForm;
use crate::ApplicationResult;
use fms_core::{Feedback, FeedbackApi, User};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct FeedbackClient {
    api: Arc<dyn FeedbackApi>,
}

impl FeedbackClient {
    pub fn new(api: Arc<dyn FeedbackApi>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ApplicationResult<Vec<Feedback>> {
        let items = self.api.list_feedback().await?;
        debug!(count = items.len(), "Fetched feedback");
        Ok(items)
    }

    /// Validate `form` and create a record owned by `user`
    pub async fn create(&self, user: &User, form: &FeedbackForm) -> ApplicationResult<Feedback> {
        let draft = form.validate(user)?;
        let created = self.api.create_feedback(&draft).await?;
        debug!(id = %created.id, "Created feedback");
        Ok(created)
    }

    /// Validate `form` and replace record `id` with it
    pub async fn update(
        &self,
        id: &str,
        user: &User,
        form: &FeedbackForm,
    ) -> ApplicationResult<Feedback> {
        let draft = form.validate(user)?;
        let updated = self.api.update_feedback(id, &draft).await?;
        debug!(id = %updated.id, "Updated feedback");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> ApplicationResult<()> {
        self.api.delete_feedback(id).await?;
        debug!(id = %id, "Deleted feedback");
        Ok(())
    }
}
