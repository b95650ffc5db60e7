//! Customer view - the signed-in customer's feedback list and form

use super::client::FeedbackClient;
use super::form::FeedbackForm;
use super::notice::Notice;
use crate::{ApplicationError, ApplicationResult};
use fms_core::{Feedback, User};
use tracing::debug;

/// What a successful submit did
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(Feedback),
    Updated(Feedback),
}

impl SubmitOutcome {
    pub fn feedback(&self) -> &Feedback {
        match self {
            SubmitOutcome::Created(feedback) | SubmitOutcome::Updated(feedback) => feedback,
        }
    }
}

/// Local list and form state for one customer.
///
/// The list is fetched once by [`CustomerView::mount`] and afterwards only
/// changes through this view's own successful operations. A failed
/// operation leaves both list and form as they were.
pub struct CustomerView {
    client: FeedbackClient,
    user: User,
    items: Vec<Feedback>,
    form: FeedbackForm,
    editing: Option<String>,
    mounted: bool,
    notice: Option<Notice>,
}

impl CustomerView {
    pub fn new(client: FeedbackClient, user: User) -> Self {
        Self {
            client,
            user,
            items: Vec::new(),
            form: FeedbackForm::default(),
            editing: None,
            mounted: false,
            notice: None,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn items(&self) -> &[Feedback] {
        &self.items
    }

    pub fn form(&self) -> &FeedbackForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FeedbackForm {
        &mut self.form
    }

    pub fn set_form(&mut self, form: FeedbackForm) {
        self.form = form;
    }

    /// Id of the record the form is editing, if any
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Notification left by the last operation
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Fetch the list. Only the first call contacts the server.
    pub async fn mount(&mut self) -> ApplicationResult<()> {
        if self.mounted {
            return Ok(());
        }
        self.mounted = true;

        let result = self.client.list().await;
        self.notice = Some(Notice::for_result(
            &result,
            "Feedback loaded",
            "Failed to load feedbacks",
        ));
        self.items = result?;
        Ok(())
    }

    /// Load record `id` into the form; the next submit updates it
    pub fn begin_edit(&mut self, id: &str) -> ApplicationResult<()> {
        let feedback = self
            .items
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| ApplicationError::not_found(format!("feedback {}", id)))?;

        debug!(id = %id, "Editing feedback");
        self.form = FeedbackForm::from_feedback(feedback);
        self.editing = Some(id.to_string());
        Ok(())
    }

    /// Empty the form and leave edit mode
    pub fn reset_form(&mut self) {
        self.form = FeedbackForm::default();
        self.editing = None;
    }

    /// Create a record from the form, or update the one being edited
    pub async fn submit(&mut self) -> ApplicationResult<SubmitOutcome> {
        let result = match self.editing.clone() {
            Some(id) => self
                .client
                .update(&id, &self.user, &self.form)
                .await
                .map(SubmitOutcome::Updated),
            None => self
                .client
                .create(&self.user, &self.form)
                .await
                .map(SubmitOutcome::Created),
        };

        let success = match &result {
            Ok(SubmitOutcome::Updated(_)) => "Feedback updated successfully!",
            _ => "Feedback submitted successfully!",
        };
        self.notice = Some(Notice::for_result(&result, success, "Failed to save feedback"));

        let outcome = result?;
        match &outcome {
            SubmitOutcome::Created(created) => self.items.push(created.clone()),
            SubmitOutcome::Updated(updated) => {
                let target = self.editing.as_deref().unwrap_or(&updated.id);
                if let Some(slot) = self.items.iter_mut().find(|item| item.id == target) {
                    *slot = updated.clone();
                }
            }
        }
        self.reset_form();
        Ok(outcome)
    }

    pub async fn delete(&mut self, id: &str) -> ApplicationResult<()> {
        let result = self.client.delete(id).await;
        self.notice = Some(Notice::for_result(
            &result,
            "Feedback deleted successfully!",
            "Failed to delete feedback",
        ));
        result?;

        self.items.retain(|item| item.id != id);
        if self.editing.as_deref() == Some(id) {
            self.reset_form();
        }
        Ok(())
    }
}
