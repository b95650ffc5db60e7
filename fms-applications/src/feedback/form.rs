//! Feedback form input and its validation

use fms_core::{validation_error, Feedback, FeedbackDraft, FmsResult, Service, User};

const COMPONENT: &str = "feedback_form";

/// Unvalidated form state. A rating of 0 means "not selected".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    pub rating: u8,
    pub comment: String,
    pub service: Option<Service>,
}

impl FeedbackForm {
    pub fn new(rating: u8, comment: impl Into<String>, service: Option<Service>) -> Self {
        Self {
            rating,
            comment: comment.into(),
            service,
        }
    }

    /// Prefill from an existing record, for editing
    pub fn from_feedback(feedback: &Feedback) -> Self {
        Self {
            rating: feedback.rating,
            comment: feedback.comment.clone(),
            service: Some(feedback.service),
        }
    }

    /// Check the form and build the request body on behalf of `user`
    pub fn validate(&self, user: &User) -> FmsResult<FeedbackDraft> {
        if self.rating == 0 {
            return Err(validation_error!("Please select a rating", "rating", COMPONENT));
        }
        if self.rating > 5 {
            return Err(validation_error!(
                format!("Rating must be between 1 and 5, got {}", self.rating),
                "rating",
                COMPONENT
            ));
        }

        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err(validation_error!("Please enter a comment", "comment", COMPONENT));
        }

        let service = self
            .service
            .ok_or_else(|| validation_error!("Please select a service", "service", COMPONENT))?;

        Ok(FeedbackDraft {
            rating: self.rating,
            comment: comment.to_string(),
            service,
            user_id: user.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fms_core::{FmsError, Role};

    fn user() -> User {
        User {
            id: "42".to_string(),
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            role: Role::Customer,
        }
    }

    fn rejected_field(form: FeedbackForm) -> String {
        match form.validate(&user()) {
            Err(FmsError::Validation { field, .. }) => field.unwrap_or_default(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn valid_form_becomes_a_draft_for_the_user() {
        let form = FeedbackForm::new(4, "  quick delivery ", Some(Service::Swiggy));
        let draft = form.validate(&user()).unwrap();

        assert_eq!(draft.rating, 4);
        assert_eq!(draft.comment, "quick delivery");
        assert_eq!(draft.service, Service::Swiggy);
        assert_eq!(draft.user_id, "42");
    }

    #[test]
    fn each_rule_names_its_field() {
        assert_eq!(
            rejected_field(FeedbackForm::new(0, "ok", Some(Service::Hdfc))),
            "rating"
        );
        assert_eq!(
            rejected_field(FeedbackForm::new(6, "ok", Some(Service::Hdfc))),
            "rating"
        );
        assert_eq!(
            rejected_field(FeedbackForm::new(3, "   ", Some(Service::Hdfc))),
            "comment"
        );
        assert_eq!(rejected_field(FeedbackForm::new(3, "ok", None)), "service");
    }

    #[test]
    fn rating_message_matches_the_form_prompt() {
        let err = FeedbackForm::default().validate(&user()).unwrap_err();
        assert_eq!(err.user_message(), "Please select a rating");
    }
}
