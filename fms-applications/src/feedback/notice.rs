//! Transient user-facing notifications

use crate::{ApplicationError, ApplicationResult};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A one-line message shown after an operation settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    /// Summarise `result`. Validation problems are shown as-is; other
    /// failures use the generic `failure` text and are logged.
    pub fn for_result<T>(result: &ApplicationResult<T>, success: &str, failure: &str) -> Self {
        match result {
            Ok(_) => Self::success(success),
            Err(e) => Self::from_error(e, failure),
        }
    }

    fn from_error(error: &ApplicationError, failure: &str) -> Self {
        if error.is_validation() {
            Self::error(error.user_message())
        } else {
            error.log();
            Self::error(failure)
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fms_core::{validation_error, ErrorContext, FmsError};

    #[test]
    fn validation_failures_keep_their_message() {
        let result: ApplicationResult<()> =
            Err(validation_error!("Please select a rating", "rating", "test").into());
        let notice = Notice::for_result(&result, "saved", "Failed to save feedback");

        assert!(notice.is_error());
        assert_eq!(notice.message, "Please select a rating");
    }

    #[test]
    fn remote_failures_use_the_generic_text() {
        let result: ApplicationResult<()> = Err(FmsError::Api {
            status: 500,
            message: "boom".to_string(),
            context: ErrorContext::new("test"),
        }
        .into());
        let notice = Notice::for_result(&result, "saved", "Failed to save feedback");

        assert_eq!(notice, Notice::error("Failed to save feedback"));
        assert_eq!(
            Notice::for_result(&Ok::<_, ApplicationError>(()), "saved", "x"),
            Notice::success("saved")
        );
    }
}
