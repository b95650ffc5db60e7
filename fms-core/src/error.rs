//! Unified error handling system
//!
//! Provides structured error types with context, recovery suggestions, and proper error chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type FmsResult<T> = Result<T, FmsError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the FMS client
#[derive(Error, Debug)]
pub enum FmsError {
    /// The request never produced an HTTP response (connection refused, DNS, timeout)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    /// The server answered with a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        context: ErrorContext,
    },

    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl FmsError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            FmsError::Network { context, .. } => Some(context),
            FmsError::Api { context, .. } => Some(context),
            FmsError::Authentication { context, .. } => Some(context),
            FmsError::Validation { context, .. } => Some(context),
            FmsError::Storage { context, .. } => Some(context),
            FmsError::Config { context, .. } => Some(context),
            FmsError::NotFound { context, .. } => Some(context),
            FmsError::Internal { context, .. } => Some(context),
            FmsError::Io(_) | FmsError::Serialization(_) => None,
        }
    }

    /// Whether this error came from a remote call
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            FmsError::Network { .. } | FmsError::Api { .. } | FmsError::Authentication { .. }
        )
    }

    /// Short, user-facing text for notifications
    pub fn user_message(&self) -> String {
        match self {
            FmsError::Network { .. } => {
                "Could not reach the feedback server. Check your connection.".to_string()
            }
            FmsError::Api { status, .. } => match status {
                401 | 403 => "You are not allowed to do that.".to_string(),
                404 => "The requested item no longer exists.".to_string(),
                _ => format!("The feedback server rejected the request (HTTP {}).", status),
            },
            FmsError::Authentication { message, .. } => message.clone(),
            FmsError::Validation { message, .. } => message.clone(),
            FmsError::NotFound { resource, .. } => format!("Not found: {}", resource),
            other => other.to_string(),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            FmsError::Internal { .. } | FmsError::Storage { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Internal or storage error occurred"
                );
            }
            FmsError::Config { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Configuration error"
                );
            }
            FmsError::Network { .. } | FmsError::Api { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Remote call failed"
                );
            }
            FmsError::Validation { .. } | FmsError::Authentication { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Request rejected"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::FmsError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Run 'fms config --init' to create default config"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::FmsError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}

#[macro_export]
macro_rules! storage_error {
    ($msg:expr, $component:expr) => {
        $crate::FmsError::Storage {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        $crate::FmsError::Storage {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check that the data directory exists and is writable"),
        }
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($resource:expr, $component:expr) => {
        $crate::FmsError::NotFound {
            resource: $resource.to_string(),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_attach_context() {
        let err = validation_error!("Please select a rating", "rating", "feedback_form");
        match &err {
            FmsError::Validation { field, context, .. } => {
                assert_eq!(field.as_deref(), Some("rating"));
                assert_eq!(context.component, "feedback_form");
                assert!(!context.error_id.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.user_message(), "Please select a rating");
    }

    #[test]
    fn remote_errors_are_flagged() {
        let api = FmsError::Api {
            status: 500,
            message: "boom".to_string(),
            context: ErrorContext::new("test"),
        };
        assert!(api.is_remote());
        assert!(api.user_message().contains("500"));

        let cfg = config_error!("bad", "test");
        assert!(!cfg.is_remote());
        assert!(cfg.context().is_some());
    }
}
