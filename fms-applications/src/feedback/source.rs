//! Where the admin dashboard reads feedback from

use super::client::FeedbackClient;
use crate::session::{LocalStorage, FEEDBACKS_KEY};
use crate::{ApplicationError, ApplicationResult};
use async_trait::async_trait;
use fms_core::{Feedback, FeedbackSourceKind};
use std::sync::Arc;
use tracing::{debug, warn};

/// A full feedback list that records can be removed from
#[async_trait]
pub trait FeedbackSource: Send + Sync {
    async fn load(&self) -> ApplicationResult<Vec<Feedback>>;

    async fn remove(&self, id: &str) -> ApplicationResult<()>;

    fn kind(&self) -> FeedbackSourceKind;
}

#[async_trait]
impl FeedbackSource for FeedbackClient {
    async fn load(&self) -> ApplicationResult<Vec<Feedback>> {
        self.list().await
    }

    async fn remove(&self, id: &str) -> ApplicationResult<()> {
        self.delete(id).await
    }

    fn kind(&self) -> FeedbackSourceKind {
        FeedbackSourceKind::Api
    }
}

/// Feedback list kept in local storage under [`FEEDBACKS_KEY`].
///
/// Absent or unreadable data reads as an empty list.
pub struct LocalFeedbackCache {
    storage: Arc<dyn LocalStorage>,
}

impl LocalFeedbackCache {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    fn read(&self) -> Vec<Feedback> {
        let raw = match self.storage.get_item(FEEDBACKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Could not read cached feedback");
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring corrupt cached feedback");
            Vec::new()
        })
    }

    /// Replace the cached list
    pub fn save(&self, items: &[Feedback]) -> ApplicationResult<()> {
        let raw = serde_json::to_string(items)?;
        self.storage.set_item(FEEDBACKS_KEY, &raw)?;
        debug!(count = items.len(), "Cached feedback");
        Ok(())
    }
}

#[async_trait]
impl FeedbackSource for LocalFeedbackCache {
    async fn load(&self) -> ApplicationResult<Vec<Feedback>> {
        Ok(self.read())
    }

    async fn remove(&self, id: &str) -> ApplicationResult<()> {
        let mut items = self.read();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(ApplicationError::not_found(format!("feedback {}", id)));
        }
        self.save(&items)
    }

    fn kind(&self) -> FeedbackSourceKind {
        FeedbackSourceKind::LocalCache
    }
}
