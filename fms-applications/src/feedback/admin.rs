//! Admin dashboard - every customer's feedback, filters and summary counts

use super::notice::Notice;
use super::source::FeedbackSource;
use crate::ApplicationResult;
use fms_core::{Feedback, FeedbackSourceKind, Service};
use std::sync::Arc;
use tracing::debug;

/// Exact-match filters, combined with AND. `None` matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackFilter {
    pub rating: Option<u8>,
    pub service: Option<Service>,
}

impl FeedbackFilter {
    pub fn matches(&self, feedback: &Feedback) -> bool {
        self.rating.is_none_or(|rating| feedback.rating == rating)
            && self.service.is_none_or(|service| feedback.service == service)
    }

    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.service.is_none()
    }
}

/// Summary counts over an unfiltered list
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackAnalytics {
    pub total: usize,
    /// Mean rating, 0 when there is no feedback
    pub average_rating: f64,
    /// Count per service, in order of first appearance
    pub per_service: Vec<(Service, usize)>,
    /// Count per star, index 0 is one star
    pub per_rating: [usize; 5],
    pub unique_services: usize,
    /// Ratings of 4 or 5
    pub positive_reviews: usize,
}

impl FeedbackAnalytics {
    pub fn compute(items: &[Feedback]) -> Self {
        let total = items.len();
        let average_rating = if total == 0 {
            0.0
        } else {
            items.iter().map(|f| f64::from(f.rating)).sum::<f64>() / total as f64
        };

        let mut per_service: Vec<(Service, usize)> = Vec::new();
        let mut per_rating = [0usize; 5];
        for item in items {
            match per_service.iter_mut().find(|(s, _)| *s == item.service) {
                Some((_, count)) => *count += 1,
                None => per_service.push((item.service, 1)),
            }
            if (1..=5).contains(&item.rating) {
                per_rating[usize::from(item.rating) - 1] += 1;
            }
        }

        Self {
            total,
            average_rating,
            unique_services: per_service.len(),
            per_service,
            per_rating,
            positive_reviews: items.iter().filter(|f| f.rating >= 4).count(),
        }
    }

    /// Count of `stars`-star reviews (1 to 5)
    pub fn rating_count(&self, stars: u8) -> usize {
        match stars {
            1..=5 => self.per_rating[usize::from(stars) - 1],
            _ => 0,
        }
    }
}

/// The full list from a [`FeedbackSource`] with filters applied on demand
pub struct AdminView {
    source: Arc<dyn FeedbackSource>,
    items: Vec<Feedback>,
    filter: FeedbackFilter,
    notice: Option<Notice>,
}

impl AdminView {
    pub fn new(source: Arc<dyn FeedbackSource>) -> Self {
        Self {
            source,
            items: Vec::new(),
            filter: FeedbackFilter::default(),
            notice: None,
        }
    }

    pub fn source_kind(&self) -> FeedbackSourceKind {
        self.source.kind()
    }

    /// Replace the list with the source's current contents
    pub async fn load(&mut self) -> ApplicationResult<()> {
        let result = self.source.load().await;
        self.notice = Some(Notice::for_result(
            &result,
            "Feedback loaded",
            "Failed to load feedbacks",
        ));
        self.items = result?;
        debug!(count = self.items.len(), source = ?self.source.kind(), "Loaded dashboard");
        Ok(())
    }

    pub fn all(&self) -> &[Feedback] {
        &self.items
    }

    pub fn filter(&self) -> &FeedbackFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FeedbackFilter) {
        self.filter = filter;
    }

    pub fn set_rating_filter(&mut self, rating: Option<u8>) {
        self.filter.rating = rating;
    }

    pub fn set_service_filter(&mut self, service: Option<Service>) {
        self.filter.service = service;
    }

    pub fn clear_filters(&mut self) {
        self.filter = FeedbackFilter::default();
    }

    pub fn filtered(&self) -> Vec<&Feedback> {
        self.items
            .iter()
            .filter(|item| self.filter.matches(item))
            .collect()
    }

    /// Distinct services present, in order of first appearance
    pub fn services(&self) -> Vec<Service> {
        let mut seen = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.service) {
                seen.push(item.service);
            }
        }
        seen
    }

    pub fn analytics(&self) -> FeedbackAnalytics {
        FeedbackAnalytics::compute(&self.items)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Remove `id` through the source, then drop it from the list
    pub async fn delete(&mut self, id: &str) -> ApplicationResult<()> {
        let result = self.source.remove(id).await;
        self.notice = Some(Notice::for_result(
            &result,
            "Feedback deleted successfully!",
            "Failed to delete feedback",
        ));
        result?;

        self.items.retain(|item| item.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feedback(id: &str, rating: u8, service: Service) -> Feedback {
        Feedback {
            id: id.to_string(),
            rating,
            comment: format!("comment {}", id),
            service,
            timestamp: None,
            user_id: None,
        }
    }

    #[test]
    fn filter_matches_all_when_empty() {
        let filter = FeedbackFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&feedback("1", 2, Service::Sbi)));
    }

    #[test]
    fn analytics_on_empty_list() {
        let analytics = FeedbackAnalytics::compute(&[]);
        assert_eq!(analytics.total, 0);
        assert_eq!(analytics.average_rating, 0.0);
        assert_eq!(analytics.unique_services, 0);
        assert_eq!(analytics.rating_count(6), 0);
    }

    #[test]
    fn analytics_counts() {
        let items = [
            feedback("1", 5, Service::Zomato),
            feedback("2", 4, Service::Amazon),
            feedback("3", 1, Service::Zomato),
            feedback("4", 4, Service::Amazon),
        ];
        let analytics = FeedbackAnalytics::compute(&items);

        assert_eq!(analytics.total, 4);
        assert_eq!(analytics.average_rating, 3.5);
        assert_eq!(
            analytics.per_service,
            vec![(Service::Zomato, 2), (Service::Amazon, 2)]
        );
        assert_eq!(analytics.per_rating, [1, 0, 0, 2, 1]);
        assert_eq!(analytics.unique_services, 2);
        assert_eq!(analytics.positive_reviews, 3);
    }
}
