//! Feedback Module
//!
//! Validated CRUD against the feedback API and the two list views built on
//! top of it: the customer's own list and the admin dashboard.

pub mod admin;
pub mod client;
pub mod customer;
pub mod form;
pub mod notice;
pub mod source;

pub use admin::{AdminView, FeedbackAnalytics, FeedbackFilter};
pub use client::FeedbackClient;
pub use customer::{CustomerView, SubmitOutcome};
pub use form::FeedbackForm;
pub use notice::{Notice, NoticeKind};
pub use source::{FeedbackSource, LocalFeedbackCache};
