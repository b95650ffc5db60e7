//! Shared fixtures: an in-memory stand-in for the remote API
#![allow(dead_code)]

use async_trait::async_trait;
use fms_applications::{FeedbackApplication, LocalStorage, MemoryStorage};
use fms_core::{
    AuthApi, ErrorContext, Feedback, FeedbackApi, FeedbackDraft, FmsError, FmsResult,
    LoginRequest, Role, Service, SignupRequest, User,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Accounts and feedback held in memory. Every request is counted and the
/// feedback endpoints can be switched to fail.
#[derive(Default)]
pub struct FakeApi {
    accounts: Mutex<Vec<(User, String)>>,
    feedback: Mutex<Vec<Feedback>>,
    next_id: AtomicUsize,
    requests: AtomicUsize,
    failing: AtomicBool,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        let api = Self {
            next_id: AtomicUsize::new(100),
            ..Self::default()
        };
        api.add_account(customer(), "x");
        api.add_account(
            User {
                id: "2".to_string(),
                name: "Root".to_string(),
                email: "root@b.com".to_string(),
                role: Role::Admin,
            },
            "secret",
        );
        Arc::new(api)
    }

    pub fn with_feedback(items: Vec<Feedback>) -> Arc<Self> {
        let api = Self::new();
        *api.feedback.lock().unwrap() = items;
        api
    }

    pub fn add_account(&self, user: User, password: &str) {
        self.accounts
            .lock()
            .unwrap()
            .push((user, password.to_string()));
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn stored(&self) -> Vec<Feedback> {
        self.feedback.lock().unwrap().clone()
    }

    fn enter(&self) -> FmsResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(FmsError::Api {
                status: 500,
                message: "Internal Server Error".to_string(),
                context: ErrorContext::new("fake_api"),
            });
        }
        Ok(())
    }

    fn record(&self, id: String, draft: &FeedbackDraft) -> Feedback {
        Feedback {
            id,
            rating: draft.rating,
            comment: draft.comment.clone(),
            service: draft.service,
            timestamp: None,
            user_id: Some(draft.user_id.clone()),
        }
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> FmsResult<User> {
        self.enter()?;
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(user, password)| user.email == request.email && *password == request.password)
            .map(|(user, _)| user.clone())
            .ok_or_else(|| FmsError::Authentication {
                message: "Invalid email or password".to_string(),
                context: ErrorContext::new("fake_api"),
            })
    }

    async fn signup(&self, request: &SignupRequest) -> FmsResult<Option<User>> {
        self.enter()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        self.add_account(
            User {
                id,
                name: request.name.clone(),
                email: request.email.clone(),
                role: request.role,
            },
            &request.password,
        );
        Ok(None)
    }
}

#[async_trait]
impl FeedbackApi for FakeApi {
    async fn list_feedback(&self) -> FmsResult<Vec<Feedback>> {
        self.enter()?;
        Ok(self.stored())
    }

    async fn create_feedback(&self, draft: &FeedbackDraft) -> FmsResult<Feedback> {
        self.enter()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let created = self.record(id, draft);
        self.feedback.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_feedback(&self, id: &str, draft: &FeedbackDraft) -> FmsResult<Feedback> {
        self.enter()?;
        let updated = self.record(id.to_string(), draft);
        let mut items = self.feedback.lock().unwrap();
        let slot = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| fms_core::not_found_error!(format!("feedback {}", id), "fake_api"))?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_feedback(&self, id: &str) -> FmsResult<()> {
        self.enter()?;
        let mut items = self.feedback.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(FmsError::Api {
                status: 404,
                message: "Not Found".to_string(),
                context: ErrorContext::new("fake_api"),
            });
        }
        Ok(())
    }
}

pub fn customer() -> User {
    User {
        id: "1".to_string(),
        name: "A".to_string(),
        email: "a@b.com".to_string(),
        role: Role::Customer,
    }
}

pub fn feedback(id: &str, rating: u8, service: Service) -> Feedback {
    Feedback {
        id: id.to_string(),
        rating,
        comment: format!("comment {}", id),
        service,
        timestamp: None,
        user_id: Some("1".to_string()),
    }
}

/// Five records covering both filter dimensions
pub fn fixture() -> Vec<Feedback> {
    vec![
        feedback("1", 3, Service::Amazon),
        feedback("2", 5, Service::Amazon),
        feedback("3", 3, Service::Swiggy),
        feedback("4", 3, Service::Amazon),
        feedback("5", 1, Service::Netflix),
    ]
}

pub fn app(api: &Arc<FakeApi>, storage: Arc<dyn LocalStorage>) -> FeedbackApplication {
    FeedbackApplication::builder(api.clone(), api.clone())
        .with_storage(storage)
        .build()
}

pub fn memory_app(api: &Arc<FakeApi>) -> FeedbackApplication {
    app(api, Arc::new(MemoryStorage::new()))
}
