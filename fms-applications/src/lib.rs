//! FMS Applications - session handling, access control and feedback views
//!
//! This crate holds everything between the remote API (`fms-api`) and the
//! user-facing surface (`fms-cli`):
//!
//! - **Session Store**: the authentication state machine, persisted to local storage
//! - **Auth Gateway**: login/signup round trips translated into session transitions
//! - **Access Guard**: role-based gating of the customer and admin views
//! - **Feedback Client / Views**: validated CRUD and the per-role list views
//!
//! [`FeedbackApplication`] is the root context object that wires them together.

pub mod auth;
pub mod feedback;
pub mod session;

use fms_api::{ApiClientConfig, HttpApiClient};
use fms_core::{AuthApi, FeedbackApi, FeedbackSourceKind, FmsConfig, FmsError, Role, User};
use std::sync::Arc;
use tracing::info;

pub use auth::{check_access, guard_route, AuthGateway, GuardDecision, Route};
pub use feedback::{
    AdminView, CustomerView, FeedbackAnalytics, FeedbackClient, FeedbackFilter, FeedbackForm,
    FeedbackSource, LocalFeedbackCache, Notice, NoticeKind, SubmitOutcome,
};
pub use session::{
    FileStorage, LocalStorage, MemoryStorage, SessionEvent, SessionState, SessionStore,
    FEEDBACKS_KEY, USER_KEY,
};

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("{0}")]
    Core(#[from] FmsError),

    #[error("Access denied: {message}")]
    AccessDenied { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

impl ApplicationError {
    /// Create an access denied error
    pub fn access_denied<S: Into<String>>(message: S) -> Self {
        Self::AccessDenied {
            message: message.into(),
        }
    }

    /// Create a session error
    pub fn session<S: Into<String>>(message: S) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Client-side validation failure (no request was sent)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Core(FmsError::Validation { .. }))
    }

    /// Failure reported by, or on the way to, the remote API
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Core(error) if error.is_remote())
    }

    /// Text suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Core(error) => error.user_message(),
            other => other.to_string(),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            Self::Core(error) => error.log(),
            other => tracing::warn!(error = %other, "Application error"),
        }
    }
}

/// Root context object: built once at startup, restores the persisted session,
/// and hands out role-gated views.
pub struct FeedbackApplication {
    session: SessionStore,
    auth: AuthGateway,
    feedback: FeedbackClient,
    storage: Arc<dyn LocalStorage>,
    admin_source: FeedbackSourceKind,
}

/// Builder for FeedbackApplication
pub struct FeedbackApplicationBuilder {
    auth_api: Arc<dyn AuthApi>,
    feedback_api: Arc<dyn FeedbackApi>,
    storage: Option<Arc<dyn LocalStorage>>,
    admin_source: FeedbackSourceKind,
}

impl FeedbackApplicationBuilder {
    pub fn new(auth_api: Arc<dyn AuthApi>, feedback_api: Arc<dyn FeedbackApi>) -> Self {
        Self {
            auth_api,
            feedback_api,
            storage: None,
            admin_source: FeedbackSourceKind::default(),
        }
    }

    /// Set the durable storage (defaults to in-memory)
    pub fn with_storage(mut self, storage: Arc<dyn LocalStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Choose where the admin dashboard reads feedback from
    pub fn with_admin_source(mut self, source: FeedbackSourceKind) -> Self {
        self.admin_source = source;
        self
    }

    /// Build the application and restore any persisted session
    pub fn build(self) -> FeedbackApplication {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStorage::new()));

        let mut session = SessionStore::new(storage.clone());
        session.restore();

        FeedbackApplication {
            session,
            auth: AuthGateway::new(self.auth_api),
            feedback: FeedbackClient::new(self.feedback_api),
            storage,
            admin_source: self.admin_source,
        }
    }
}

impl FeedbackApplication {
    pub fn builder(
        auth_api: Arc<dyn AuthApi>,
        feedback_api: Arc<dyn FeedbackApi>,
    ) -> FeedbackApplicationBuilder {
        FeedbackApplicationBuilder::new(auth_api, feedback_api)
    }

    /// Wire the HTTP client and file storage described by `config`
    pub fn from_config(config: &FmsConfig) -> ApplicationResult<Self> {
        let client = Arc::new(HttpApiClient::new(ApiClientConfig::from(&config.api))?);
        let storage = Arc::new(FileStorage::new(&config.storage.data_dir)?);

        info!(
            api = %client.base_url(),
            data_dir = %config.storage.data_dir.display(),
            "Initialising feedback application"
        );

        Ok(Self::builder(client.clone(), client)
            .with_storage(storage)
            .with_admin_source(config.admin.source)
            .build())
    }

    pub fn session(&self) -> &SessionState {
        self.session.state()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.state().user()
    }

    pub fn feedback_client(&self) -> &FeedbackClient {
        &self.feedback
    }

    pub async fn login(&mut self, email: &str, password: &str) -> ApplicationResult<User> {
        self.auth.login(&mut self.session, email, password).await
    }

    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> ApplicationResult<User> {
        self.auth
            .signup(&mut self.session, name, email, password, role)
            .await
    }

    /// Teardown: clear the persisted session
    pub fn logout(&mut self) -> ApplicationResult<()> {
        self.session.logout()
    }

    /// Where the current session may navigate for `route`
    pub fn guard(&self, route: Route) -> GuardDecision {
        auth::guard_route(self.session.state(), route)
    }

    /// The signed-in user, if the session may render `route`
    pub fn require(&self, route: Route) -> ApplicationResult<&User> {
        match self.guard(route) {
            GuardDecision::Render => self.user().ok_or_else(|| {
                ApplicationError::access_denied(format!("{} requires a signed-in user", route))
            }),
            GuardDecision::Pending => Err(ApplicationError::session(
                "Session is still being established",
            )),
            GuardDecision::Redirect(target) => {
                let roles = route
                    .allowed_roles()
                    .iter()
                    .map(Role::as_str)
                    .collect::<Vec<_>>()
                    .join(" or ");
                Err(ApplicationError::access_denied(format!(
                    "{} is only available to {} accounts; continue at {}",
                    route, roles, target
                )))
            }
        }
    }

    /// Customer view for the signed-in customer
    pub fn customer_view(&self) -> ApplicationResult<CustomerView> {
        let user = self.require(Route::CustomerFeedback)?.clone();
        Ok(CustomerView::new(self.feedback.clone(), user))
    }

    /// Admin dashboard over the configured feedback source
    pub fn admin_view(&self) -> ApplicationResult<AdminView> {
        self.require(Route::AdminDashboard)?;
        let source: Arc<dyn FeedbackSource> = match self.admin_source {
            FeedbackSourceKind::Api => Arc::new(self.feedback.clone()),
            FeedbackSourceKind::LocalCache => {
                Arc::new(LocalFeedbackCache::new(self.storage.clone()))
            }
        };
        Ok(AdminView::new(source))
    }
}
