//! Auth Gateway - login and signup against the remote API
//!
//! The gateway validates credentials locally, performs the round trip and
//! hands the outcome to the [`SessionStore`], which settles the session and
//! its persisted copy together.

use crate::session::SessionStore;
use crate::ApplicationResult;
use fms_core::{
    validation_error, AuthApi, FmsResult, LoginRequest, Role, SignupRequest, User,
};
use std::sync::Arc;
use tracing::{debug, info};

const COMPONENT: &str = "auth_gateway";

#[derive(Clone)]
pub struct AuthGateway {
    api: Arc<dyn AuthApi>,
}

impl AuthGateway {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api }
    }

    /// Sign in with email and password.
    ///
    /// Invalid input is rejected before the session changes or any request
    /// is sent.
    pub async fn login(
        &self,
        session: &mut SessionStore,
        email: &str,
        password: &str,
    ) -> ApplicationResult<User> {
        let request = login_request(email, password)?;

        debug!(email = %request.email, "Logging in");
        session.begin_authentication();
        let outcome = self.api.login(&request).await;
        session.complete_authentication(outcome)
    }

    /// Register a new account and sign it in. The role is taken as given.
    pub async fn signup(
        &self,
        session: &mut SessionStore,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> ApplicationResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(validation_error!("Name is required", "name", COMPONENT).into());
        }
        let credentials = login_request(email, password)?;
        let request = SignupRequest {
            name: name.to_string(),
            email: credentials.email,
            password: credentials.password,
            role,
        };

        debug!(email = %request.email, role = %role, "Signing up");
        session.begin_authentication();
        let outcome = self.register(&request).await;
        session.complete_authentication(outcome)
    }

    async fn register(&self, request: &SignupRequest) -> FmsResult<User> {
        match self.api.signup(request).await? {
            Some(user) => Ok(user),
            None => {
                // The account exists but the reply carried no record; fetch it by signing in
                info!(email = %request.email, "Signup acknowledged, signing in");
                self.api.login(&request.credentials()).await
            }
        }
    }
}

fn login_request(email: &str, password: &str) -> ApplicationResult<LoginRequest> {
    let email = email.trim();
    if email.is_empty() {
        return Err(validation_error!("Email is required", "email", COMPONENT).into());
    }
    if !email.contains('@') {
        return Err(
            validation_error!("Please enter a valid email address", "email", COMPONENT).into(),
        );
    }
    if password.is_empty() {
        return Err(validation_error!("Password is required", "password", COMPONENT).into());
    }

    Ok(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}
