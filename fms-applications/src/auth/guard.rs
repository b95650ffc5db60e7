//! Access Guard
//!
//! Decides whether a view may render for the current session. The decision
//! is a pure function of the session state and the roles a route admits.

use crate::session::SessionState;
use fms_core::Role;
use std::fmt;

/// Navigable locations of the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    CustomerFeedback,
    AdminDashboard,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::Login,
        Route::Signup,
        Route::CustomerFeedback,
        Route::AdminDashboard,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::CustomerFeedback => "/customer-feedback",
            Route::AdminDashboard => "/admin-dashboard",
        }
    }

    /// Map a path to a route. `/` and unknown paths land on the login page.
    pub fn resolve(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        Route::ALL
            .into_iter()
            .find(|route| route.path() == trimmed)
            .unwrap_or(Route::Login)
    }

    /// Roles admitted by this route; empty for public routes
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Route::Login | Route::Signup => &[],
            Route::CustomerFeedback => &[Role::Customer],
            Route::AdminDashboard => &[Role::Admin],
        }
    }

    pub fn is_public(&self) -> bool {
        self.allowed_roles().is_empty()
    }

    /// Where a freshly authenticated user is sent
    pub fn landing_for(role: Role) -> Route {
        match role {
            Role::Customer => Route::CustomerFeedback,
            Role::Admin => Route::AdminDashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(Route),
    /// The session is still being established; show a loading indicator
    Pending,
}

/// Gate a view admitting `allowed` roles
pub fn check_access(state: &SessionState, allowed: &[Role]) -> GuardDecision {
    if state.is_loading() {
        return GuardDecision::Pending;
    }

    match state.role() {
        Some(role) if allowed.contains(&role) => GuardDecision::Render,
        _ => GuardDecision::Redirect(Route::Login),
    }
}

/// Gate navigation to `route`. Public routes always render.
pub fn guard_route(state: &SessionState, route: Route) -> GuardDecision {
    if route.is_public() {
        GuardDecision::Render
    } else {
        check_access(state, route.allowed_roles())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fms_core::User;

    fn signed_in(role: Role) -> SessionState {
        SessionState::Authenticated(User {
            id: "1".to_string(),
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            role,
        })
    }

    #[test]
    fn customer_reaches_customer_view_only() {
        let state = signed_in(Role::Customer);

        assert_eq!(
            guard_route(&state, Route::CustomerFeedback),
            GuardDecision::Render
        );
        assert_eq!(
            guard_route(&state, Route::AdminDashboard),
            GuardDecision::Redirect(Route::Login)
        );
    }

    #[test]
    fn loading_is_pending_not_redirect() {
        for state in [SessionState::Loading, SessionState::Authenticating] {
            assert_eq!(
                check_access(&state, &[Role::Admin]),
                GuardDecision::Pending
            );
        }
    }

    #[test]
    fn unauthenticated_is_redirected() {
        assert_eq!(
            check_access(&SessionState::Unauthenticated, &Role::ALL),
            GuardDecision::Redirect(Route::Login)
        );
        assert_eq!(
            guard_route(&SessionState::Unauthenticated, Route::Signup),
            GuardDecision::Render
        );
    }

    #[test]
    fn unknown_paths_resolve_to_login() {
        assert_eq!(Route::resolve("/"), Route::Login);
        assert_eq!(Route::resolve("/nowhere"), Route::Login);
        assert_eq!(Route::resolve("/admin-dashboard/"), Route::AdminDashboard);
        assert_eq!(Route::resolve("/signup"), Route::Signup);
    }

    #[test]
    fn landing_depends_on_role() {
        assert_eq!(Route::landing_for(Role::Customer), Route::CustomerFeedback);
        assert_eq!(Route::landing_for(Role::Admin), Route::AdminDashboard);
        assert_eq!(Route::AdminDashboard.to_string(), "/admin-dashboard");
    }
}
