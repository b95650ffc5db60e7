//! Session state machine
//!
//! `SessionState` is the only place a `User` lives while signed in. Only the
//! `Authenticated` variant carries one, so "authenticated iff a user is
//! present" holds by construction.

use fms_core::{Role, User};
use std::fmt;

/// Current session phase
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Startup, before the persisted session has been examined
    #[default]
    Loading,
    Unauthenticated,
    /// A login or signup request is in flight
    Authenticating,
    Authenticated(User),
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoginStarted,
    LoginSucceeded(User),
    LoginFailed,
    LoggedOut,
    Restored(User),
}

impl SessionState {
    /// Pure transition function
    pub fn apply(self, event: SessionEvent) -> SessionState {
        match event {
            SessionEvent::LoginStarted => SessionState::Authenticating,
            SessionEvent::LoginSucceeded(user) | SessionEvent::Restored(user) => {
                SessionState::Authenticated(user)
            }
            SessionEvent::LoginFailed | SessionEvent::LoggedOut => SessionState::Unauthenticated,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// True during startup restore and while authenticating
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading | SessionState::Authenticating)
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|user| user.role)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Loading => write!(f, "loading"),
            SessionState::Unauthenticated => write!(f, "unauthenticated"),
            SessionState::Authenticating => write!(f, "authenticating"),
            SessionState::Authenticated(user) => write!(f, "authenticated as {}", user.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "1".to_string(),
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            role: Role::Customer,
        }
    }

    #[test]
    fn login_flow_transitions() {
        let state = SessionState::default();
        assert!(state.is_loading());

        let state = state.apply(SessionEvent::LoginFailed);
        assert_eq!(state, SessionState::Unauthenticated);

        let state = state.apply(SessionEvent::LoginStarted);
        assert_eq!(state, SessionState::Authenticating);
        assert!(state.is_loading());
        assert!(!state.is_authenticated());

        let state = state.apply(SessionEvent::LoginSucceeded(user()));
        assert_eq!(state.user(), Some(&user()));
        assert_eq!(state.role(), Some(Role::Customer));
        assert!(!state.is_loading());

        let state = state.apply(SessionEvent::LoggedOut);
        assert_eq!(state, SessionState::Unauthenticated);
    }

    #[test]
    fn authenticated_matches_user_presence_in_every_state() {
        let events = [
            SessionEvent::LoginStarted,
            SessionEvent::LoginSucceeded(user()),
            SessionEvent::LoginFailed,
            SessionEvent::LoggedOut,
            SessionEvent::Restored(user()),
        ];

        let starts = [
            SessionState::Loading,
            SessionState::Unauthenticated,
            SessionState::Authenticating,
            SessionState::Authenticated(user()),
        ];

        for start in starts {
            for event in events.clone() {
                let next = start.clone().apply(event);
                assert_eq!(next.is_authenticated(), next.user().is_some());
            }
        }
    }
}
