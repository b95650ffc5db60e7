//! Session Store - the authentication state machine and its persistence
//!
//! Each operation performs its storage side effect together with the state
//! transition, so that once it returns memory and storage agree: a user is
//! persisted under [`USER_KEY`] exactly when the state is `Authenticated`.

use super::storage::{LocalStorage, USER_KEY};
use super::types::{SessionEvent, SessionState};
use crate::{ApplicationError, ApplicationResult};
use fms_core::{FmsResult, User};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct SessionStore {
    state: SessionState,
    storage: Arc<dyn LocalStorage>,
}

impl SessionStore {
    /// A store in the `Loading` state; call [`SessionStore::restore`] next
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            state: SessionState::Loading,
            storage,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user()
    }

    fn dispatch(&mut self, event: SessionEvent) {
        let previous = std::mem::take(&mut self.state);
        self.state = previous.apply(event);
        debug!(state = %self.state, "Session transition");
    }

    /// Drop the persisted user. Failures are logged, the caller decides whether they matter.
    fn purge(&self) -> ApplicationResult<()> {
        self.storage.remove_item(USER_KEY).inspect_err(|e| {
            warn!(error = %e, "Failed to clear persisted session");
        })
    }

    /// Restore a persisted session. Absent, unreadable or corrupt data all
    /// end in `Unauthenticated` with the stored record cleared.
    pub fn restore(&mut self) -> &SessionState {
        match self.storage.get_item(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    info!(user = %user.email, "Restored persisted session");
                    self.dispatch(SessionEvent::Restored(user));
                }
                Err(e) => {
                    warn!(error = %e, "Discarding corrupt persisted session");
                    let _ = self.purge();
                    self.dispatch(SessionEvent::LoginFailed);
                }
            },
            Ok(None) => {
                self.dispatch(SessionEvent::LoginFailed);
            }
            Err(e) => {
                warn!(error = %e, "Could not read persisted session");
                let _ = self.purge();
                self.dispatch(SessionEvent::LoginFailed);
            }
        }
        &self.state
    }

    /// Enter `Authenticating` ahead of a login or signup round trip
    pub(crate) fn begin_authentication(&mut self) {
        self.dispatch(SessionEvent::LoginStarted);
    }

    /// Settle an authentication attempt started with `begin_authentication`
    pub(crate) fn complete_authentication(
        &mut self,
        outcome: FmsResult<User>,
    ) -> ApplicationResult<User> {
        let user = match outcome {
            Ok(user) => user,
            Err(e) => {
                let _ = self.purge();
                self.dispatch(SessionEvent::LoginFailed);
                return Err(e.into());
            }
        };

        let persisted = serde_json::to_string(&user)
            .map_err(ApplicationError::from)
            .and_then(|raw| self.storage.set_item(USER_KEY, &raw));

        match persisted {
            Ok(()) => {
                info!(user = %user.email, role = %user.role, "Signed in");
                self.dispatch(SessionEvent::LoginSucceeded(user.clone()));
                Ok(user)
            }
            Err(e) => {
                let _ = self.purge();
                self.dispatch(SessionEvent::LoginFailed);
                Err(e)
            }
        }
    }

    /// Clear the persisted session and sign out, whatever the current state.
    /// The transition happens even when clearing storage fails; that failure is returned.
    pub fn logout(&mut self) -> ApplicationResult<()> {
        let cleared = self.purge();
        self.dispatch(SessionEvent::LoggedOut);
        info!("Signed out");
        cleared
    }
}
