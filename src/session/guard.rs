use serde::Serialize;

use super::{Route, SessionStore};

/// Result of consulting the session for a navigation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GuardState {
    /// False until client-side storage has been read; the first render must not depend on it
    pub hydrated: bool,
    pub is_authenticated: bool,
    /// Where to send the user instead, if anywhere
    pub redirect: Option<Route>,
}

impl GuardState {
    /// Whether the requested view may render its content
    pub fn allows_render(&self) -> bool {
        self.hydrated && self.redirect.is_none()
    }
}

/// Gates protected views on token presence. Never clears or refreshes the token.
#[derive(Debug, Clone, Copy)]
pub struct SessionGuard<'a> {
    session: &'a SessionStore,
}

impl<'a> SessionGuard<'a> {
    pub fn new(session: &'a SessionStore) -> Self {
        Self { session }
    }

    /// Read the session once for a navigation to `route`
    pub fn check(&self, route: Route) -> GuardState {
        let is_authenticated = self.session.is_authenticated();
        let redirect = if route.is_protected() && !is_authenticated {
            tracing::debug!(route = %route, "no session token, redirecting to login");
            Some(Route::Login)
        } else {
            None
        };

        GuardState {
            hydrated: true,
            is_authenticated,
            redirect,
        }
    }
}
