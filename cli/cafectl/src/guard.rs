//! Route protection for the admin area.
//!
//! Access is decided from the session on every navigation. Nothing is
//! cached, so a logout elsewhere takes effect on the next navigation into
//! the admin area.

use tracing::debug;

use crate::error::CliError;
use crate::session::Session;

/// Where denied navigations are sent.
pub const LOGIN_PATH: &str = "/login";

/// Root of the protected subtree.
pub const ADMIN_ROOT: &str = "/admin";

/// Landing page after login.
pub const ADMIN_HOME: &str = "/admin/dashboard";

/// Outcome of evaluating the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied { redirect_to: &'static str },
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Access::Granted)
    }
}

/// True for `/admin` and everything beneath it.
pub fn is_protected(path: &str) -> bool {
    path == ADMIN_ROOT
        || path
            .strip_prefix(ADMIN_ROOT)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Gates the admin subtree on session state.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: Session,
}

impl RouteGuard {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Evaluate access to the protected subtree right now.
    pub fn evaluate(&self) -> Access {
        if self.session.is_authenticated() {
            Access::Granted
        } else {
            Access::Denied {
                redirect_to: LOGIN_PATH,
            }
        }
    }

    /// Evaluate access to a specific path; public paths are always granted.
    pub fn check(&self, path: &str) -> Access {
        if is_protected(path) {
            self.evaluate()
        } else {
            Access::Granted
        }
    }
}

/// Tracks the current location and applies the guard on every move.
#[derive(Debug, Clone)]
pub struct Navigator {
    guard: RouteGuard,
    location: String,
}

impl Navigator {
    /// Start at `initial`, which is checked like any other navigation.
    pub fn new(guard: RouteGuard, initial: &str) -> Self {
        let mut navigator = Self {
            guard,
            location: LOGIN_PATH.to_string(),
        };
        navigator.navigate(initial);
        navigator
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Move to `path`, or to the login page if the guard denies it.
    pub fn navigate(&mut self, path: &str) -> Access {
        let access = self.guard.check(path);
        self.location = match access {
            Access::Granted => path.to_string(),
            Access::Denied { redirect_to } => redirect_to.to_string(),
        };
        debug!(requested = path, location = %self.location, ?access, "navigated");
        access
    }

    /// Navigate and turn a denial into an error.
    pub fn require(&mut self, path: &str) -> Result<(), CliError> {
        match self.navigate(path) {
            Access::Granted => Ok(()),
            Access::Denied { .. } => Err(CliError::NotAuthenticated(path.to_string())),
        }
    }
}
