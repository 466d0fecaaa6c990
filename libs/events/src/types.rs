//! Event names and notification severities.

use serde::{Deserialize, Serialize};

// =============================================================================
// Event Name Constants
// =============================================================================

/// All event names as constants.
pub mod event_names {
    /// A POST/PUT/DELETE request completed successfully.
    pub const API_SUCCESS: &str = "api:success";
    /// A request failed; payload is the normalized message.
    pub const API_ERROR: &str = "api:error";

    /// Ad hoc informational message.
    pub const APP_INFO: &str = "app:info";
    /// Ad hoc warning.
    pub const APP_WARNING: &str = "app:warning";

    /// Every event the notification center listens to.
    pub const NOTIFICATION_EVENTS: [&str; 4] = [API_SUCCESS, API_ERROR, APP_INFO, APP_WARNING];
}

// =============================================================================
// Severity
// =============================================================================

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Neutral information.
    #[default]
    Info,
    /// An operation completed.
    Success,
    /// Something the user should look at, not a failure.
    Warning,
    /// An operation failed.
    Error,
}

impl Severity {
    /// Severity implied by an event name.
    ///
    /// Unknown names are treated as informational.
    pub fn for_event(event_name: &str) -> Self {
        match event_name {
            event_names::API_SUCCESS => Severity::Success,
            event_names::API_ERROR => Severity::Error,
            event_names::APP_WARNING => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_for_event() {
        assert_eq!(
            Severity::for_event(event_names::API_SUCCESS),
            Severity::Success
        );
        assert_eq!(Severity::for_event(event_names::API_ERROR), Severity::Error);
        assert_eq!(
            Severity::for_event(event_names::APP_WARNING),
            Severity::Warning
        );
        assert_eq!(Severity::for_event(event_names::APP_INFO), Severity::Info);
        assert_eq!(Severity::for_event("something:else"), Severity::Info);
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(
            serde_json::to_string(&Severity::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&Severity::Warning).unwrap(),
            "\"warning\""
        );
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
