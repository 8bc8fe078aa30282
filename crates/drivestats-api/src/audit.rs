//! Security audit logging for account and session events
//!
//! Signups, sign-ins, sign-outs, password changes and ownership refusals are
//! logged at INFO level with the "audit" target so they can be filtered and
//! routed separately from application logs. Each record carries the event
//! serialized as JSON next to a short human-readable message.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Security audit events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// New account created
    SignupSuccess {
        user_id: i32,
        username: String,
        ip_address: Option<String>,
    },

    /// Account creation failed
    SignupFailure {
        username: String,
        reason: String,
        ip_address: Option<String>,
    },

    /// Credentials accepted and a token issued
    SignInSuccess {
        user_id: i32,
        username: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Credentials rejected
    SignInFailure {
        username: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
    },

    /// Session ended and token revoked
    SignOut {
        user_id: i32,
        username: String,
        ip_address: Option<String>,
    },

    /// Password update attempt
    PasswordChange {
        username: String,
        success: bool,
        ip_address: Option<String>,
    },

    /// Caller tried to touch a resource owned by another account
    AccessDenied {
        user_id: i32,
        resource: String,
        ip_address: Option<String>,
    },
}

impl AuditEvent {
    fn message(&self) -> &'static str {
        match self {
            AuditEvent::SignupSuccess { .. } => "Signup successful",
            AuditEvent::SignupFailure { .. } => "Signup failed",
            AuditEvent::SignInSuccess { .. } => "Sign-in successful",
            AuditEvent::SignInFailure { .. } => "Sign-in failed",
            AuditEvent::SignOut { .. } => "User signed out",
            AuditEvent::PasswordChange { success: true, .. } => "Password changed",
            AuditEvent::PasswordChange { success: false, .. } => "Password change rejected",
            AuditEvent::AccessDenied { .. } => "Access denied",
        }
    }
}

/// Log a security audit event
///
/// ```ignore
/// use drivestats_api::audit::{audit_log, AuditEvent};
///
/// audit_log(&AuditEvent::SignOut {
///     user_id: 1,
///     username: "alice".to_string(),
///     ip_address: None,
/// });
/// ```
pub fn audit_log(event: &AuditEvent) {
    let event_json = serde_json::to_string(event)
        .unwrap_or_else(|e| format!("{{\"error\":\"Failed to serialize audit event: {e}\"}}"));

    info!(target: "audit", event = %event_json, "{}", event.message());
}

/// Extract client IP address from proxy headers
///
/// Checks X-Forwarded-For (first hop) then X-Real-IP.
pub fn extract_ip_address(headers: &axum::http::HeaderMap) -> Option<String> {
    if let Some(xff) = headers.get("x-forwarded-for") {
        if let Ok(xff_str) = xff.to_str() {
            if let Some(first_ip) = xff_str.split(',').next() {
                return Some(first_ip.trim().to_string());
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(ip_str) = real_ip.to_str() {
            return Some(ip_str.to_string());
        }
    }

    None
}

/// Extract user agent from request headers
pub fn extract_user_agent(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_event_serialization() {
        let event = AuditEvent::SignInSuccess {
            user_id: 3,
            username: "alice".to_string(),
            ip_address: Some("192.168.1.1".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event_type\":\"sign_in_success\""));
        assert!(json.contains("alice"));
    }

    #[test]
    fn test_password_change_messages() {
        let ok = AuditEvent::PasswordChange {
            username: "alice".to_string(),
            success: true,
            ip_address: None,
        };
        let rejected = AuditEvent::PasswordChange {
            username: "alice".to_string(),
            success: false,
            ip_address: None,
        };

        assert_eq!(ok.message(), "Password changed");
        assert_eq!(rejected.message(), "Password change rejected");

        audit_log(&ok);
        audit_log(&rejected);
    }

    #[test]
    fn test_extract_ip_from_x_forwarded_for() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.1, 198.51.100.1".parse().unwrap(),
        );

        assert_eq!(extract_ip_address(&headers), Some("203.0.113.1".to_string()));
    }

    #[test]
    fn test_extract_ip_from_x_real_ip() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert("x-real-ip", "203.0.113.1".parse().unwrap());

        assert_eq!(extract_ip_address(&headers), Some("203.0.113.1".to_string()));
    }

    #[test]
    fn test_extract_missing_headers() {
        let headers = axum::http::HeaderMap::new();

        assert_eq!(extract_ip_address(&headers), None);
        assert_eq!(extract_user_agent(&headers), None);
    }
}
