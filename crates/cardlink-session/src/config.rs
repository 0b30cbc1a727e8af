//! Session configuration.

use crate::SessionError;

/// How this device presents itself to peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Human-readable device name shown to the other peer. A random
    /// suffix is appended to form the peer id.
    pub display_name: String,

    /// Discovery service type. Both peers must use the same one or the
    /// handshake fails.
    pub service_type: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            display_name: "cardlink".to_string(),
            service_type: "multi-peer-chat".to_string(),
        }
    }
}

impl SessionConfig {
    /// Longest allowed service type.
    pub const MAX_SERVICE_TYPE_LEN: usize = 15;

    /// Checks the config before any transport is opened.
    ///
    /// Service types are 1–15 characters of lowercase ASCII letters,
    /// digits and hyphens, with no leading, trailing or doubled hyphen.
    /// The display name must be non-blank.
    ///
    /// # Errors
    /// Returns [`SessionError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.display_name.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "display name must not be empty".into(),
            ));
        }

        let service = self.service_type.as_str();
        if service.is_empty() || service.len() > Self::MAX_SERVICE_TYPE_LEN {
            return Err(SessionError::InvalidConfig(format!(
                "service type must be 1-{} characters, got {}",
                Self::MAX_SERVICE_TYPE_LEN,
                service.len()
            )));
        }
        let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-';
        if !service.chars().all(allowed) {
            return Err(SessionError::InvalidConfig(format!(
                "service type {service:?} may only contain a-z, 0-9 and '-'"
            )));
        }
        if service.starts_with('-') || service.ends_with('-') || service.contains("--") {
            return Err(SessionError::InvalidConfig(format!(
                "service type {service:?} has a misplaced hyphen"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_service(service: &str) -> SessionConfig {
        SessionConfig {
            service_type: service.to_string(),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn test_default_is_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.service_type, "multi-peer-chat");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_display_name() {
        let config = SessionConfig {
            display_name: "   ".into(),
            ..SessionConfig::default()
        };
        assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_service_types() {
        for service in ["", "this-is-far-too-long", "Upper", "under_score", "-lead", "trail-", "dou--ble"] {
            assert!(
                with_service(service).validate().is_err(),
                "{service:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_accepts_fifteen_characters() {
        assert!(with_service("abcdefghij-1234").validate().is_ok());
    }
}
