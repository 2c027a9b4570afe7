//! Error types for achv core operations

use thiserror::Error;

/// Identity triple validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Required field missing: {field}")]
    MissingField { field: &'static str },

    #[error("Unsupported region: {region}")]
    UnsupportedRegion { region: String },
}

/// Achievement id parsing errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AchievementIdError {
    #[error("Invalid achievement id: {input}")]
    Invalid { input: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_error_display() {
        let err = IdentityError::MissingField { field: "realm" };
        assert_eq!(err.to_string(), "Required field missing: realm");

        let err = IdentityError::UnsupportedRegion {
            region: "xx".to_string(),
        };
        assert!(err.to_string().contains("xx"));
    }

    #[test]
    fn test_achievement_id_error_display() {
        let err = AchievementIdError::Invalid {
            input: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid achievement id: abc");
    }
}
