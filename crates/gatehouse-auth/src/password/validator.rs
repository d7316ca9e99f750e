//! Password policy for new passwords.

use std::fmt;

use gatehouse_core::config::AuthConfig;
use gatehouse_core::error::AppError;

/// Why a candidate password was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyViolation {
    /// The password is empty.
    Empty,
    /// Fewer characters than required.
    TooShort {
        /// Required minimum length.
        min: usize,
    },
    /// zxcvbn rated the password below the configured floor.
    TooWeak {
        /// Score the password received.
        score: u8,
        /// Minimum accepted score.
        required: u8,
    },
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Password must not be empty"),
            Self::TooShort { min } => {
                write!(f, "Password must be at least {min} characters long")
            }
            Self::TooWeak { score, required } => write!(
                f,
                "Password is too weak (strength {score}, at least {required} required)"
            ),
        }
    }
}

impl From<PolicyViolation> for AppError {
    fn from(violation: PolicyViolation) -> Self {
        AppError::bad_parameters(violation.to_string())
    }
}

/// Validates password strength against configured rules.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum length in characters.
    min_length: usize,
    /// Minimum zxcvbn score; 0 disables the check.
    min_score: u8,
}

impl PasswordPolicy {
    /// Creates a policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            min_score: config.password_min_score,
        }
    }

    /// Checks a candidate password, reporting the first failed rule.
    pub fn check(&self, password: &str) -> Result<(), PolicyViolation> {
        if password.is_empty() {
            return Err(PolicyViolation::Empty);
        }

        if password.chars().count() < self.min_length {
            return Err(PolicyViolation::TooShort {
                min: self.min_length,
            });
        }

        if self.min_score > 0 {
            let score = zxcvbn::zxcvbn(password, &[]).score() as u8;
            if score < self.min_score {
                return Err(PolicyViolation::TooWeak {
                    score,
                    required: self.min_score,
                });
            }
        }

        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_score: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PasswordPolicy::default();
        assert_eq!(policy.check(""), Err(PolicyViolation::Empty));
        assert_eq!(
            policy.check("short"),
            Err(PolicyViolation::TooShort { min: 8 })
        );
        assert!(policy.check("Str0ng!Pass").is_ok());
        assert!(policy.check("12345678").is_ok());
    }

    #[test]
    fn test_length_counts_characters() {
        let policy = PasswordPolicy::default();
        assert!(policy.check("ééééééé").is_err());
        assert!(policy.check("éééééééé").is_ok());
    }

    #[test]
    fn test_entropy_floor() {
        let policy = PasswordPolicy {
            min_length: 8,
            min_score: 3,
        };
        assert!(matches!(
            policy.check("password"),
            Err(PolicyViolation::TooWeak { required: 3, .. })
        ));
        assert!(policy.check("correct horse battery staple 42!").is_ok());
    }

    #[test]
    fn test_violation_maps_to_bad_parameters() {
        let err: AppError = PolicyViolation::TooShort { min: 8 }.into();
        assert_eq!(err.kind, gatehouse_core::ErrorKind::BadParameters);
        assert!(err.message.contains("8 characters"));
    }
}
