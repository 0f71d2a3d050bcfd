// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation.
//!
//! This module enforces password requirements for new accounts.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password does not meet complexity requirements.
    #[error(
        "Password must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password matches a forbidden value.
    #[error("Password must not match {field}")]
    MatchesForbiddenField { field: String },

    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum password length.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_complexity: 2,
        }
    }
}

impl PasswordPolicy {
    /// Validates a password against the policy.
    ///
    /// # Arguments
    ///
    /// * `password` - The password to validate
    /// * `confirmation` - The password confirmation
    /// * `email` - The account e-mail address (password must not match)
    /// * `name` - The display name (password must not match)
    ///
    /// # Errors
    ///
    /// Returns a `PasswordPolicyError` if the password does not meet policy requirements.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        email: &str,
        name: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let complexity: usize = Self::calculate_complexity(password);
        if complexity < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found: complexity,
            });
        }

        // Case-insensitive; the local part of the address counts too.
        let password_lower: String = password.to_lowercase();
        let email_lower: String = email.trim().to_lowercase();
        let local_part: &str = email_lower.split('@').next().unwrap_or_default();

        if password_lower == email_lower || password_lower == local_part {
            return Err(PasswordPolicyError::MatchesForbiddenField {
                field: String::from("email"),
            });
        }

        if !name.trim().is_empty() && password_lower == name.trim().to_lowercase() {
            return Err(PasswordPolicyError::MatchesForbiddenField {
                field: String::from("name"),
            });
        }

        Ok(())
    }

    /// Calculates the complexity score of a password.
    ///
    /// Returns the number of character classes present:
    /// - Uppercase letters
    /// - Lowercase letters
    /// - Digits
    /// - Symbols
    fn calculate_complexity(password: &str) -> usize {
        let mut has_uppercase: bool = false;
        let mut has_lowercase: bool = false;
        let mut has_digit: bool = false;
        let mut has_symbol: bool = false;

        for c in password.chars() {
            if c.is_ascii_uppercase() {
                has_uppercase = true;
            } else if c.is_ascii_lowercase() {
                has_lowercase = true;
            } else if c.is_ascii_digit() {
                has_digit = true;
            } else if c.is_ascii_punctuation() || c.is_ascii_graphic() && !c.is_ascii_alphanumeric()
            {
                has_symbol = true;
            }
        }

        let mut complexity: usize = 0;
        if has_uppercase {
            complexity += 1;
        }
        if has_lowercase {
            complexity += 1;
        }
        if has_digit {
            complexity += 1;
        }
        if has_symbol {
            complexity += 1;
        }

        complexity
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const EMAIL: &str = "asha@college.edu";
    const NAME: &str = "Asha Rao";

    #[test]
    fn test_valid_password() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        // Lowercase and digit (2 of 4)
        assert!(policy.validate("lunch2026", "lunch2026", EMAIL, NAME).is_ok());

        // All four classes
        assert!(
            policy
                .validate("Canteen#2026", "Canteen#2026", EMAIL, NAME)
                .is_ok()
        );

        // Exactly 8 characters
        assert!(policy.validate("Samosa12", "Samosa12", EMAIL, NAME).is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        let result: Result<(), PasswordPolicyError> =
            policy.validate("Idli#1", "Idli#1", EMAIL, NAME);

        assert_eq!(result, Err(PasswordPolicyError::TooShort { min_length: 8 }));
    }

    #[test]
    fn test_insufficient_complexity() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        let result: Result<(), PasswordPolicyError> =
            policy.validate("onlyletters", "onlyletters", EMAIL, NAME);

        assert_eq!(
            result,
            Err(PasswordPolicyError::InsufficientComplexity {
                required: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_matches_email() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        let result: Result<(), PasswordPolicyError> =
            policy.validate("Asha@College.edu", "Asha@College.edu", EMAIL, NAME);
        assert_eq!(
            result,
            Err(PasswordPolicyError::MatchesForbiddenField {
                field: String::from("email")
            })
        );

        let policy: PasswordPolicy = PasswordPolicy {
            min_length: 4,
            min_complexity: 1,
        };
        let result: Result<(), PasswordPolicyError> = policy.validate("ASHA", "ASHA", EMAIL, NAME);
        assert_eq!(
            result,
            Err(PasswordPolicyError::MatchesForbiddenField {
                field: String::from("email")
            })
        );
    }

    #[test]
    fn test_matches_name() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        let result: Result<(), PasswordPolicyError> =
            policy.validate("asharao1", "asharao1", EMAIL, "AshaRao1");

        assert_eq!(
            result,
            Err(PasswordPolicyError::MatchesForbiddenField {
                field: String::from("name")
            })
        );
    }

    #[test]
    fn test_empty_name_is_not_forbidden() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        assert!(policy.validate("dosa2026", "dosa2026", EMAIL, "").is_ok());
    }

    #[test]
    fn test_confirmation_mismatch() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        let result: Result<(), PasswordPolicyError> =
            policy.validate("Canteen#2026", "Canteen#2027", EMAIL, NAME);

        assert_eq!(result, Err(PasswordPolicyError::ConfirmationMismatch));
    }

    #[test]
    fn test_complexity_calculation() {
        assert_eq!(PasswordPolicy::calculate_complexity("Aa1!"), 4);
        assert_eq!(PasswordPolicy::calculate_complexity("abc1"), 2);
        assert_eq!(PasswordPolicy::calculate_complexity("abc"), 1);
        assert_eq!(PasswordPolicy::calculate_complexity(""), 0);
    }
}
