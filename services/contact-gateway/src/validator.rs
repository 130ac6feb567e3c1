// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form validator.
//!
//! - Required fields: first name, email, message
//! - Email shape: `local@domain.tld`, no whitespace, a single `@`
//! - Length caps on every field

use crate::config::ValidationConfig;
use crate::models::ContactSubmission;
use thiserror::Error;
use tracing::debug;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill all required fields: {0} is missing")]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("The {field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Result of validation.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Submission is valid
    Valid,
    /// Submission is invalid
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(e) => Some(e),
        }
    }
}

/// Contact submission validator.
#[derive(Debug, Clone)]
pub struct ContactValidator {
    config: ValidationConfig,
}

impl ContactValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a submission. Fields are checked as given; trim beforehand.
    pub fn validate(&self, submission: &ContactSubmission) -> ValidationResult {
        let required = [
            ("first name", &submission.first_name),
            ("email", &submission.email),
            ("message", &submission.message),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                debug!(field, "Missing required field");
                return ValidationResult::Invalid(ValidationError::MissingField(field));
            }
        }

        if !is_well_formed_email(&submission.email) {
            debug!(email = %submission.email, "Malformed email address");
            return ValidationResult::Invalid(ValidationError::InvalidEmail);
        }

        let bounded = [
            ("first name", &submission.first_name, self.config.max_field_len),
            ("last name", &submission.last_name, self.config.max_field_len),
            ("email", &submission.email, self.config.max_field_len),
            ("phone", &submission.phone, self.config.max_field_len),
            ("message", &submission.message, self.config.max_message_len),
        ];
        for (field, value, max) in bounded {
            if value.chars().count() > max {
                debug!(field, max, "Field too long");
                return ValidationResult::Invalid(ValidationError::TooLong { field, max });
            }
        }

        ValidationResult::Valid
    }
}

/// Accepts `[^\s@]+@[^\s@]+\.[^\s@]+`, anchored at both ends.
fn is_well_formed_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }

    // A dot with at least one character on each side.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
