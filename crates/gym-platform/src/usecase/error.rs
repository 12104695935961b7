//! Use Case Errors
//!
//! Categorized error types for use case failures. Categories map one-to-one
//! to HTTP status codes so API handlers never inspect error codes.

use serde::{Deserialize, Serialize};

/// Categorized error types for use case failures.
///
/// - `ValidationError` -> 400 Bad Request
/// - `BusinessRuleViolation` -> 409 Conflict
/// - `NotFoundError` -> 404 Not Found
/// - `ConcurrencyError` -> 409 Conflict
/// - `CommitError` -> 500 Internal Server Error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UseCaseError {
    /// Input validation failed (missing fields, non-positive amounts, ...).
    ValidationError { code: String, message: String },

    /// Business rule violation (disallowed status transition, duplicate
    /// active subscription, ...).
    BusinessRuleViolation { code: String, message: String },

    /// Referenced entity does not exist.
    NotFoundError { code: String, message: String },

    /// Optimistic locking conflict - the aggregate was modified by a
    /// concurrent writer between read and commit.
    ConcurrencyError { code: String, message: String },

    /// Transaction commit failed.
    CommitError { code: String, message: String },
}

impl UseCaseError {
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn business_rule(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFoundError {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn concurrency(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConcurrencyError {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn commit(message: impl Into<String>) -> Self {
        Self::CommitError {
            code: "COMMIT_FAILED".to_string(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::ValidationError { code, .. } => code,
            Self::BusinessRuleViolation { code, .. } => code,
            Self::NotFoundError { code, .. } => code,
            Self::ConcurrencyError { code, .. } => code,
            Self::CommitError { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } => message,
            Self::BusinessRuleViolation { message, .. } => message,
            Self::NotFoundError { message, .. } => message,
            Self::ConcurrencyError { message, .. } => message,
            Self::CommitError { message, .. } => message,
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. } => 400,
            Self::BusinessRuleViolation { .. } => 409,
            Self::NotFoundError { .. } => 404,
            Self::ConcurrencyError { .. } => 409,
            Self::CommitError { .. } => 500,
        }
    }
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for UseCaseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error() {
        let err = UseCaseError::validation("AMOUNT_NOT_POSITIVE", "Amount must be positive");
        assert_eq!(err.code(), "AMOUNT_NOT_POSITIVE");
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn not_found_error() {
        let err = UseCaseError::not_found("CLIENT_NOT_FOUND", "Client not found");
        assert_eq!(err.http_status_code(), 404);
    }

    #[test]
    fn concurrency_error_conflicts() {
        let err = UseCaseError::concurrency("VERSION_CONFLICT", "Subscription was modified");
        assert_eq!(err.http_status_code(), 409);
    }

    #[test]
    fn display_includes_code() {
        let err = UseCaseError::business_rule("ALREADY_ACTIVE", "Client already has an active subscription");
        assert_eq!(err.to_string(), "[ALREADY_ACTIVE] Client already has an active subscription");
    }
}
