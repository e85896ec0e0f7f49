//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Coarse error classes mirroring the HTTP status families the
/// transport layer maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing process/instance/proposal/role (404-equivalent).
    NotFound,
    /// Malformed schema, closed phase, bad selection (400-equivalent).
    Validation,
    /// Missing capability (403-equivalent).
    Unauthorized,
    /// Duplicate vote, unique-constraint race (409-equivalent).
    Conflict,
    /// Unclassified fallback (500-equivalent).
    Internal,
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    SchemaInvalid,
    StateNotFound,
    VotingClosed,
    InvalidSelection,
    InvalidStateTransition,

    // Not found errors
    ProcessNotFound,
    ProcessInstanceNotFound,
    ProposalNotFound,
    RoleNotFound,
    ProfileNotFound,

    // Conflict errors
    AlreadyVoted,

    // Authorization errors
    Unauthorized,
    Forbidden,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    /// Maps the code onto its coarse category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::SchemaInvalid
            | ErrorCode::StateNotFound
            | ErrorCode::VotingClosed
            | ErrorCode::InvalidSelection
            | ErrorCode::InvalidStateTransition => ErrorCategory::Validation,
            ErrorCode::ProcessNotFound
            | ErrorCode::ProcessInstanceNotFound
            | ErrorCode::ProposalNotFound
            | ErrorCode::RoleNotFound
            | ErrorCode::ProfileNotFound => ErrorCategory::NotFound,
            ErrorCode::AlreadyVoted => ErrorCategory::Conflict,
            ErrorCode::Unauthorized | ErrorCode::Forbidden => ErrorCategory::Unauthorized,
            ErrorCode::DatabaseError | ErrorCode::InternalError => ErrorCategory::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::SchemaInvalid => "SCHEMA_INVALID",
            ErrorCode::StateNotFound => "STATE_NOT_FOUND",
            ErrorCode::VotingClosed => "VOTING_CLOSED",
            ErrorCode::InvalidSelection => "INVALID_SELECTION",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::ProcessNotFound => "PROCESS_NOT_FOUND",
            ErrorCode::ProcessInstanceNotFound => "PROCESS_INSTANCE_NOT_FOUND",
            ErrorCode::ProposalNotFound => "PROPOSAL_NOT_FOUND",
            ErrorCode::RoleNotFound => "ROLE_NOT_FOUND",
            ErrorCode::ProfileNotFound => "PROFILE_NOT_FOUND",
            ErrorCode::AlreadyVoted => "ALREADY_VOTED",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Creates the duplicate-ballot conflict error.
    pub fn already_voted() -> Self {
        Self::new(
            ErrorCode::AlreadyVoted,
            "A ballot has already been submitted for this process instance",
        )
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns the coarse category of this error.
    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::new(ErrorCode::ValidationFailed, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("title");
        assert_eq!(format!("{}", err), "Field 'title' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("maxVotesPerMember", 1, 100, 500);
        assert_eq!(
            format!("{}", err),
            "Field 'maxVotesPerMember' must be between 1 and 100, got 500"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::ProcessNotFound, "Process not found");
        assert_eq!(format!("{}", err), "[PROCESS_NOT_FOUND] Process not found");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::ValidationFailed, "Validation failed")
            .with_detail("field", "proposalIds")
            .with_detail("reason", "too many selections");

        assert_eq!(err.details.get("field"), Some(&"proposalIds".to_string()));
        assert_eq!(
            err.details.get("reason"),
            Some(&"too many selections".to_string())
        );
    }

    #[test]
    fn already_voted_is_a_conflict() {
        let err = DomainError::already_voted();
        assert_eq!(err.category(), ErrorCategory::Conflict);
    }

    #[test]
    fn codes_map_to_expected_categories() {
        assert_eq!(ErrorCode::VotingClosed.category(), ErrorCategory::Validation);
        assert_eq!(
            ErrorCode::ProcessInstanceNotFound.category(),
            ErrorCategory::NotFound
        );
        assert_eq!(ErrorCode::Forbidden.category(), ErrorCategory::Unauthorized);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::Internal);
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::AlreadyVoted), "ALREADY_VOTED");
        assert_eq!(format!("{}", ErrorCode::VotingClosed), "VOTING_CLOSED");
    }
}
