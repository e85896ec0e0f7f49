//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the Commonground decision domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCategory, ErrorCode, ValidationError};
pub use ids::{
    OrganizationId, ProcessId, ProcessInstanceId, ProfileId, ProposalId, RoleId, VoteSubmissionId,
};
pub use timestamp::Timestamp;
