//! Decision access checker port.
//!
//! The engine gates every operation on the caller's decision
//! capabilities for the targeted process instance. Resolution of roles
//! to capabilities lives outside this core; the port follows a
//! fail-secure design: on ANY error, access is denied.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProcessInstanceId, ProfileId};
use crate::domain::permissions::Capability;

/// Port for asserting a profile's decision capabilities.
#[async_trait]
pub trait DecisionAccessChecker: Send + Sync {
    /// Asserts that the profile holds every listed capability for the
    /// process instance.
    ///
    /// # Errors
    ///
    /// - `Forbidden` when a capability is missing
    /// - `Unauthorized` when the profile cannot be resolved at all
    async fn assert_access(
        &self,
        profile_id: &ProfileId,
        instance_id: &ProcessInstanceId,
        required: &[Capability],
    ) -> Result<(), DomainError>;
}
