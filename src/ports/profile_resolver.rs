//! Profile resolution port.
//!
//! Session and token handling are external; the engine only needs the
//! acting profile id.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProfileId};

/// Port for resolving the current caller to a platform profile.
#[async_trait]
pub trait ProfileResolver: Send + Sync {
    /// Resolves an auth token to the profile acting in this request.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` for missing/expired tokens
    /// - `ProfileNotFound` when the token maps to no profile
    async fn resolve_current_profile_id(&self, auth_token: &str)
        -> Result<ProfileId, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_resolver_is_object_safe() {
        fn _accepts_dyn(_resolver: &dyn ProfileResolver) {}
    }
}
