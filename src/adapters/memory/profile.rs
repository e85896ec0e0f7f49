//! Static profile resolver for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::foundation::{DomainError, ErrorCode, ProfileId};
use crate::ports::ProfileResolver;

/// [`ProfileResolver`] backed by a fixed token-to-profile map.
#[derive(Default)]
pub struct StaticProfileResolver {
    profiles: HashMap<String, ProfileId>,
}

impl StaticProfileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token mapping.
    pub fn with_profile(mut self, token: &str, profile_id: ProfileId) -> Self {
        self.profiles.insert(token.to_string(), profile_id);
        self
    }
}

#[async_trait]
impl ProfileResolver for StaticProfileResolver {
    async fn resolve_current_profile_id(
        &self,
        auth_token: &str,
    ) -> Result<ProfileId, DomainError> {
        self.profiles
            .get(auth_token)
            .cloned()
            .ok_or_else(|| DomainError::new(ErrorCode::Unauthorized, "Unknown auth token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_registered_tokens() {
        let profile = ProfileId::new("member-1").unwrap();
        let resolver = StaticProfileResolver::new().with_profile("token-a", profile.clone());

        let resolved = resolver.resolve_current_profile_id("token-a").await.unwrap();
        assert_eq!(resolved, profile);
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let resolver = StaticProfileResolver::new();
        let err = resolver
            .resolve_current_profile_id("missing")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }
}
