//! Decision engine configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::schema::DEFAULT_MAX_VOTES_PER_MEMBER;
use crate::domain::voting::BallotSigner;

/// Decision engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Vote limit applied when a process instance sets none
    #[serde(default = "default_max_votes")]
    pub default_max_votes_per_member: u32,

    /// Optional key for keyed (HMAC) ballot signatures. Unset means
    /// ballots carry unkeyed integrity markers only.
    #[serde(default)]
    pub ballot_signing_key: Option<Secret<String>>,
}

impl EngineConfig {
    /// Builds the ballot signer this configuration describes.
    pub fn ballot_signer(&self) -> BallotSigner {
        match &self.ballot_signing_key {
            Some(key) => BallotSigner::with_key(key.clone()),
            None => BallotSigner::unkeyed(),
        }
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_max_votes_per_member < 1 {
            return Err(ValidationError::InvalidVoteLimit);
        }
        if let Some(key) = &self.ballot_signing_key {
            if key.expose_secret().len() < 32 {
                return Err(ValidationError::SigningKeyTooShort);
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_max_votes_per_member: default_max_votes(),
            ballot_signing_key: None,
        }
    }
}

fn default_max_votes() -> u32 {
    DEFAULT_MAX_VOTES_PER_MEMBER
}
