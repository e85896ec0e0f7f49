//! Ballot signatures.
//!
//! Every ballot carries a deterministic signature over its sorted
//! proposal selection, the voter, and the submission timestamp. Without
//! a key this is an integrity marker only: audits can detect stored
//! selections drifting from the recorded payload, but nothing stops a
//! writer from recomputing it. Deployments that need tamper evidence
//! configure a signing key, which switches the scheme to HMAC-SHA256.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::domain::foundation::{ProfileId, ProposalId, Timestamp};

type HmacSha256 = Hmac<Sha256>;

/// The signed payload. Field order is fixed by this struct, and the
/// proposal ids are sorted before signing, so the encoding is
/// deterministic for a given ballot.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignaturePayload<'a> {
    proposal_ids: &'a [ProposalId],
    user_id: &'a ProfileId,
    timestamp: &'a Timestamp,
}

/// Signs and verifies ballot payloads.
pub struct BallotSigner {
    signing_key: Option<Secret<String>>,
}

impl BallotSigner {
    /// Signer producing unkeyed integrity markers.
    pub fn unkeyed() -> Self {
        Self { signing_key: None }
    }

    /// Signer producing keyed HMAC-SHA256 signatures.
    pub fn with_key(signing_key: Secret<String>) -> Self {
        Self {
            signing_key: Some(signing_key),
        }
    }

    /// Computes the signature for a ballot.
    pub fn sign(
        &self,
        proposal_ids: &[ProposalId],
        user_id: &ProfileId,
        timestamp: Timestamp,
    ) -> String {
        let mut sorted = proposal_ids.to_vec();
        sorted.sort();

        let payload = serde_json::to_vec(&SignaturePayload {
            proposal_ids: &sorted,
            user_id,
            timestamp: &timestamp,
        })
        .expect("signature payload is always serializable");

        match &self.signing_key {
            Some(key) => {
                let mut mac = HmacSha256::new_from_slice(key.expose_secret().as_bytes())
                    .expect("HMAC accepts keys of any length");
                mac.update(&payload);
                BASE64.encode(mac.finalize().into_bytes())
            }
            None => BASE64.encode(payload),
        }
    }

    /// Recomputes the signature and compares it in constant time.
    pub fn verify(
        &self,
        proposal_ids: &[ProposalId],
        user_id: &ProfileId,
        timestamp: Timestamp,
        signature: &str,
    ) -> bool {
        let expected = self.sign(proposal_ids, user_id, timestamp);
        expected.as_bytes().ct_eq(signature.as_bytes()).into()
    }
}
