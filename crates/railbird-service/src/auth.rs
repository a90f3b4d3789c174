//! Credential verification boundary.
//!
//! Registration, login, and credential storage live outside this system.
//! What crosses the boundary is an opaque token; the service only needs a
//! seam that either yields the authenticated [`PlayerId`] or fails with
//! `Unauthenticated`.
//!
//! The shipped implementation verifies an ed25519 signature issued by the
//! (external) login service over a domain-tagged payload. Token format:
//! `<username>.<signature-hex>`.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use railbird_types::{PlayerId, RailbirdError, Result};

/// Turns a credential token into an authenticated identity.
pub trait CredentialVerifier: Send + Sync {
    /// # Errors
    /// Returns [`RailbirdError::Unauthenticated`] for any token that does
    /// not verify.
    fn verify(&self, token: &str) -> Result<PlayerId>;
}

/// Verifies tokens signed by the login service's ed25519 key.
pub struct Ed25519Verifier {
    key: VerifyingKey,
}

impl Ed25519Verifier {
    #[must_use]
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Canonical signing payload for a username.
    ///
    /// Format: `"railbird:credential:v1:" || normalized-username`.
    /// Normalization happens before signing, so differently-cased tokens
    /// for the same identity verify against the same payload.
    #[must_use]
    pub fn signing_payload(player: &PlayerId) -> Vec<u8> {
        let mut payload = Vec::with_capacity(32 + player.as_str().len());
        payload.extend_from_slice(b"railbird:credential:v1:");
        payload.extend_from_slice(player.as_str().as_bytes());
        payload
    }

    /// Issue a token for `username`. This is the login-service side of the
    /// boundary, provided here for tests and tooling.
    #[must_use]
    pub fn issue(signing_key: &SigningKey, username: &str) -> String {
        let player = PlayerId::new(username);
        let signature = signing_key.sign(&Self::signing_payload(&player));
        format!("{}.{}", player.as_str(), hex::encode(signature.to_bytes()))
    }
}

impl CredentialVerifier for Ed25519Verifier {
    fn verify(&self, token: &str) -> Result<PlayerId> {
        let (name, signature_hex) =
            token
                .rsplit_once('.')
                .ok_or_else(|| RailbirdError::Unauthenticated {
                    reason: "malformed token".to_string(),
                })?;

        let player = PlayerId::new(name);
        if player.as_str().is_empty() {
            return Err(RailbirdError::Unauthenticated {
                reason: "empty username".to_string(),
            });
        }

        let signature_bytes =
            hex::decode(signature_hex).map_err(|_| RailbirdError::Unauthenticated {
                reason: "signature is not hex".to_string(),
            })?;
        let signature =
            Signature::from_slice(&signature_bytes).map_err(|_| RailbirdError::Unauthenticated {
                reason: "signature has wrong length".to_string(),
            })?;

        self.key
            .verify(&Self::signing_payload(&player), &signature)
            .map_err(|_| RailbirdError::Unauthenticated {
                reason: "signature verification failed".to_string(),
            })?;

        Ok(player)
    }
}
