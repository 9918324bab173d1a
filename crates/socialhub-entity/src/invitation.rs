//! Single-use activation invitations.
//!
//! Only the SHA-256 hash of an invitation is ever persisted. The plaintext
//! is handed to the notifier once and then dropped.

use std::fmt;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A freshly generated invitation: the plaintext plus its hash.
///
/// `Debug` redacts the plaintext.
#[derive(Clone)]
pub struct InvitationToken {
    plaintext: String,
    hash: String,
}

impl InvitationToken {
    /// Generate a new random invitation.
    pub fn generate() -> Self {
        let plaintext = Uuid::new_v4().to_string();
        let hash = hash_token(&plaintext);
        Self { plaintext, hash }
    }

    /// The value to embed in the activation link.
    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    /// The value to persist.
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for InvitationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvitationToken")
            .field("plaintext", &"<redacted>")
            .field("hash", &self.hash)
            .finish()
    }
}

/// Lowercase hex SHA-256 of an invitation plaintext.
pub fn hash_token(plaintext: &str) -> String {
    format!("{:x}", Sha256::digest(plaintext.as_bytes()))
}

/// A persisted invitation row.
#[derive(Debug, Clone)]
pub struct Invitation {
    /// Hex SHA-256 of the plaintext.
    pub token_hash: String,
    /// The user the invitation activates.
    pub user_id: i64,
    /// From this instant on the invitation can no longer be redeemed.
    pub expiry: DateTime<Utc>,
}

impl Invitation {
    /// Whether the invitation may still be redeemed at `now`.
    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry
    }
}
