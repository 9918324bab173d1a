//! Issued bearer token value type.

use serde::{Deserialize, Serialize};

/// A signed bearer token returned on login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// The opaque signed token string.
    pub token: String,
    /// TTL in seconds.
    pub expires_in: u64,
}
