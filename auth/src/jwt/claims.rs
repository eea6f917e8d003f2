use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Claims carried by an access token.
///
/// Access tokens are self-contained: the issuer never stores them, so everything a
/// downstream service needs to identify the caller lives here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub username: String,

    pub user_id: Uuid,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl AccessClaims {
    pub fn new(user_id: Uuid, username: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            user_id,
            exp: expires_at.timestamp(),
        }
    }
}

/// Claims carried by a refresh token.
///
/// `token_hash` is a random identifier that doubles as the server-side lookup key;
/// it is not derived from the token string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshClaims {
    pub token_hash: Uuid,

    pub user_id: Uuid,

    /// Issuance time (Unix timestamp)
    pub created_at: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl RefreshClaims {
    /// Create claims for a freshly generated refresh token.
    ///
    /// # Arguments
    /// * `user_id` - Owning user
    /// * `issued_at` - Issuance instant
    /// * `expires_at` - Absolute expiry instant
    ///
    /// # Returns
    /// Claims with a new random `token_hash`
    pub fn generate(user_id: Uuid, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token_hash: Uuid::new_v4(),
            user_id,
            created_at: issued_at.timestamp(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Issuance instant as a UTC datetime.
    pub fn created_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.created_at, 0).unwrap_or_default()
    }

    /// Expiry instant as a UTC datetime.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp > self.exp
    }
}
