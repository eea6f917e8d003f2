use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use super::claims::AccessClaims;
use super::claims::RefreshClaims;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    /// Shortest access-token lifetime accepted.
    pub const MIN_ACCESS_TTL_MINUTES: i64 = 15;

    pub fn new(secret: impl Into<String>, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Check the configuration against the issuing policy.
    ///
    /// # Errors
    /// * `Configuration` - Secret is empty, access TTL is under 15 minutes,
    ///   or refresh TTL does not exceed the access TTL
    pub fn validate(&self) -> Result<(), JwtError> {
        if self.secret.is_empty() {
            return Err(JwtError::Configuration(
                "signing secret must not be empty".to_string(),
            ));
        }

        if self.access_ttl < Duration::minutes(Self::MIN_ACCESS_TTL_MINUTES) {
            return Err(JwtError::Configuration(format!(
                "access token ttl must be at least {} minutes, got {} seconds",
                Self::MIN_ACCESS_TTL_MINUTES,
                self.access_ttl.num_seconds()
            )));
        }

        if self.refresh_ttl <= self.access_ttl {
            return Err(JwtError::Configuration(format!(
                "refresh token ttl ({}s) must be longer than access token ttl ({}s)",
                self.refresh_ttl.num_seconds(),
                self.access_ttl.num_seconds()
            )));
        }

        Ok(())
    }
}

/// Issues access and refresh tokens and validates refresh tokens.
///
/// Construction enforces the [`TokenConfig`] policy, so a live issuer never
/// signs with an empty secret or an out-of-policy lifetime.
pub struct TokenIssuer {
    handler: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer from validated configuration.
    ///
    /// # Errors
    /// * `Configuration` - Configuration violates the issuing policy
    pub fn new(config: TokenConfig) -> Result<Self, JwtError> {
        config.validate()?;

        Ok(Self {
            handler: JwtHandler::new(config.secret.as_bytes()),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        })
    }

    /// Issue a signed access token for a user.
    ///
    /// # Arguments
    /// * `user_id` - User identifier
    /// * `username` - Login name embedded in the token
    ///
    /// # Returns
    /// Signed token expiring `access_ttl` from now
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_access_token(&self, user_id: Uuid, username: &str) -> Result<String, JwtError> {
        let claims = AccessClaims::new(user_id, username, Utc::now() + self.access_ttl);
        self.handler.encode(&claims)
    }

    /// Issue a signed refresh token with a fresh random `token_hash`.
    ///
    /// The caller persists `token_hash`, `created_at` and `exp` from the returned
    /// claims against the user; the string goes to the client.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_refresh_token(&self, user_id: Uuid) -> Result<(String, RefreshClaims), JwtError> {
        let now = Utc::now();
        let claims = RefreshClaims::generate(user_id, now, now + self.refresh_ttl);
        let token = self.handler.encode(&claims)?;

        Ok((token, claims))
    }

    /// Validate a refresh token and extract its `token_hash`.
    ///
    /// Expiry is judged from the embedded `exp` claim against the current clock.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature or structure is wrong
    /// * `TokenExpired` - Signature is valid but `exp` has passed
    pub fn parse_refresh_token(&self, token: &str) -> Result<Uuid, JwtError> {
        let claims: RefreshClaims = self.handler.decode_ignoring_expiry(token)?;

        if claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims.token_hash)
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature or structure is wrong
    /// * `TokenExpired` - Token has expired
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.handler.decode(token)
    }
}
