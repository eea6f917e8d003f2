use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::RepositoryError;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::RefreshToken;
use crate::domain::auth::models::TokenHash;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::models::Username;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `credentials` - Validated username and plaintext password
    ///
    /// # Returns
    /// Identifier of the created user
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Username is already taken
    /// * `Repository` - Storage operation failed
    /// * `Internal` - Password hashing failed
    async fn register(&self, credentials: Credentials) -> Result<UserId, AuthError>;

    /// Verify credentials and open a session.
    ///
    /// # Arguments
    /// * `credentials` - Validated username and plaintext password
    ///
    /// # Returns
    /// Fresh access and refresh tokens; the refresh record is durably stored
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this username
    /// * `InvalidCredentials` - Password does not match
    /// * `Repository` - Storage operation failed
    /// * `Internal` - Hashing or token signing failed
    async fn login(&self, credentials: Credentials) -> Result<TokenPair, AuthError>;

    /// Redeem a refresh token for a new token pair, rotating it in place.
    ///
    /// # Arguments
    /// * `refresh_token` - Signed refresh token string
    ///
    /// # Returns
    /// New access and refresh tokens; the redeemed token no longer validates
    ///
    /// # Errors
    /// * `InvalidToken` - Signature or structure is wrong
    /// * `TokenExpired` - Embedded expiry has passed
    /// * `TokenNotFound` - Token was already rotated or never issued
    /// * `Repository` - Storage operation failed
    /// * `Internal` - Token signing failed
    async fn refresh_session(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;
}

/// Persistence operations for user credentials.
#[async_trait]
pub trait CredentialRepository: Send + Sync + 'static {
    /// Check whether a username is taken.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn exists_by_username(&self, username: &Username) -> Result<bool, RepositoryError>;

    /// Persist new user to storage.
    ///
    /// # Arguments
    /// * `user` - User entity to create
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `AlreadyExists` - Username is already taken
    /// * `Database` - Database operation failed
    async fn create(&self, user: User) -> Result<User, RepositoryError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError>;
}

/// Persistence operations for refresh-token records.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a new refresh-token record.
    ///
    /// # Errors
    /// * `AlreadyExists` - Token hash is already stored
    /// * `Database` - Database operation failed
    async fn save(&self, token: RefreshToken) -> Result<(), RepositoryError>;

    /// Check whether a record with this token hash exists.
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn exists_by_hash(&self, token_hash: &TokenHash) -> Result<bool, RepositoryError>;

    /// Rotate a record in place.
    ///
    /// Replaces the hash, expiry and creation time of the row currently keyed by
    /// `token_hash` in a single atomic update. Of two concurrent rotations of the
    /// same hash, exactly one succeeds.
    ///
    /// # Arguments
    /// * `token_hash` - Hash of the token being redeemed
    /// * `replacement` - New hash, expiry and creation time
    ///
    /// # Errors
    /// * `NotFound` - No row carries `token_hash` (already rotated or never issued)
    /// * `AlreadyExists` - Replacement hash collides with a stored one
    /// * `Database` - Database operation failed
    async fn update_by_hash(
        &self,
        token_hash: &TokenHash,
        replacement: &RefreshToken,
    ) -> Result<(), RepositoryError>;

    /// Resolve the user owning a refresh-token record.
    ///
    /// # Returns
    /// Optional user entity (None if no record carries the hash)
    ///
    /// # Errors
    /// * `Database` - Database operation failed
    async fn find_user_by_token_hash(
        &self,
        token_hash: &TokenHash,
    ) -> Result<Option<User>, RepositoryError>;
}
