//! Authentication utilities library
//!
//! Provides the credential and token primitives behind the auth service:
//! - Password hashing (Argon2id)
//! - JWT access-token issuance
//! - JWT refresh-token issuance and validation
//!
//! Persistence and business rules (uniqueness, rotation) live in the service;
//! this crate holds no state beyond its signing key.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenConfig, TokenIssuer};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let config = TokenConfig::new(
//!     "secret_key_at_least_32_bytes_long!",
//!     Duration::minutes(15),
//!     Duration::days(30),
//! );
//! let issuer = TokenIssuer::new(config).unwrap();
//!
//! let user_id = Uuid::new_v4();
//! let access_token = issuer.issue_access_token(user_id, "alice").unwrap();
//! let (refresh_token, claims) = issuer.issue_refresh_token(user_id).unwrap();
//!
//! assert!(!access_token.is_empty());
//! assert_eq!(issuer.parse_refresh_token(&refresh_token).unwrap(), claims.token_hash);
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::RefreshClaims;
pub use jwt::TokenConfig;
pub use jwt::TokenIssuer;
pub use password::PasswordError;
pub use password::PasswordHasher;
