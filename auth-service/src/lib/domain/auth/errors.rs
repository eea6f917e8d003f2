use std::time::Duration;

use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("username is required")]
    Empty,
}

/// Error for login/registration input validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error(transparent)]
    Username(#[from] UsernameError),

    #[error("password is required")]
    EmptyPassword,
}

/// Error for repository operations.
///
/// Adapters translate storage failures into these kinds; the service decides
/// what each one means for the operation in progress.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record already exists: {0}")]
    AlreadyExists(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Database error: {0}")]
    Database(String),
}

/// Top-level error for all authentication operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Input validation errors
    #[error("Invalid argument: {0}")]
    Validation(#[from] CredentialsError),

    // Domain-level errors
    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Refresh token not found")]
    TokenNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    TokenExpired,

    // Infrastructure errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{operation}: {source}")]
    Repository {
        operation: &'static str,
        source: RepositoryError,
    },

    #[error("{operation}: {message}")]
    Internal {
        operation: &'static str,
        message: String,
    },
}

impl AuthError {
    pub fn repository(operation: &'static str, source: RepositoryError) -> Self {
        AuthError::Repository { operation, source }
    }

    pub fn internal(operation: &'static str, message: impl ToString) -> Self {
        AuthError::Internal {
            operation,
            message: message.to_string(),
        }
    }
}
