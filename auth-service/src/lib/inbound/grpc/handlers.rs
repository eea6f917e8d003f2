use tonic::Status;

use crate::domain::auth::errors::AuthError;

pub mod login;
pub mod refresh_session;
pub mod register;

impl From<AuthError> for Status {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(e) => Status::invalid_argument(e.to_string()),
            AuthError::UserAlreadyExists(_) => Status::already_exists("user already exists"),
            AuthError::UserNotFound(_) => Status::not_found("user not found"),
            AuthError::TokenNotFound => Status::not_found("token not found"),
            AuthError::InvalidCredentials => Status::unauthenticated("invalid credentials"),
            AuthError::InvalidToken(_) => Status::unauthenticated("invalid token"),
            AuthError::TokenExpired => Status::unauthenticated("token expired"),
            AuthError::Configuration(_)
            | AuthError::Repository { .. }
            | AuthError::Internal { .. } => {
                tracing::error!(error = %err, "Request failed");
                Status::internal("internal error")
            }
        }
    }
}
