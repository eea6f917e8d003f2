use std::sync::Arc;

use tonic::Status;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::ports::AuthServicePort;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

pub async fn register<S: AuthServicePort>(
    service: Arc<S>,
    request: RegisterRequest,
) -> Result<RegisterResponse, Status> {
    let credentials =
        Credentials::new(request.username, request.password).map_err(AuthError::from)?;

    let user_id = service.register(credentials).await?;
    tracing::debug!(user_id = %user_id, "Register request served");

    Ok(RegisterResponse {
        message: "success".to_string(),
    })
}
