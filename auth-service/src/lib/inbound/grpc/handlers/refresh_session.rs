use std::sync::Arc;

use tonic::Status;

use crate::domain::auth::ports::AuthServicePort;
use crate::proto::RefreshSessionRequest;
use crate::proto::RefreshSessionResponse;

pub async fn refresh_session<S: AuthServicePort>(
    service: Arc<S>,
    request: RefreshSessionRequest,
) -> Result<RefreshSessionResponse, Status> {
    if request.refresh_token.is_empty() {
        return Err(Status::invalid_argument("refresh token is required"));
    }

    let tokens = service.refresh_session(&request.refresh_token).await?;

    Ok(RefreshSessionResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
    })
}
