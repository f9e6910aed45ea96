use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use fieldkit_core::AppError;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the caller named by the identity proxy header and exposes it to
/// handlers as a `UserIdentity` extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let username = request
        .headers()
        .get(state.auth_user_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?
        .to_owned();

    let identity = state
        .user_directory
        .find_by_username(username.as_str())
        .await?
        .ok_or_else(|| {
            debug!(%username, "rejecting unknown authenticated user");
            AppError::Unauthorized("authentication required".to_owned())
        })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
