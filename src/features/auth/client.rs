//! Client wrappers for the login and registration endpoints. Passwords are only
//! exposed while the request body is serialized and are never logged.

use crate::{
    errors::AppError,
    features::auth::types::{AuthResponse, LoginRequest, RegisterRequest},
    session::api::ApiClient,
};
use tracing::instrument;

/// # Errors
/// Returns the API error for rejected credentials or transport failures.
#[instrument(skip_all)]
pub async fn login(api: &ApiClient, request: &LoginRequest<'_>) -> Result<AuthResponse, AppError> {
    api.post_json("/api/login", request).await
}

/// # Errors
/// Returns the API error for duplicate accounts or transport failures.
#[instrument(skip_all)]
pub async fn register(
    api: &ApiClient,
    request: &RegisterRequest<'_>,
) -> Result<AuthResponse, AppError> {
    api.post_json("/api/register", request).await
}
