use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

pub const ADMIN_EMAIL_HEADER: &str = "x-admin-email";

/// Passes only when `X-Admin-Email` equals the configured admin email.
pub struct AdminGuard;

#[async_trait]
impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(ADMIN_EMAIL_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();

        if !state.config.is_admin_email(presented) {
            warn!(presented = %presented, "admin access denied");
            return Err(ApiError::Forbidden("Access denied".into()));
        }
        Ok(AdminGuard)
    }
}
