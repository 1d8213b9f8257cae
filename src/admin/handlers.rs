use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    admin::{
        dto::{AdminActionRequest, BalanceUpdated, UpdateBalanceResponse, UserListResponse},
        extractors::AdminGuard,
    },
    error::{method_not_allowed, ApiError, ApiResult},
    extract::JsonBody,
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new().route(
        "/admin",
        get(list_users)
            .post(admin_action)
            .fallback(method_not_allowed),
    )
}

#[instrument(skip(state, _guard))]
pub async fn list_users(
    State(state): State<AppState>,
    _guard: AdminGuard,
) -> ApiResult<Json<UserListResponse>> {
    let users = state.users.list().await.map_err(|e| {
        error!(error = %format!("{e:#}"), "list users failed");
        ApiError::internal("Failed to list users", e)
    })?;
    Ok(Json(UserListResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state, _guard, payload))]
pub async fn admin_action(
    State(state): State<AppState>,
    _guard: AdminGuard,
    JsonBody(payload): JsonBody<AdminActionRequest>,
) -> ApiResult<Json<UpdateBalanceResponse>> {
    match payload.action.as_deref() {
        Some("update_balance") => update_balance(&state, payload.user_id, payload.new_balance).await,
        other => {
            warn!(action = ?other, "invalid admin action");
            Err(ApiError::bad_request("Invalid action"))
        }
    }
}

async fn update_balance(
    state: &AppState,
    user_id: Option<i64>,
    new_balance: Option<i64>,
) -> ApiResult<Json<UpdateBalanceResponse>> {
    let (Some(user_id), Some(new_balance)) = (user_id.filter(|id| *id != 0), new_balance) else {
        return Err(ApiError::bad_request("user_id and new_balance required"));
    };

    if new_balance < 0 {
        return Err(ApiError::bad_request("new_balance must be non-negative"));
    }
    let new_balance = i32::try_from(new_balance)
        .map_err(|_| ApiError::bad_request("new_balance out of range"))?;

    let user = state
        .users
        .set_balance(user_id, new_balance)
        .await
        .map_err(|e| {
            error!(error = %format!("{e:#}"), user_id, "set balance failed");
            ApiError::internal("Failed to update balance", e)
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(user_id, new_balance, "balance overwritten by admin");
    Ok(Json(UpdateBalanceResponse {
        success: true,
        user: BalanceUpdated {
            id: user.id,
            email: user.email,
            energy_balance: user.energy_balance,
        },
    }))
}
