use axum::{extract::State, routing::post, Json, Router};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::jwt::MaybeAuthUser,
    error::{method_not_allowed, ApiError, ApiResult},
    extract::JsonBody,
    sites::dto::{GenerateSiteRequest, GenerateSiteResponse},
    state::AppState,
    users::{Debit, GENERATION_COST},
};

const MAX_PROMPT_CHARS: usize = 4000;

pub fn site_routes() -> Router<AppState> {
    Router::new().route(
        "/generate-site",
        post(generate_site).fallback(method_not_allowed),
    )
}

#[instrument(skip(state, token_user, payload))]
pub async fn generate_site(
    State(state): State<AppState>,
    token_user: MaybeAuthUser,
    JsonBody(payload): JsonBody<GenerateSiteRequest>,
) -> ApiResult<Json<GenerateSiteResponse>> {
    let prompt = payload.prompt.trim();
    let Some(user_id) = payload.user_id.filter(|id| *id != 0) else {
        return Err(ApiError::bad_request("user_id and prompt required"));
    };
    if prompt.is_empty() {
        return Err(ApiError::bad_request("user_id and prompt required"));
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        return Err(ApiError::bad_request("Prompt too long"));
    }

    if let MaybeAuthUser(Some(sub)) = token_user {
        if sub != user_id {
            warn!(user_id, token_sub = sub, "token does not match user_id");
            return Err(ApiError::Forbidden("Token does not match user".into()));
        }
    }

    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| {
            error!(error = %format!("{e:#}"), user_id, "load user failed");
            ApiError::internal("Generation failed", e)
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    if user.energy_balance < GENERATION_COST {
        warn!(user_id, balance = user.energy_balance, "not enough energy");
        return Err(ApiError::InsufficientEnergy {
            required: GENERATION_COST,
            current: user.energy_balance,
        });
    }

    let html = state.generator.generate(prompt).await.map_err(|e| {
        error!(error = %format!("{e:#}"), user_id, generator = state.generator.name(), "generation failed");
        ApiError::internal("Generation failed", e)
    })?;

    let remaining = match state.users.debit(user_id, GENERATION_COST).await {
        Ok(Debit::Applied { remaining }) => remaining,
        Ok(Debit::Insufficient { current }) => {
            warn!(user_id, balance = current, "balance spent concurrently");
            return Err(ApiError::InsufficientEnergy {
                required: GENERATION_COST,
                current,
            });
        }
        Ok(Debit::Missing) => return Err(ApiError::NotFound("User not found".into())),
        Err(e) => {
            error!(error = %format!("{e:#}"), user_id, "debit failed");
            return Err(ApiError::internal("Generation failed", e));
        }
    };

    info!(
        user_id,
        generator = state.generator.name(),
        bytes = html.len(),
        remaining,
        "site generated"
    );
    Ok(Json(GenerateSiteResponse {
        success: true,
        html,
        energy_used: GENERATION_COST,
        energy_remaining: remaining,
    }))
}
