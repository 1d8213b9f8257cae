use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthActionRequest, AuthResponse, Credentials, PublicUser, RefreshRequest},
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, is_legacy_hash, verify_password},
    },
    config::normalize_email,
    error::{method_not_allowed, ApiError, ApiResult},
    extract::JsonBody,
    state::AppState,
    users::{NewUser, User, STARTING_ENERGY},
};

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth", post(dispatch).fallback(method_not_allowed))
        .route("/auth/register", post(register_route).fallback(method_not_allowed))
        .route("/auth/login", post(login_route).fallback(method_not_allowed))
        .route("/auth/refresh", post(refresh).fallback(method_not_allowed))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).fallback(method_not_allowed))
}

/// `POST /auth {action, email, password}`, the single-endpoint contract the frontend uses.
#[instrument(skip(state, payload))]
pub async fn dispatch(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<AuthActionRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let creds = normalize(payload.credentials)?;
    match payload.action.as_deref() {
        Some("register") => register(&state, creds).await,
        Some("login") => login(&state, creds).await,
        other => {
            warn!(action = ?other, "invalid auth action");
            Err(ApiError::bad_request("Invalid action"))
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn register_route(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Credentials>,
) -> ApiResult<Json<AuthResponse>> {
    register(&state, normalize(payload)?).await
}

#[instrument(skip(state, payload))]
pub async fn login_route(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Credentials>,
) -> ApiResult<Json<AuthResponse>> {
    login(&state, normalize(payload)?).await
}

fn normalize(mut creds: Credentials) -> ApiResult<Credentials> {
    creds.email = normalize_email(&creds.email);
    if creds.email.is_empty() || creds.password.is_empty() {
        return Err(ApiError::bad_request("Email and password required"));
    }
    Ok(creds)
}

async fn register(state: &AppState, creds: Credentials) -> ApiResult<Json<AuthResponse>> {
    if !is_valid_email(&creds.email) {
        warn!(email = %creds.email, "invalid email");
        return Err(ApiError::bad_request("Invalid email"));
    }

    if creds.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::bad_request("Password too short"));
    }

    let hash = hash_password(&creds.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::internal("Registration failed", e)
    })?;

    let new = NewUser {
        email: &creds.email,
        password_hash: &hash,
        energy_balance: STARTING_ENERGY,
        is_admin: state.config.is_admin_email(&creds.email),
    };
    let user = match state.users.create(new).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %creds.email, "email already registered");
            return Err(ApiError::bad_request("User already exists"));
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "create user failed");
            return Err(ApiError::internal("Registration failed", e));
        }
    };

    info!(user_id = user.id, email = %user.email, "user registered");
    issue_tokens(state, user)
}

async fn login(state: &AppState, creds: Credentials) -> ApiResult<Json<AuthResponse>> {
    let user = match state.users.find_by_email(&creds.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %creds.email, "login unknown email");
            return Err(ApiError::Unauthorized("Invalid credentials".into()));
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "find_by_email failed");
            return Err(ApiError::internal("Login failed", e));
        }
    };

    let ok = verify_password(&creds.password, &user.password_hash).map_err(|e| {
        error!(error = %e, user_id = user.id, "verify_password failed");
        ApiError::internal("Login failed", e)
    })?;

    if !ok {
        warn!(email = %creds.email, user_id = user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    if is_legacy_hash(&user.password_hash) {
        upgrade_legacy_hash(state, user.id, &creds.password).await;
    }

    info!(user_id = user.id, email = %user.email, "user logged in");
    issue_tokens(state, user)
}

/// Re-hashes a SHA-256 password with Argon2. Failure only costs the upgrade.
async fn upgrade_legacy_hash(state: &AppState, user_id: i64, password: &str) {
    let hash = match hash_password(password) {
        Ok(h) => h,
        Err(e) => {
            warn!(error = %e, user_id, "legacy hash upgrade: hashing failed");
            return;
        }
    };
    match state.users.update_password_hash(user_id, &hash).await {
        Ok(()) => info!(user_id, "upgraded legacy password hash"),
        Err(e) => warn!(error = %format!("{e:#}"), user_id, "legacy hash upgrade: update failed"),
    }
}

fn issue_tokens(state: &AppState, user: User) -> ApiResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(state);
    let session_token = keys.sign_access(user.id).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        ApiError::internal("Token issue failed", e)
    })?;
    let refresh_token = keys.sign_refresh(user.id).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        ApiError::internal("Token issue failed", e)
    })?;

    Ok(Json(AuthResponse {
        success: true,
        user: user.into(),
        session_token,
        refresh_token,
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RefreshRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        ApiError::Unauthorized("Invalid or expired token".into())
    })?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await
        .map_err(|e| ApiError::internal("Refresh failed", e))?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    issue_tokens(&state, user)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<PublicUser>> {
    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| {
            error!(error = %format!("{e:#}"), user_id, "load user failed");
            ApiError::internal("Internal error", e)
        })?
        .ok_or_else(|| {
            warn!(user_id, "token for missing user");
            ApiError::Unauthorized("User not found".into())
        })?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        let creds = normalize(Credentials {
            email: "  Foo@Example.COM ".into(),
            password: "pw".into(),
        })
        .unwrap();
        assert_eq!(creds.email, "foo@example.com");
    }

    #[test]
    fn normalize_requires_both_fields() {
        let err = normalize(Credentials {
            email: "   ".into(),
            password: "secret123".into(),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Email and password required");

        let err = normalize(Credentials {
            email: "a@b.co".into(),
            password: String::new(),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Email and password required");
    }

    #[test]
    fn public_user_serialization_hides_hash() {
        let user = PublicUser {
            id: 3,
            email: "test@example.com".to_string(),
            energy_balance: 100,
            is_admin: false,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "test@example.com");
        assert_eq!(json["energy_balance"], 100);
        assert!(json.get("password_hash").is_none());
    }
}
