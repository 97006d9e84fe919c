use crate::auth::{
    create_access_token, create_refresh_token, hash_password, hash_refresh_token,
    validate_access_token, validate_refresh_token, verify_password, ACCESS_TOKEN_TTL_SECS,
    REFRESH_TOKEN_TTL_SECS,
};
use crate::state::AppState;
use crate::web::api::middleware::AuthUser;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::{cookie::Cookie, CookieJar};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use ventry_common::validation::{all_present, is_valid_email};
use ventry_db::{is_unique_violation, ProfileUpdate, RefreshTokenRepo, UserRepo};

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Session cookie: HTTP-only, SameSite=Strict, scoped to the whole API.
fn session_cookie(
    name: &str,
    value: &str,
    max_age_secs: i64,
    secure: bool,
) -> Option<Cookie<'static>> {
    let mut raw = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        name, value, max_age_secs
    );
    if secure {
        raw.push_str("; Secure");
    }
    Cookie::parse(raw).ok()
}

/// Immediately-expiring cookie used to clear session state on logout.
/// SameSite relaxes to None behind HTTPS so cross-site frontends can
/// log out too.
fn clearing_cookie(name: &str, secure: bool) -> Option<Cookie<'static>> {
    let same_site = if secure { "None" } else { "Lax" };
    let mut raw = format!(
        "{}=; HttpOnly; SameSite={}; Path=/; Max-Age=0",
        name, same_site
    );
    if secure {
        raw.push_str("; Secure");
    }
    Cookie::parse(raw).ok()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "Something went wrong, please try again later."})),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// POST /api/auth/register
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if !all_present(&[
        req.username.as_deref(),
        req.email.as_deref(),
        req.password.as_deref(),
        req.first_name.as_deref(),
        req.last_name.as_deref(),
    ]) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "All fields are required."})),
        )
            .into_response();
    }

    // Presence validated above
    let username = req.username.as_deref().unwrap_or_default();
    let email = req.email.as_deref().unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();
    let first_name = req.first_name.as_deref().unwrap_or_default();
    let last_name = req.last_name.as_deref().unwrap_or_default();

    if !is_valid_email(email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid email format."})),
        )
            .into_response();
    }

    // One lookup covers both unique columns; a collision on either rejects
    match UserRepo::get_by_username_or_email(&state.pool, username, email).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({"error": "User already exists."})),
            )
                .into_response()
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("DB error during registration: {:#}", e);
            return internal_error();
        }
    }

    let password_hash = match hash_password(password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("Failed to hash password: {:#}", e);
            return internal_error();
        }
    };

    if let Err(e) = UserRepo::create(
        &state.pool,
        Uuid::new_v4(),
        username,
        email,
        &password_hash,
        first_name,
        last_name,
    )
    .await
    {
        // A concurrent registration can slip past the lookup; the unique
        // constraint settles the race
        if is_unique_violation(&e) {
            return (
                StatusCode::CONFLICT,
                Json(json!({"error": "User already exists."})),
            )
                .into_response();
        }
        tracing::error!("Failed to create user: {:#}", e);
        return internal_error();
    }

    (
        StatusCode::CREATED,
        Json(json!({"message": "User has been created."})),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login
///
/// Issues both tokens: the 15-minute access token and the 7-day refresh
/// token, each in its own HTTP-only cookie. The refresh token's digest is
/// recorded server-side so rotation and logout can revoke it.
#[tracing::instrument(skip(state, jar, req))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    if !all_present(&[req.username.as_deref(), req.password.as_deref()]) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Username and password are required."})),
        )
            .into_response();
    }
    let username = req.username.as_deref().unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();

    let user = match UserRepo::get_by_username(&state.pool, username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "User not found."})),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("DB error during login: {:#}", e);
            return internal_error();
        }
    };

    if !verify_password(password, &user.password_hash) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Incorrect username or password."})),
        )
            .into_response();
    }

    let auth_config = &state.config.auth;

    let access_token =
        match create_access_token(user.user_id, &user.username, &auth_config.access_secret) {
            Ok(t) => t,
            Err(e) => {
                tracing::error!("Failed to create access token: {:#}", e);
                return internal_error();
            }
        };

    let refresh_token =
        match create_refresh_token(user.user_id, &user.username, &auth_config.refresh_secret) {
            Ok(t) => t,
            Err(e) => {
                tracing::error!("Failed to create refresh token: {:#}", e);
                return internal_error();
            }
        };

    let expires_at = Utc::now() + Duration::seconds(REFRESH_TOKEN_TTL_SECS);
    if let Err(e) = RefreshTokenRepo::create(
        &state.pool,
        &hash_refresh_token(&refresh_token),
        user.user_id,
        expires_at,
    )
    .await
    {
        tracing::error!("Failed to store refresh token: {:#}", e);
        return internal_error();
    }

    let mut jar = jar;
    if let Some(cookie) = session_cookie(
        ACCESS_COOKIE,
        &access_token,
        ACCESS_TOKEN_TTL_SECS,
        auth_config.cookie_secure,
    ) {
        jar = jar.add(cookie);
    }
    if let Some(cookie) = session_cookie(
        REFRESH_COOKIE,
        &refresh_token,
        REFRESH_TOKEN_TTL_SECS,
        auth_config.cookie_secure,
    ) {
        jar = jar.add(cookie);
    }

    (jar, Json(user.into_user())).into_response()
}

/// GET /api/auth/check-session
#[tracing::instrument(skip(state, jar))]
pub async fn check_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> impl IntoResponse {
    let token = match jar.get(ACCESS_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Not authenticated."})),
            )
                .into_response()
        }
    };

    match validate_access_token(&token, &state.config.auth.access_secret) {
        Ok(claims) => Json(json!({
            "id": claims.sub,
            "username": claims.username,
        }))
        .into_response(),
        Err(_) => (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Access token is invalid or expired."})),
        )
            .into_response(),
    }
}

/// GET /api/auth/refresh
///
/// Rotation: the presented token's digest is deleted and a fresh pair is
/// issued, so replaying the old refresh token fails. The new access token
/// travels in the body, not a cookie -- the client keeps it in memory.
#[tracing::instrument(skip(state, jar))]
pub async fn refresh(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let raw_token = match jar.get(REFRESH_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Not authenticated."})),
            )
                .into_response()
        }
    };

    let auth_config = &state.config.auth;

    let claims = match validate_refresh_token(&raw_token, &auth_config.refresh_secret) {
        Ok(c) => c,
        Err(_) => {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"error": "Refresh token is invalid."})),
            )
                .into_response()
        }
    };

    let token_hash = hash_refresh_token(&raw_token);
    let token_row = match RefreshTokenRepo::get_by_hash(&state.pool, &token_hash).await {
        Ok(Some(row)) => row,
        Ok(None) => {
            // Signature is fine but the digest is gone: rotated away or
            // logged out
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"error": "Refresh token is invalid."})),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("DB error during refresh: {:#}", e);
            return internal_error();
        }
    };

    if token_row.expires_at < Utc::now() {
        if let Err(e) = RefreshTokenRepo::delete(&state.pool, &token_hash).await {
            tracing::error!("Failed to evict expired refresh token: {:#}", e);
            return internal_error();
        }
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Refresh token is invalid."})),
        )
            .into_response();
    }

    // Rotation: the old token must be retired before its successor exists.
    // If the delete fails the old digest would stay live alongside the new
    // one, so the whole request fails instead.
    if let Err(e) = RefreshTokenRepo::delete(&state.pool, &token_hash).await {
        tracing::error!("Failed to delete old refresh token: {:#}", e);
        return internal_error();
    }

    let access_token =
        match create_access_token(token_row.user_id, &claims.username, &auth_config.access_secret) {
            Ok(t) => t,
            Err(e) => {
                tracing::error!("Failed to create access token: {:#}", e);
                return internal_error();
            }
        };

    let new_refresh = match create_refresh_token(
        token_row.user_id,
        &claims.username,
        &auth_config.refresh_secret,
    ) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to create refresh token: {:#}", e);
            return internal_error();
        }
    };

    let expires_at = Utc::now() + Duration::seconds(REFRESH_TOKEN_TTL_SECS);
    if let Err(e) = RefreshTokenRepo::create(
        &state.pool,
        &hash_refresh_token(&new_refresh),
        token_row.user_id,
        expires_at,
    )
    .await
    {
        tracing::error!("Failed to store new refresh token: {:#}", e);
        return internal_error();
    }

    let mut jar = jar;
    if let Some(cookie) = session_cookie(
        REFRESH_COOKIE,
        &new_refresh,
        REFRESH_TOKEN_TTL_SECS,
        auth_config.cookie_secure,
    ) {
        jar = jar.add(cookie);
    }

    (jar, Json(json!({"accessToken": access_token}))).into_response()
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// PUT /api/auth/updateUser
#[tracing::instrument(skip(state, auth, req))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    let user_id = match auth.user_id() {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if !all_present(&[
        req.username.as_deref(),
        req.email.as_deref(),
        req.first_name.as_deref(),
        req.last_name.as_deref(),
    ]) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Required fields are missing."})),
        )
            .into_response();
    }

    let email = req.email.as_deref().unwrap_or_default();
    if !is_valid_email(email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid email format."})),
        )
            .into_response();
    }

    let update = ProfileUpdate {
        username: req.username.as_deref().unwrap_or_default(),
        email,
        first_name: req.first_name.as_deref().unwrap_or_default(),
        last_name: req.last_name.as_deref().unwrap_or_default(),
        phone_number: req.phone_number.as_deref(),
        address: req.address.as_deref(),
        city: req.city.as_deref(),
        state: req.state.as_deref(),
        country: req.country.as_deref(),
        profile_picture_url: req.profile_picture_url.as_deref(),
    };

    // Row count deliberately ignored: overwriting an already-identical
    // profile is still a success
    if let Err(e) = UserRepo::update_profile(&state.pool, user_id, &update).await {
        if is_unique_violation(&e) {
            return (
                StatusCode::CONFLICT,
                Json(json!({"error": "Username or email already taken."})),
            )
                .into_response();
        }
        tracing::error!("Failed to update user: {:#}", e);
        return internal_error();
    }

    Json(json!({"message": "User has been updated."})).into_response()
}

/// POST /api/auth/logout
///
/// Clears both session cookies unconditionally and revokes the presented
/// refresh token, if any.
#[tracing::instrument(skip(state, jar))]
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(REFRESH_COOKIE) {
        let token_hash = hash_refresh_token(cookie.value());
        if let Err(e) = RefreshTokenRepo::delete(&state.pool, &token_hash).await {
            tracing::error!("Failed to delete refresh token: {:#}", e);
            return internal_error();
        }
    }

    let secure = state.config.auth.cookie_secure;
    let mut jar = jar;
    if let Some(cookie) = clearing_cookie(ACCESS_COOKIE, secure) {
        jar = jar.add(cookie);
    }
    if let Some(cookie) = clearing_cookie(REFRESH_COOKIE, secure) {
        jar = jar.add(cookie);
    }

    (jar, Json(json!({"message": "Logged out successfully."}))).into_response()
}
