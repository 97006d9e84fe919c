use crate::auth::{validate_access_token, TokenError};
use crate::state::AppState;
use crate::web::api::auth::ACCESS_COOKIE;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use ventry_common::models::auth::Claims;

/// Extractor resolving the caller's identity from the `access_token`
/// cookie, once, at the transport boundary. Handlers take it as an
/// explicit parameter; no business logic reads cookies itself.
///
/// Rejections: 401 when the cookie is missing or the token expired,
/// 403 when the token fails signature/structure checks.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The authenticated user's id from the token's subject claim.
    pub fn user_id(&self) -> Result<Uuid, Response> {
        self.0.sub.parse().map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Invalid user ID in token"})),
            )
                .into_response()
        })
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = match jar.get(ACCESS_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => {
                return Err((
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Not authenticated."})),
                )
                    .into_response())
            }
        };

        match validate_access_token(&token, &state.config.auth.access_secret) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(TokenError::Expired) => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Token has expired."})),
            )
                .into_response()),
            Err(TokenError::Invalid) => Err((
                StatusCode::FORBIDDEN,
                Json(json!({"error": "Invalid token."})),
            )
                .into_response()),
        }
    }
}
