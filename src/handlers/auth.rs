use axum::{
    extract::{Json, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    handlers::AppState,
    models::user::{AuthResponse, LoginRequest, User},
};

/// JWT claims for an authenticated session
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub name: String,
    pub exp: i64,
}

pub fn issue_token(user: &User, secret: &str, expiration_hours: i64) -> Result<String> {
    let expires_at = Utc::now() + Duration::hours(expiration_hours);
    let claims = Claims {
        sub: user.id,
        name: user.name.clone(),
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to issue token: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Auth("Invalid or expired token".to_string()))
}

/// Handler for credential login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let user = state
        .user_store
        .verify_credentials(&request.username, &request.password)
        .await?;

    let token = issue_token(&user, &state.jwt_secret, state.jwt_expiration_hours)?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok((
        StatusCode::OK,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Middleware gating every data route: the request proceeds only with a
/// valid bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Auth("Missing bearer token".to_string()))?;

    verify_token(token, &state.jwt_secret)?;

    Ok(next.run(request).await)
}
