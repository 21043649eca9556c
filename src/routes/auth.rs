//! # API 인증 핸들러
//!
//! 브라우저는 세션 쿠키로 로그인하지만(`routes::account`), 스크립트나 앱 같은
//! API 클라이언트는 JWT를 씁니다.
//!
//! - `POST /api/v1/auth/login`   → access 토큰(15분) + refresh 토큰(7일)
//! - `POST /api/v1/auth/refresh` → refresh 토큰을 새 쌍으로 교환 (이전 토큰은 폐기)
//! - `POST /api/v1/auth/logout`  → 이 사용자의 refresh 토큰 전부 폐기
//! - `GET  /api/v1/auth/me`      → 현재 사용자

use axum::{extract::State, Json};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde_json::{json, Value};

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::{
        create_access_token, create_refresh_token, hash_token, verify_password, verify_token, AuthUser,
        TokenKind,
    },
    models::user::*,
    routes::AppState,
};

const REFRESH_TTL_DAYS: i64 = 7;
const EXPIRY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

fn token_error(e: jsonwebtoken::errors::Error) -> AppError {
    AppError::Internal(format!("Token generation failed: {e}"))
}

fn parse_expiry(raw: &str) -> Result<DateTime<Utc>, AppError> {
    NaiveDateTime::parse_from_str(raw, EXPIRY_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| AppError::Internal(format!("Stored refresh token has a bad expiry: {e}")))
}

/// 새 토큰 쌍을 만들고 refresh 토큰의 해시를 저장합니다.
async fn issue_pair(state: &AppState, user: User) -> Result<TokenPair, AppError> {
    let secret = &state.config.secret_key;
    let access_token = create_access_token(&user.id, secret).map_err(token_error)?;
    let refresh_token = create_refresh_token(&user.id, secret).map_err(token_error)?;

    let expires_at = (Utc::now() + Duration::days(REFRESH_TTL_DAYS))
        .format(EXPIRY_FORMAT)
        .to_string();
    db_users::store_refresh_token(&state.pool, &user.id, &hash_token(&refresh_token), &expires_at)
        .await?;

    Ok(TokenPair {
        user: user.into(),
        access_token,
        refresh_token,
    })
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let user = match db_users::find_by_username(&state.pool, req.username.trim()).await? {
        Some(user) if verify_password(&req.password, &user.password_hash)? => user,
        _ => {
            tracing::warn!(username = %req.username, "Failed API login attempt");
            return Err(AppError::Unauthorized("Invalid username or password".to_string()));
        }
    };

    tracing::info!(user = %user.username, "API login");
    Ok(Json(issue_pair(&state, user).await?))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let revoked = || AppError::Unauthorized("Refresh token not found or revoked".to_string());

    verify_token(&req.refresh_token, &state.config.secret_key, TokenKind::Refresh)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    // 꺼내는 순간 폐기되므로 만료 여부와 상관없이 재사용은 불가능합니다.
    let stored = db_users::take_refresh_token(&state.pool, &hash_token(&req.refresh_token))
        .await?
        .ok_or_else(revoked)?;
    if parse_expiry(&stored.expires_at)? < Utc::now() {
        return Err(AppError::Unauthorized("Refresh token expired".to_string()));
    }

    let user = db_users::find_by_id(&state.pool, &stored.user_id)
        .await?
        .ok_or_else(revoked)?;
    tracing::debug!(user = %user.username, "Refresh token rotated");
    Ok(Json(issue_pair(&state, user).await?))
}

pub async fn logout(State(state): State<AppState>, user: AuthUser) -> Result<Json<Value>, AppError> {
    let revoked = db_users::revoke_refresh_tokens(&state.pool, &user.user_id).await?;
    tracing::info!(user = %user.username, revoked, "API logout");
    Ok(Json(json!({ "message": "Logged out successfully" })))
}

pub async fn me(State(state): State<AppState>, user: AuthUser) -> Result<Json<UserResponse>, AppError> {
    db_users::find_by_id(&state.pool, &user.user_id)
        .await?
        .map(|user| Json(user.into()))
        .ok_or(AppError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_round_trips_through_storage_format() {
        let now = Utc::now();
        let stored = now.format(EXPIRY_FORMAT).to_string();
        let parsed = parse_expiry(&stored).unwrap();
        assert!((parsed - now).num_milliseconds().abs() <= 1);
        assert!(parse_expiry("yesterday").is_err());
    }
}
