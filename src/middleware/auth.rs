//! # 인증 추출기와 토큰/비밀번호 유틸리티
//!
//! 현재 사용자는 `Authorization: Bearer` JWT 또는 로그인 세션의 `user_id`로 찾습니다.
//! - `AuthUser`: 인증 필수 (JSON 401)
//! - `Option<AuthUser>`: 익명 허용
//! - `StaffUser`: 관리자 전용 (403)
//! - `LoginRequired`: HTML 페이지용, 로그인 페이지로 리다이렉트

use std::convert::Infallible;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use tower_sessions::Session;

use crate::{db::users as db_users, error::AppError, models::User, routes::AppState};

pub const USER_SESSION_KEY: &str = "user_id";

/// access 토큰만 `Authorization` 헤더로 받고, refresh 토큰은 `/auth/refresh`에서만 받습니다.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: i64,
    pub iat: i64,
    /// 같은 초에 발급된 토큰끼리도 서로 다르게 만드는 고유 ID
    #[serde(default)]
    pub jti: String,
    pub typ: TokenKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub is_staff: bool,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        AuthUser {
            user_id: user.id,
            username: user.username,
            is_staff: user.is_staff,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // API 클라이언트는 Bearer 토큰, 브라우저는 로그인 세션
        let user_id = match parts.headers.get(AUTHORIZATION) {
            Some(value) => {
                let token = value
                    .to_str()
                    .ok()
                    .and_then(|header| header.strip_prefix("Bearer "))
                    .ok_or(AuthError::InvalidToken)?;
                verify_access_token(token, &state.config.secret_key)?.sub
            }
            None => session_user_id(parts, state)
                .await?
                .ok_or(AuthError::MissingToken)?,
        };

        let user = db_users::find_by_id(&state.pool, &user_id)
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?
            .ok_or(AuthError::InvalidToken)?;

        Ok(user.into())
    }
}

async fn session_user_id(parts: &mut Parts, state: &AppState) -> Result<Option<String>, AuthError> {
    let Ok(session) = <Session as FromRequestParts<AppState>>::from_request_parts(parts, state).await else {
        return Ok(None);
    };
    session
        .get::<String>(USER_SESSION_KEY)
        .await
        .map_err(|e| AuthError::Unavailable(e.to_string()))
}

/// 관리자(is_staff) 전용 엔드포인트용
#[derive(Debug, Clone)]
pub struct StaffUser(pub AuthUser);

impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await?;
        if !user.is_staff {
            return Err(AuthError::Forbidden);
        }
        Ok(StaffUser(user))
    }
}

/// 익명 방문자도 허용하는 핸들러용. 인증 정보가 없거나 잘못되면 None
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await {
            Ok(user) => Ok(Some(user)),
            Err(AuthError::Unavailable(e)) => {
                tracing::warn!("Could not resolve current user: {}", e);
                Ok(None)
            }
            Err(_) => Ok(None),
        }
    }
}

/// HTML 페이지용. 로그인하지 않았으면 `/login?next=<현재 경로>`로 보냅니다.
#[derive(Debug, Clone)]
pub struct LoginRequired(pub AuthUser);

impl FromRequestParts<AppState> for LoginRequired {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await {
            Ok(user) => Ok(LoginRequired(user)),
            Err(AuthError::Unavailable(e)) => {
                Err(AppError::Internal(format!("Could not resolve current user: {e}")).into_response())
            }
            Err(_) => {
                let next = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/");
                Err(Redirect::to(&login_url(next)).into_response())
            }
        }
    }
}

pub fn login_url(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("/login?next={encoded}")
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    Forbidden,
    Unavailable(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authentication credentials were not provided",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid authorization token",
            ),
            AuthError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "expired_token",
                "Authorization token has expired",
            ),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                "forbidden",
                "Staff permissions are required",
            ),
            AuthError::Unavailable(e) => {
                return AppError::Internal(format!("Could not resolve current user: {e}")).into_response();
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn create_token(
    user_id: &str,
    secret: &str,
    typ: TokenKind,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        jti: uuid::Uuid::now_v7().to_string(),
        typ,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn create_access_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(user_id, secret, TokenKind::Access, Duration::minutes(15))
}

pub fn create_refresh_token(
    user_id: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    create_token(user_id, secret, TokenKind::Refresh, Duration::days(7))
}

/// 서명과 만료를 확인하고, 토큰 종류가 `expected`가 아니면 거부합니다.
pub fn verify_token(token: &str, secret: &str, expected: TokenKind) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    if token_data.claims.typ != expected {
        return Err(AuthError::InvalidToken);
    }
    Ok(token_data.claims)
}

pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    verify_token(token, secret, TokenKind::Access)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Argon2id 해시
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
