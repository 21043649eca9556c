//! 사용자 계정과 API 인증 요청/응답
//!
//! 코치는 로그인해야 훈련 세션을 저장할 수 있고, `is_staff` 계정만
//! 카탈로그와 제안 검토를 관리합니다.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// API 응답용 사용자 정보 (비밀번호 해시 제외)
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub is_staff: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            is_staff: user.is_staff,
            created_at: user.created_at,
        }
    }
}

/// 저장된 refresh 토큰 한 행. 토큰 원문이 아니라 SHA-256 해시만 보관합니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshToken {
    pub user_id: String,
    /// `%Y-%m-%dT%H:%M:%S%.3fZ` (UTC)
    pub expires_at: String,
}

/// `POST /api/v1/users` (관리자)
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    #[serde(default)]
    pub is_staff: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// 로그인/갱신 응답. refresh 토큰은 한 번 쓰면 새 토큰으로 바뀝니다.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}
