//! # 훈련 세션 모델 정의
//!
//! 여러 게임을 순서대로 묶은 훈련 플랜(TrainingSession)과
//! 플랜 안의 한 칸(SessionGame)을 정의합니다.
//!
//! ## 세션 흐름
//! 1. 방문자가 카탈로그에서 게임을 장바구니(cart)에 담음
//! 2. 로그인한 사용자가 장바구니를 이름 붙여 저장 → TrainingSession 생성,
//!    장바구니 순서대로 SessionGame 1..n 생성
//! 3. 이후 이름 변경, 게임 추가, 칸별 순서/시간 배율/메모 수정, 칸 삭제
//!
//! 같은 게임이 서로 다른 순서(position)로 여러 번 들어갈 수 있습니다.

use serde::{Deserialize, Serialize};

use super::GameDetail;

/// 시간 배율 허용 범위 (0.5 = 절반, 3.0 = 세 배)
pub const MIN_DURATION_MULTIPLIER: f64 = 0.5;
pub const MAX_DURATION_MULTIPLIER: f64 = 3.0;

/// 훈련 세션 엔티티: DB의 `training_sessions` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrainingSession {
    /// 세션 고유 식별자 (UUIDv7)
    pub id: String,
    /// 세션 이름 (예: "Beginner Dribbling Session")
    pub name: String,
    /// 세션 설명 (빈 문자열 허용)
    pub description: String,
    /// 소유자(사용자) ID. 다른 사용자에게는 존재하지 않는 것처럼 보입니다.
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

/// 세션 안의 한 칸: DB의 `session_games` 테이블 한 행
///
/// DB 컬럼 이름은 `position`이지만 JSON/템플릿에서는 `order`로 노출합니다.
/// (`ORDER`는 SQL 예약어이므로 컬럼 이름으로 쓰지 않습니다)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SessionGame {
    pub id: String,
    pub session_id: String,
    pub game_id: String,
    #[serde(rename = "order")]
    pub position: i64,
    pub duration_multiplier: f64,
    pub notes: String,
}

impl SessionGame {
    /// 이 칸의 실제 소요 시간(분) = 게임 시간 × 배율
    pub fn scaled_minutes(&self, game_minutes: u32) -> f64 {
        f64::from(game_minutes) * self.duration_multiplier
    }
}

/// 게임 정보가 채워진 세션 칸
#[derive(Debug, Clone, Serialize)]
pub struct SessionEntry {
    #[serde(flatten)]
    pub entry: SessionGame,
    pub game: GameDetail,
    /// 배율이 적용된 소요 시간(분)
    pub minutes: f64,
}

/// 세션 상세: 세션 + 순서대로 정렬된 칸 목록 + 총 소요 시간
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSessionDetail {
    #[serde(flatten)]
    pub session: TrainingSession,
    pub games: Vec<SessionEntry>,
    pub total_duration: u32,
}

/// 총 소요 시간(분). 칸별 (게임 시간 × 배율)을 더한 뒤 반올림합니다.
pub fn total_minutes<I>(entries: I) -> u32
where
    I: IntoIterator<Item = (u32, f64)>,
{
    let total: f64 = entries
        .into_iter()
        .map(|(minutes, multiplier)| f64::from(minutes) * multiplier)
        .sum();
    total.round().max(0.0) as u32
}

/// 세션 생성 요청: `POST /api/v1/sessions`
///
/// `game_ids` 순서대로 1부터 position이 매겨집니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub game_ids: Vec<String>,
}

/// 세션 수정 요청: `PATCH /api/v1/sessions/{id}`
#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// 세션에 게임 추가 요청: `POST /api/v1/sessions/{id}/games`
///
/// `order`가 없으면 마지막 칸 다음 번호가 부여됩니다.
#[derive(Debug, Deserialize)]
pub struct AddSessionGameRequest {
    pub game_id: String,
    pub order: Option<i64>,
    pub duration_multiplier: Option<f64>,
    pub notes: Option<String>,
}

/// 세션 칸 수정 요청: `PATCH /api/v1/sessions/{id}/games/{entry_id}`
#[derive(Debug, Deserialize)]
pub struct UpdateSessionGameRequest {
    pub order: Option<i64>,
    pub duration_multiplier: Option<f64>,
    pub notes: Option<String>,
}
