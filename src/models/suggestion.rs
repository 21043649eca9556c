//! # 게임 제안 모델 정의
//!
//! 방문자가 제안한 게임은 숨겨진 상태(`is_suggestion = 1`)로 저장되고,
//! 관리자가 검토(review)한 뒤에만 공개 카탈로그에 나타납니다.
//!
//! ```text
//! pending ──approve──▶ approved (게임 공개)
//!    │                     │
//!    └──reject──▶ rejected ◀┘ (다시 숨김)
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 제안 검토 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SuggestionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Approved => "approved",
            SuggestionStatus::Rejected => "rejected",
        }
    }

    /// 이 상태일 때 게임의 (is_suggestion, approved) 플래그
    ///
    /// 승인된 게임만 공개 카탈로그에 들어갑니다.
    pub fn game_flags(self) -> (bool, bool) {
        match self {
            SuggestionStatus::Approved => (false, true),
            SuggestionStatus::Pending | SuggestionStatus::Rejected => (true, false),
        }
    }
}

impl FromStr for SuggestionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SuggestionStatus::Pending),
            "approved" => Ok(SuggestionStatus::Approved),
            "rejected" => Ok(SuggestionStatus::Rejected),
            _ => Err(()),
        }
    }
}

/// 제안 목록/상세 응답 한 행. 게임 이름과 제안자 이름을 JOIN해서 가져옵니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GameSuggestion {
    pub id: String,
    pub game_id: String,
    pub game_name: String,
    /// 익명 제안이면 None
    pub submitted_by: Option<String>,
    pub submitted_by_username: Option<String>,
    pub submitted_at: String,
    pub admin_notes: String,
    pub status: String,
}

/// 제안 검토 요청: `PATCH /api/v1/suggestions/{id}`
#[derive(Debug, Deserialize)]
pub struct ReviewSuggestionRequest {
    pub status: SuggestionStatus,
    pub admin_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_approval_publishes_the_game() {
        assert_eq!(SuggestionStatus::Approved.game_flags(), (false, true));
        assert_eq!(SuggestionStatus::Rejected.game_flags(), (true, false));
        assert_eq!(SuggestionStatus::Pending.game_flags(), (true, false));
    }

    #[test]
    fn status_parses_from_lowercase() {
        assert_eq!("rejected".parse(), Ok(SuggestionStatus::Rejected));
        assert!("Rejected".parse::<SuggestionStatus>().is_err());
    }
}
