//! # 안내 섹션(About / Impressum) 모델
//!
//! 페이지 하단의 "소개"와 "임프레숨(법적 고지)" 모달에 보여줄 마크다운 글입니다.
//! 활성화된 섹션만 정렬 순서(`sort_order`)대로 노출됩니다.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfoKind {
    About,
    Impressum,
}

impl InfoKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InfoKind::About => "about",
            InfoKind::Impressum => "impressum",
        }
    }
}

impl FromStr for InfoKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "about" => Ok(InfoKind::About),
            "impressum" => Ok(InfoKind::Impressum),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InfoSection {
    pub id: String,
    pub kind: String,
    pub title: String,
    /// 마크다운 본문
    pub content: String,
    pub is_active: bool,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// 안내 섹션 생성 요청: `POST /api/v1/info`
#[derive(Debug, Deserialize)]
pub struct CreateInfoRequest {
    pub kind: InfoKind,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub is_active: Option<bool>,
    pub sort_order: Option<i64>,
}

/// 안내 섹션 수정 요청: `PATCH /api/v1/info/{id}`
#[derive(Debug, Deserialize)]
pub struct UpdateInfoRequest {
    pub kind: Option<InfoKind>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i64>,
}
