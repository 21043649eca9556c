//! # 분류 태그 모델 정의
//!
//! 게임을 분류하고 필터링하기 위한 세 종류의 태그를 하나의 구조체로 표현합니다.
//! - 포커스(Focus): 훈련 목적 (예: "Dribbling", "Teamwork")
//! - 준비물(Material): 필요한 장비/장소 (예: "Cones", "Halfcourt")
//! - 라벨(Label): 자유 분류 + 색상 (예: "Warmup" `#28a745`)
//!
//! 세 테이블은 이름(UNIQUE)을 공유하고, 포커스와 준비물은 설명을,
//! 라벨은 색상을 추가로 가집니다.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 라벨의 기본 색상
pub const DEFAULT_LABEL_COLOR: &str = "#007bff";

/// 태그 종류. URL 경로(`/api/v1/tags/{kind}`)와 테이블 이름을 결정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Focus,
    Materials,
    Labels,
}

impl TagKind {
    /// 태그 본 테이블
    pub fn table(self) -> &'static str {
        match self {
            TagKind::Focus => "focuses",
            TagKind::Materials => "materials",
            TagKind::Labels => "labels",
        }
    }

    /// 게임과의 다대다 관계 테이블과 그 외래키 컬럼
    pub fn join_table(self) -> (&'static str, &'static str) {
        match self {
            TagKind::Focus => ("game_focuses", "focus_id"),
            TagKind::Materials => ("game_materials", "material_id"),
            TagKind::Labels => ("game_labels", "label_id"),
        }
    }

    /// 종류별 SELECT 컬럼. 없는 컬럼은 NULL로 채워 `Tag` 하나로 읽습니다.
    pub(crate) fn select_columns(self) -> &'static str {
        match self {
            TagKind::Focus | TagKind::Materials => "t.id, t.name, t.description, NULL AS color",
            TagKind::Labels => "t.id, t.name, NULL AS description, t.color",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TagKind::Focus => "focus",
            TagKind::Materials => "materials",
            TagKind::Labels => "labels",
        }
    }
}

impl FromStr for TagKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" => Ok(TagKind::Focus),
            "materials" => Ok(TagKind::Materials),
            "labels" => Ok(TagKind::Labels),
            _ => Err(()),
        }
    }
}

/// 분류 태그 한 행
///
/// 종류에 없는 필드(포커스의 color, 라벨의 description)는 JSON에서 생략됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// 태그 생성 요청: `POST /api/v1/tags/{kind}`
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub description: Option<String>,
    /// 라벨에만 적용됩니다. 없으면 기본 색상
    pub color: Option<String>,
}

/// 태그 수정 요청: `PATCH /api/v1/tags/{kind}/{id}`
#[derive(Debug, Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// `#rrggbb` 형식의 색상 코드인지 확인합니다.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
