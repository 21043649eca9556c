use serde::{Deserialize, Serialize};

/// 게임 설명이 제공되는 언어 (예: `en` English, `de` Deutsch)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Language {
    pub id: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLanguageRequest {
    pub code: String,
    pub name: String,
}
