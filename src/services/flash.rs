//! 다음 페이지 렌더링 때 한 번만 보여주는 알림 메시지 (리다이렉트 후 안내용)

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppError;

pub const FLASH_KEY: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

/// 메시지를 큐에 추가합니다.
pub async fn push(session: &Session, level: FlashLevel, message: impl Into<String>) -> Result<(), AppError> {
    let mut messages: Vec<Flash> = session.get(FLASH_KEY).await?.unwrap_or_default();
    messages.push(Flash {
        level,
        message: message.into(),
    });
    session.insert(FLASH_KEY, messages).await?;
    Ok(())
}

/// 쌓인 메시지를 모두 꺼내고 비웁니다.
pub async fn take(session: &Session) -> Result<Vec<Flash>, AppError> {
    let messages: Option<Vec<Flash>> = session.remove(FLASH_KEY).await?;
    Ok(messages.unwrap_or_default())
}
