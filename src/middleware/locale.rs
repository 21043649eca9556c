//! # 요청 로케일 미들웨어
//!
//! 세션에 저장된 언어 선택 → `Accept-Language` → 기본 언어 순서로 로케일을 정해
//! 요청 확장(extension)에 `Locale`로 넣고, 응답에 `Content-Language`를 붙입니다.
//! 핸들러는 `Locale` 추출기로 값을 꺼냅니다.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request},
    http::{
        header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE, VARY},
        request::Parts,
        HeaderValue,
    },
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::services::i18n::{self, DEFAULT_LANGUAGE, LANGUAGE_SESSION_KEY};

/// 현재 요청의 언어 코드 (`"en"`, `"de"`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale(pub &'static str);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANGUAGE)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Locale {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Locale>().copied().unwrap_or_default())
    }
}

pub async fn negotiate_locale(session: Session, mut req: Request, next: Next) -> Response {
    let choice = match session.get::<String>(LANGUAGE_SESSION_KEY).await {
        Ok(choice) => choice,
        Err(e) => {
            tracing::warn!("Could not read language preference from session: {}", e);
            None
        }
    };
    let accept_language = req
        .headers()
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());

    let lang = i18n::resolve(choice.as_deref(), accept_language);
    req.extensions_mut().insert(Locale(lang));

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(CONTENT_LANGUAGE, HeaderValue::from_static(lang));
    headers.append(VARY, HeaderValue::from_static("Accept-Language, Cookie"));
    response
}
