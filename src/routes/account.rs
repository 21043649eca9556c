//! # 브라우저 로그인과 언어 전환
//!
//! ## 엔드포인트
//! - `GET  /login`        → 로그인 폼 (`?next=` 로 돌아갈 주소)
//! - `POST /login`        → 세션 로그인
//! - `POST /logout`       → 세션 로그아웃 (카트와 언어 선택은 유지)
//! - `POST /set-language` → 언어 선택을 세션에 저장 후 원래 페이지로 이동
//!
//! 리다이렉트 대상은 같은 사이트 안의 경로(`/`로 시작, `//` 제외)만 따라갑니다.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::REFERER, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use serde::Deserialize;

use super::{page::Page, AppState};
use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::{verify_password, USER_SESSION_KEY},
    services::{
        flash::FlashLevel,
        forms::FormData,
        i18n::{self, LANGUAGE_SESSION_KEY},
    },
};

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// 같은 사이트 안의 경로면 그대로, 아니면 None
pub fn local_path(candidate: &str) -> Option<&str> {
    let candidate = candidate.trim();
    let is_local = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.contains('\\')
        && !candidate.chars().any(char::is_control);
    is_local.then_some(candidate)
}

/// `Referer`의 경로 + 쿼리. 다른 호스트에서 온 주소는 무시합니다.
fn referer_path(headers: &HeaderMap) -> Option<String> {
    let referer = headers.get(REFERER)?.to_str().ok()?;
    let url = url::Url::parse(referer).ok()?;
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|value| value.to_str().ok());
    let authority = match url.port() {
        Some(port) => format!("{}:{}", url.host_str()?, port),
        None => url.host_str()?.to_string(),
    };
    if host.is_some_and(|host| !host.eq_ignore_ascii_case(&authority)) {
        return None;
    }
    Some(match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    })
}

async fn render_login(
    state: &AppState,
    page: &Page,
    next: &str,
    username: &str,
    error: Option<String>,
) -> Result<Html<String>, AppError> {
    let ctx = context! {
        next => next,
        username => username,
        error => error,
    };
    page.render(state, "login.html", ctx).await
}

/// `GET /login`
pub async fn login_form(
    State(state): State<AppState>,
    Query(query): Query<NextQuery>,
    page: Page,
) -> Result<Response, AppError> {
    let next = query.next.as_deref().and_then(local_path).unwrap_or("/");
    if page.user.is_some() {
        return Ok(Redirect::to(next).into_response());
    }
    Ok(render_login(&state, &page, next, "", None).await?.into_response())
}

/// `POST /login`: 폼 필드: username, password, next
pub async fn login(State(state): State<AppState>, page: Page, body: Bytes) -> Result<Response, AppError> {
    let form = FormData::parse(&body);
    let username = form.text("username");
    let password = form.get("password").unwrap_or_default().to_string();
    let next = form.get("next").and_then(local_path).unwrap_or("/").to_string();

    let user = match db_users::find_by_username(&state.pool, &username).await? {
        Some(user) if verify_password(&password, &user.password_hash)? => user,
        _ => {
            tracing::warn!(username = %username, "Failed login attempt");
            let error = page.tr(
                &state,
                "Please enter a correct username and password.",
                &[],
            );
            return Ok(render_login(&state, &page, &next, &username, Some(error))
                .await?
                .into_response());
        }
    };

    // 로그인 전후로 세션 ID를 바꿔 세션 고정 공격을 막습니다.
    page.session.cycle_id().await?;
    page.session.insert(USER_SESSION_KEY, &user.id).await?;
    tracing::info!(user = %user.username, "User logged in");

    page.flash(
        &state,
        FlashLevel::Success,
        "Welcome back, {name}!",
        &[("name", &user.username)],
    )
    .await?;
    Ok(Redirect::to(&next).into_response())
}

/// `POST /logout`
pub async fn logout(State(state): State<AppState>, page: Page) -> Result<Redirect, AppError> {
    if let Some(user) = &page.user {
        tracing::info!(user = %user.username, "User logged out");
    }
    page.session.remove::<String>(USER_SESSION_KEY).await?;
    page.session.cycle_id().await?;
    page.flash(&state, FlashLevel::Info, "You have been logged out.", &[])
        .await?;
    Ok(Redirect::to("/"))
}

/// `POST /set-language`: 폼 필드: language, next
///
/// 지원하지 않는 언어는 무시하고 경고만 남깁니다. 이동 순서: next → Referer → `/`
pub async fn set_language(
    headers: HeaderMap,
    page: Page,
    body: Bytes,
) -> Result<Redirect, AppError> {
    let form = FormData::parse(&body);
    let requested = form.text("language");

    match i18n::supported(&requested) {
        Some(code) => {
            page.session.insert(LANGUAGE_SESSION_KEY, code).await?;
            tracing::info!(from = page.lang, to = code, "Language changed");
        }
        None => tracing::warn!(language = %requested, "Unsupported language requested"),
    }

    let target = form
        .get("next")
        .and_then(local_path)
        .map(str::to_string)
        .or_else(|| referer_path(&headers))
        .unwrap_or_else(|| "/".to_string());
    Ok(Redirect::to(&target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_local_paths_are_followed() {
        assert_eq!(local_path("/games/1?x=2"), Some("/games/1?x=2"));
        assert_eq!(local_path("//evil.test/"), None);
        assert_eq!(local_path("https://evil.test/"), None);
        assert_eq!(local_path("/\\evil.test"), None);
        assert_eq!(local_path(""), None);
    }

    #[test]
    fn referer_keeps_path_and_query_of_same_host() {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, "http://localhost:8000/games/7?lang=x".parse().unwrap());
        headers.insert(axum::http::header::HOST, "localhost:8000".parse().unwrap());
        assert_eq!(referer_path(&headers).as_deref(), Some("/games/7?lang=x"));

        headers.insert(REFERER, "https://evil.test/phish".parse().unwrap());
        assert_eq!(referer_path(&headers), None);
    }
}
