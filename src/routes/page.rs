//! # 페이지 공통 컨텍스트
//!
//! 모든 HTML 페이지가 공유하는 값(로케일, 로그인 사용자, 카트 개수, 알림 메시지,
//! 하단 안내 섹션)을 `Page` 추출기 하나로 모읍니다.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
    response::Html,
};
use minijinja::{context, Value};
use tower_sessions::Session;

use super::AppState;
use crate::{
    db,
    error::AppError,
    middleware::{auth::AuthUser, locale::Locale},
    models::InfoKind,
    services::{
        cart::Cart,
        flash::{self, FlashLevel},
        templates,
    },
};

pub struct Page {
    pub lang: &'static str,
    pub session: Session,
    pub user: Option<AuthUser>,
    pub cart: Cart,
    /// 현재 경로 + 쿼리 (로그인 후 돌아올 주소)
    pub path: String,
}

impl FromRequestParts<AppState> for Page {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Locale(lang) = parts.extensions.get::<Locale>().copied().unwrap_or_default();
        let session = <Session as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(msg.to_string()))?;
        let user = <AuthUser as OptionalFromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .unwrap_or_default();
        let cart = Cart::load(&session).await?;
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Ok(Page {
            lang,
            session,
            user,
            cart,
            path,
        })
    }
}

impl Page {
    /// 현재 로케일로 번역하고 `{name}` 자리표시자를 채웁니다.
    pub fn tr(&self, state: &AppState, key: &str, args: &[(&str, &str)]) -> String {
        state.translations.format(self.lang, key, args)
    }

    /// 다음 페이지에 보여줄 알림을 번역해서 남깁니다.
    pub async fn flash(
        &self,
        state: &AppState,
        level: FlashLevel,
        key: &str,
        args: &[(&str, &str)],
    ) -> Result<(), AppError> {
        flash::push(&self.session, level, self.tr(state, key, args)).await
    }

    /// 공통 컨텍스트와 페이지별 컨텍스트를 합쳐 렌더링합니다.
    /// 같은 키가 있으면 페이지별 값이 우선합니다.
    pub async fn render(&self, state: &AppState, template: &str, ctx: Value) -> Result<Html<String>, AppError> {
        let messages = flash::take(&self.session).await?;
        let (about, impressum): (Vec<_>, Vec<_>) = db::info::list_active(&state.pool)
            .await?
            .into_iter()
            .partition(|section| section.kind == InfoKind::About.as_str());

        let base = context! {
            lang => self.lang,
            user => &self.user,
            cart_count => self.cart.len(),
            cart_ids => self.cart.game_ids(),
            messages => messages,
            current_path => &self.path,
            about_sections => about,
            impressum_sections => impressum,
            debug => state.config.debug,
        };

        let html = templates::render(&state.templates, template, templates::with_base(base, ctx))?;
        Ok(Html(html))
    }
}
