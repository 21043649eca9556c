//! # 게임 카탈로그 페이지
//!
//! ## 엔드포인트
//! - `GET /`            → 게임 목록 (검색, 필터, 12개씩 페이지네이션)
//! - `GET /games/{id}`  → 게임 상세
//!
//! 두 페이지 모두 공개 카탈로그(활성 상태이고 제안 대기 중이 아닌 게임)만 보여줍니다.

use axum::{
    extract::{Path, RawQuery, State},
    response::Html,
};
use minijinja::context;

use super::{page::Page, AppState};
use crate::{db, error::AppError, models::*};

/// `GET /`: 게임 목록
///
/// 쿼리스트링 예: `?search=ball&focus=Dribbling&focus=Passing&duration=10min&page=2`
pub async fn game_list(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    page: Page,
) -> Result<Html<String>, AppError> {
    let (filter, requested_page) = GameFilter::from_query(query.as_deref().unwrap_or(""));
    let games = db::games::list_public_games(&state.pool, &filter, requested_page.as_deref()).await?;

    tracing::debug!(
        total = games.page.total,
        page = games.page.number,
        "Game list filtered"
    );

    let ctx = context! {
        games => games.items,
        page_obj => games.page,
        filter => &filter,
        filter_query => filter.to_query(),
        focus_options => db::tags::list_tags(&state.pool, TagKind::Focus).await?,
        material_options => db::tags::list_tags(&state.pool, TagKind::Materials).await?,
        label_options => db::tags::list_tags(&state.pool, TagKind::Labels).await?,
        language_options => db::languages::list_languages(&state.pool).await?,
    };
    page.render(&state, "game_list.html", ctx).await
}

/// `GET /games/{id}`: 게임 상세
pub async fn game_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    page: Page,
) -> Result<Html<String>, AppError> {
    let game = db::games::get_public_game_detail(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let ctx = context! {
        in_cart => page.cart.contains(&game.game.id),
        game => game,
    };
    page.render(&state, "game_detail.html", ctx).await
}
