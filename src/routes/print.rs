//! # 명함 크기(85 × 55 mm) 카드 인쇄
//!
//! 인쇄용 HTML은 사이트 레이아웃 없이 단독으로 열리는 문서이며,
//! 첨부 파일(`Content-Disposition: attachment`)로 내려보냅니다.
//!
//! ## 엔드포인트
//! - `GET /print/games/{id}`    → `game_<id>.html`
//! - `GET /cart/print`          → `training_session.html` (저장하지 않은 카트)
//! - `GET /sessions/{id}/print` → `session_<id>.html` (소유자만)

use axum::{
    extract::{Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Redirect, Response},
};
use minijinja::{context, Value};
use serde::Serialize;

use super::{cart::cart_games, page::Page, AppState};
use crate::{
    db,
    error::AppError,
    middleware::auth::LoginRequired,
    models::*,
    services::{flash::FlashLevel, templates},
};

/// 카드 한 장
#[derive(Debug, Serialize)]
struct PrintCard<'a> {
    position: usize,
    game: &'a GameDetail,
    minutes: f64,
    duration_multiplier: f64,
    notes: &'a str,
}

fn attachment(html: String, filename: &str) -> Response {
    (
        [
            (CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        html,
    )
        .into_response()
}

fn render_print(state: &AppState, page: &Page, template: &str, ctx: Value) -> Result<String, AppError> {
    let base = context! { lang => page.lang };
    templates::render(&state.templates, template, templates::with_base(base, ctx))
}

/// `GET /print/games/{id}`
pub async fn print_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    page: Page,
) -> Result<Response, AppError> {
    let game = db::games::get_public_game_detail(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let html = render_print(&state, &page, "print_game.html", context! { game => &game })?;
    tracing::info!(game = %game.game.name, "Printed game card");
    Ok(attachment(html, &format!("game_{}.html", game.game.id)))
}

/// `GET /cart/print`: 카트가 비어 있으면 안내 메시지와 함께 카트 페이지로 돌아갑니다.
pub async fn print_cart(State(state): State<AppState>, mut page: Page) -> Result<Response, AppError> {
    let games = cart_games(&state, &mut page).await?;

    if games.is_empty() {
        page.flash(
            &state,
            FlashLevel::Warning,
            "No games in your training session to print.",
            &[],
        )
        .await?;
        return Ok(Redirect::to("/cart").into_response());
    }

    let cards: Vec<PrintCard> = games
        .iter()
        .enumerate()
        .map(|(index, game)| PrintCard {
            position: index + 1,
            game,
            minutes: f64::from(game.game.minutes()),
            duration_multiplier: 1.0,
            notes: "",
        })
        .collect();
    let total_duration = total_minutes(games.iter().map(|g| (g.game.minutes(), 1.0)));

    let ctx = context! {
        title => page.tr(&state, "Training Session", &[]),
        description => "",
        cards => cards,
        total_duration => total_duration,
    };
    let html = render_print(&state, &page, "print_session.html", ctx)?;
    Ok(attachment(html, "training_session.html"))
}

/// `GET /sessions/{id}/print`
pub async fn print_session(
    State(state): State<AppState>,
    LoginRequired(user): LoginRequired,
    Path(id): Path<String>,
    page: Page,
) -> Result<Response, AppError> {
    let detail = db::sessions::get_session_detail(&state.pool, &id, &user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let cards: Vec<PrintCard> = detail
        .games
        .iter()
        .enumerate()
        .map(|(index, entry)| PrintCard {
            position: index + 1,
            game: &entry.game,
            minutes: entry.minutes,
            duration_multiplier: entry.entry.duration_multiplier,
            notes: &entry.entry.notes,
        })
        .collect();

    let ctx = context! {
        title => &detail.session.name,
        description => &detail.session.description,
        cards => cards,
        total_duration => detail.total_duration,
    };
    let html = render_print(&state, &page, "print_session.html", ctx)?;
    Ok(attachment(html, &format!("session_{}.html", detail.session.id)))
}
