//! # 카트(현재 훈련 세션 초안) 핸들러
//!
//! ## 엔드포인트
//! - `GET  /cart`        → 카트 보기 + 저장 폼
//! - `POST /cart`        → 카트를 이름 붙여 훈련 세션으로 저장 (로그인 필요)
//! - `POST /cart/add`    → 게임 추가 (JSON 요청/응답, 페이지의 스크립트가 호출)
//! - `POST /cart/remove` → 게임 빼기 (JSON)
//! - `POST /cart/clear`  → 카트 비우기 후 카트 페이지로 이동

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use minijinja::{context, Value};
use serde::Deserialize;
use serde_json::json;

use super::{page::Page, AppState};
use crate::{
    db,
    error::{AppError, FieldErrors},
    middleware::auth::LoginRequired,
    models::*,
    services::{forms::FormData, flash::FlashLevel},
};

#[derive(Debug, Deserialize)]
struct CartItemRequest {
    game_id: Option<String>,
}

/// 카트의 게임 중 아직 공개 카탈로그에 있는 게임만 카트 순서대로 가져옵니다.
///
/// 삭제되거나 숨겨진 게임의 ID는 카트에서 빼고 저장하므로 배지 숫자와 목록이 같아집니다.
pub(super) async fn cart_games(state: &AppState, page: &mut Page) -> Result<Vec<GameDetail>, AppError> {
    let mut details = db::games::get_game_details(&state.pool, page.cart.game_ids(), true).await?;
    if page.cart.retain(|id| details.contains_key(id)) {
        page.cart.save(&page.session).await?;
        tracing::info!("Dropped unavailable games from training session. Cart now has {} items", page.cart.len());
    }
    Ok(page
        .cart
        .game_ids()
        .iter()
        .filter_map(|id| details.remove(id))
        .collect())
}

async fn render_cart(
    state: &AppState,
    page: &mut Page,
    form: Value,
    errors: &FieldErrors,
) -> Result<Html<String>, AppError> {
    let games = cart_games(state, page).await?;
    let total_duration = total_minutes(games.iter().map(|g| (g.game.minutes(), 1.0)));

    let ctx = context! {
        games => games,
        total_duration => total_duration,
        form => form,
        errors => errors,
    };
    page.render(state, "cart.html", ctx).await
}

/// `GET /cart`
pub async fn view_cart(State(state): State<AppState>, mut page: Page) -> Result<Html<String>, AppError> {
    render_cart(&state, &mut page, context! {}, &FieldErrors::new()).await
}

/// `POST /cart`: 카트를 훈련 세션으로 저장합니다.
///
/// 검증에 실패하면 입력값과 필드 에러를 담아 카트 페이지를 다시 보여줍니다.
pub async fn save_cart(
    State(state): State<AppState>,
    LoginRequired(user): LoginRequired,
    mut page: Page,
    body: Bytes,
) -> Result<Response, AppError> {
    let form = FormData::parse(&body);
    let games = cart_games(&state, &mut page).await?;
    let request = CreateSessionRequest {
        name: form.text("name"),
        description: form.text("description"),
        game_ids: games.iter().map(|g| g.game.id.clone()).collect(),
    };

    match db::sessions::create_session(&state.pool, &user.user_id, &request).await {
        Ok(session) => {
            page.cart.clear();
            page.cart.save(&page.session).await?;
            tracing::info!(
                session_id = %session.id,
                user = %user.username,
                games = request.game_ids.len(),
                "Training session saved from cart"
            );
            page.flash(
                &state,
                FlashLevel::Success,
                "Training session \"{name}\" saved successfully!",
                &[("name", &session.name)],
            )
            .await?;
            Ok(Redirect::to(&format!("/sessions/{}", session.id)).into_response())
        }
        Err(AppError::Validation(errors)) => {
            let form = context! { name => request.name, description => request.description };
            Ok(render_cart(&state, &mut page, form, &errors).await?.into_response())
        }
        Err(e) => Err(e),
    }
}

fn cart_json(status: StatusCode, body: serde_json::Value) -> Response {
    (status, Json(body)).into_response()
}

fn cart_failure(status: StatusCode, message: String) -> Response {
    cart_json(status, json!({ "success": false, "message": message }))
}

/// 요청 본문에서 game_id를 읽습니다. 실패하면 바로 돌려줄 에러 응답
fn read_game_id(page: &Page, state: &AppState, body: &[u8]) -> Result<String, Response> {
    let request: CartItemRequest = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Invalid cart request body: {}", e);
        cart_failure(StatusCode::BAD_REQUEST, page.tr(state, "Invalid JSON data", &[]))
    })?;

    match request.game_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => Ok(id),
        None => {
            tracing::warn!("Cart request without game_id");
            Err(cart_failure(
                StatusCode::BAD_REQUEST,
                page.tr(state, "Game ID is required", &[]),
            ))
        }
    }
}

/// `POST /cart/add`: `{ "game_id": "..." }`
///
/// 이미 카트에 있는 게임이면 아무것도 바꾸지 않고 성공으로 응답합니다.
pub async fn add_to_cart(
    State(state): State<AppState>,
    mut page: Page,
    body: Bytes,
) -> Result<Response, AppError> {
    let game_id = match read_game_id(&page, &state, &body) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    let Some(game) = db::games::get_public_game(&state.pool, &game_id).await? else {
        tracing::warn!(game_id = %game_id, "Attempted to add unknown game to cart");
        return Ok(cart_failure(
            StatusCode::NOT_FOUND,
            page.tr(&state, "Game not found", &[]),
        ));
    };

    let added = page.cart.add(&game.id);
    let message = if added {
        page.cart.save(&page.session).await?;
        tracing::info!(
            "Game '{}' added to training session. Cart now has {} items",
            game.name,
            page.cart.len()
        );
        page.tr(&state, "Game \"{name}\" added to training session!", &[("name", &game.name)])
    } else {
        tracing::debug!("Game '{}' already in training session", game.name);
        page.tr(&state, "Game \"{name}\" is already in your training session.", &[("name", &game.name)])
    };

    Ok(cart_json(
        StatusCode::OK,
        json!({
            "success": true,
            "added": added,
            "message": message,
            "cart_count": page.cart.len(),
        }),
    ))
}

/// `POST /cart/remove`: `{ "game_id": "..." }`. 카트에 없는 게임이어도 성공
pub async fn remove_from_cart(
    State(state): State<AppState>,
    mut page: Page,
    body: Bytes,
) -> Result<Response, AppError> {
    let game_id = match read_game_id(&page, &state, &body) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    if page.cart.remove(&game_id) {
        page.cart.save(&page.session).await?;
        tracing::info!(game_id = %game_id, "Game removed from training session. Cart now has {} items", page.cart.len());
    }

    let total_duration = total_minutes(
        cart_games(&state, &mut page)
            .await?
            .iter()
            .map(|g| (g.game.minutes(), 1.0)),
    );

    Ok(cart_json(
        StatusCode::OK,
        json!({
            "success": true,
            "message": page.tr(&state, "Game removed from training session", &[]),
            "cart_count": page.cart.len(),
            "total_duration": total_duration,
        }),
    ))
}

/// `POST /cart/clear`
pub async fn clear_cart(State(state): State<AppState>, mut page: Page) -> Result<Redirect, AppError> {
    let removed = page.cart.len();
    page.cart.clear();
    page.cart.save(&page.session).await?;
    tracing::info!("Training session cleared ({} items removed)", removed);

    page.flash(
        &state,
        FlashLevel::Success,
        "Training session cleared successfully!",
        &[],
    )
    .await?;
    Ok(Redirect::to("/cart"))
}
