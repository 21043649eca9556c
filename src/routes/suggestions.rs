//! # 게임 제안 핸들러
//!
//! 누구나(익명 포함) 새 게임을 제안할 수 있습니다. 제안된 게임은 숨김 상태로
//! 저장되고, 관리자가 승인해야 공개 카탈로그에 나타납니다.
//!
//! ## 엔드포인트
//! - `GET  /suggest`                  → 제안 폼
//! - `POST /suggest`                  → 제안 제출 (검증 실패 시 폼 재표시)
//! - `GET  /api/v1/suggestions`       → 제안 목록 (관리자, `?status=pending`)
//! - `POST /api/v1/suggestions`       → 제안 제출 (JSON)
//! - `PATCH /api/v1/suggestions/{id}` → 승인/거절 (관리자)

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use minijinja::context;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{page::Page, AppState};
use crate::{
    db,
    error::{AppError, FieldErrors},
    middleware::auth::{AuthUser, StaffUser},
    models::*,
    services::{flash::FlashLevel, forms::FormData},
};

async fn render_form(
    state: &AppState,
    page: &Page,
    input: &GameInput,
    errors: &FieldErrors,
) -> Result<Html<String>, AppError> {
    let ctx = context! {
        form => context! {
            name => &input.name,
            description => &input.description,
            player_count => &input.player_count,
            duration => &input.duration,
            variants => &input.variants,
            focus => &input.focus,
            materials => &input.materials,
            labels => &input.labels,
            languages => &input.languages,
        },
        errors => errors,
        focus_options => db::tags::list_tags(&state.pool, TagKind::Focus).await?,
        material_options => db::tags::list_tags(&state.pool, TagKind::Materials).await?,
        label_options => db::tags::list_tags(&state.pool, TagKind::Labels).await?,
        language_options => db::languages::list_languages(&state.pool).await?,
    };
    page.render(state, "game_suggestion.html", ctx).await
}

/// `GET /suggest`
pub async fn suggestion_form(State(state): State<AppState>, page: Page) -> Result<Html<String>, AppError> {
    render_form(&state, &page, &GameInput::default(), &FieldErrors::new()).await
}

/// `POST /suggest`
pub async fn submit_suggestion(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    page: Page,
    body: Bytes,
) -> Result<Response, AppError> {
    let input = GameInput::from_form(&FormData::parse(&body)).normalized();
    let submitted_by = user.as_ref().map(|u| u.user_id.as_str());

    match db::suggestions::create_suggestion(&state.pool, &input, submitted_by).await {
        Ok(suggestion) => {
            tracing::info!(
                suggestion_id = %suggestion.id,
                game = %suggestion.game_name,
                anonymous = submitted_by.is_none(),
                "Game suggestion submitted"
            );
            page.flash(
                &state,
                FlashLevel::Success,
                "Thank you! Your game suggestion has been submitted and will be reviewed by an administrator.",
                &[],
            )
            .await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(AppError::Validation(errors)) => {
            tracing::debug!(?errors, "Game suggestion rejected by validation");
            Ok(render_form(&state, &page, &input, &errors).await?.into_response())
        }
        Err(e) => Err(e),
    }
}

/// `POST /api/v1/suggestions`
pub async fn create_suggestion(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Json(input): Json<GameInput>,
) -> Result<(StatusCode, Json<GameSuggestion>), AppError> {
    let input = input.normalized();
    let suggestion = db::suggestions::create_suggestion(
        &state.pool,
        &input,
        user.as_ref().map(|u| u.user_id.as_str()),
    )
    .await?;

    tracing::info!(suggestion_id = %suggestion.id, "Game suggestion submitted via API");
    Ok((StatusCode::CREATED, Json(suggestion)))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub status: Option<String>,
}

/// `GET /api/v1/suggestions`: `{ "suggestions": [...] }`
pub async fn list_suggestions(
    State(state): State<AppState>,
    _staff: StaffUser,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<Value>, AppError> {
    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<SuggestionStatus>()
                .map_err(|_| AppError::BadRequest(format!("Unknown status: {raw}")))?,
        ),
    };

    let suggestions = db::suggestions::list_suggestions(&state.pool, status).await?;
    Ok(Json(json!({ "suggestions": suggestions })))
}

/// `PATCH /api/v1/suggestions/{id}`: `{ "status": "approved", "admin_notes": "..." }`
pub async fn review_suggestion(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Path(id): Path<String>,
    Json(req): Json<ReviewSuggestionRequest>,
) -> Result<Json<GameSuggestion>, AppError> {
    let suggestion = db::suggestions::review_suggestion(
        &state.pool,
        &id,
        req.status,
        req.admin_notes.as_deref(),
    )
    .await?
    .ok_or(AppError::NotFound)?;

    tracing::info!(
        suggestion_id = %id,
        status = req.status.as_str(),
        reviewer = %staff.username,
        "Game suggestion reviewed"
    );
    Ok(Json(suggestion))
}
