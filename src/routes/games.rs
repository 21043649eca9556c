//! # 게임 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/games | `list_games` | 공개 카탈로그 (필터 + 페이지네이션) |
//! | POST | /api/v1/games | `create_game` | 게임 생성 (관리자) |
//! | GET | /api/v1/games/{id} | `get_game` | 공개 게임 상세 |
//! | PATCH | /api/v1/games/{id} | `update_game` | 게임 수정 (관리자) |
//! | DELETE | /api/v1/games/{id} | `delete_game` | 게임 삭제 (관리자) |
//!
//! 목록 쿼리스트링은 HTML 목록 페이지와 같습니다:
//! `?search=&focus=&materials=&labels=&languages=&player_count=&duration=&page=`

use crate::{
    db,
    db::games::NewGame,
    error::AppError,
    middleware::auth::StaffUser,
    models::*,
    routes::AppState,
};
use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    Json,
};

/// `GET /api/v1/games` → `{ "items": [...], "page": { "number": 1, ... } }`
pub async fn list_games(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Paginated<GameDetail>>, AppError> {
    let (filter, page) = GameFilter::from_query(query.as_deref().unwrap_or(""));
    let games = db::games::list_public_games(&state.pool, &filter, page.as_deref()).await?;
    Ok(Json(games))
}

/// `GET /api/v1/games/{id}`: 숨겨진 게임(비활성, 제안 대기)은 404
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameDetail>, AppError> {
    let game = db::games::get_public_game_detail(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(game))
}

/// `POST /api/v1/games` + GameInput JSON
///
/// 이름이 중복되거나 선택지가 잘못되면 422 + 필드별 메시지
pub async fn create_game(
    State(state): State<AppState>,
    StaffUser(staff): StaffUser,
    Json(input): Json<GameInput>,
) -> Result<(StatusCode, Json<GameDetail>), AppError> {
    let input = input.normalized();
    let game = db::games::create_game(
        &state.pool,
        &input,
        &NewGame {
            created_by: Some(&staff.user_id),
            ..Default::default()
        },
    )
    .await?;

    tracing::info!(game_id = %game.game.id, name = %game.game.name, "Game created");
    Ok((StatusCode::CREATED, Json(game)))
}

/// `PATCH /api/v1/games/{id}`: 보낸 필드만 바뀝니다.
pub async fn update_game(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateGameRequest>,
) -> Result<Json<GameDetail>, AppError> {
    let game = db::games::update_game(&state.pool, &id, &req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(game))
}

/// `DELETE /api/v1/games/{id}` → `204 No Content`
///
/// 이 게임을 담은 세션 칸과 제안 기록도 함께 지워집니다.
pub async fn delete_game(
    State(state): State<AppState>,
    _staff: StaffUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !db::games::delete_game(&state.pool, &id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(game_id = %id, "Game deleted");
    Ok(StatusCode::NO_CONTENT)
}
