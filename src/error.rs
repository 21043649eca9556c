//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답(JSON)으로 자동 변환
//! - `ErrorReport`: 응답 확장(extension)에 실어 보내는 에러 요약.
//!   HTML 페이지 라우트에서는 `middleware::error_page`가 이것을 읽어
//!   JSON 대신 에러 페이지를 렌더링합니다.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

/// 폼 필드별 검증 에러 메시지 (필드 이름 → 메시지 목록)
///
/// BTreeMap을 쓰면 필드 순서가 항상 정렬되어 JSON 출력이 결정적(deterministic)입니다.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 폼/요청 본문 검증 실패 (HTTP 422)
    /// 필드별 메시지를 함께 전달합니다.
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error → AppError::Database 자동 변환 (`?` 연산자 사용 가능)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 파일 입출력 오류 (HTTP 500)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 템플릿 렌더링 오류 (HTTP 500)
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// 세션 스토어 읽기/쓰기 오류 (HTTP 500)
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 권한 없음 (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 리소스 충돌 (HTTP 409)
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl AppError {
    /// 필드 하나에 대한 검증 에러를 만듭니다.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::Validation(errors)
    }

    /// HTTP 상태 코드와 기계가 읽는 에러 코드
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            AppError::Template(_) => (StatusCode::INTERNAL_SERVER_ERROR, "template_error"),
            AppError::Session(_) => (StatusCode::INTERNAL_SERVER_ERROR, "session_error"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        }
    }
}

/// SQLite UNIQUE 제약 위반인지 확인합니다.
///
/// 이름 중복을 409/필드 에러로 바꿀 때 사용합니다.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// 에러 응답에 첨부되는 요약 정보
///
/// `detail`은 내부 에러의 원문입니다. 디버그 모드의 에러 페이지에서만 표시됩니다.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub detail: Option<String>,
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, IO, Template, Session, Internal)는 실제 에러 내용을
    /// 로그에만 기록하고, 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let (message, detail, fields) = match self {
            AppError::NotFound => (self.to_string(), None, None),
            AppError::BadRequest(ref msg)
            | AppError::Unauthorized(ref msg)
            | AppError::Forbidden(ref msg)
            | AppError::Conflict(ref msg) => (msg.clone(), None, None),
            AppError::Validation(fields) => {
                ("Validation failed".to_string(), None, Some(fields))
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                ("An internal error occurred".to_string(), Some(msg.clone()), None)
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                ("A database error occurred".to_string(), Some(e.to_string()), None)
            }
            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                ("An IO error occurred".to_string(), Some(e.to_string()), None)
            }
            AppError::Template(ref e) => {
                tracing::error!("Template error: {:#}", e);
                ("A rendering error occurred".to_string(), Some(format!("{e:#}")), None)
            }
            AppError::Session(ref e) => {
                tracing::error!("Session error: {}", e);
                ("A session error occurred".to_string(), Some(e.to_string()), None)
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "Resource not found" } }
        // 검증 에러면 "fields": { "name": ["..."] } 가 추가됩니다.
        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(fields) = fields {
            error["fields"] = json!(fields);
        }

        let mut response = (status, Json(json!({ "error": error }))).into_response();
        response.extensions_mut().insert(ErrorReport {
            status,
            code,
            message,
            detail,
        });
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_maps_to_unprocessable_entity() {
        let err = AppError::field("name", "This field is required.");
        assert_eq!(err.status_and_code().0, StatusCode::UNPROCESSABLE_ENTITY);

        let response = err.into_response();
        let report = response.extensions().get::<ErrorReport>().cloned();
        assert_eq!(report.map(|r| r.code), Some("validation_error"));
    }

    #[test]
    fn internal_errors_hide_details_from_message() {
        let response = AppError::Internal("disk on fire".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let report = response.extensions().get::<ErrorReport>().cloned();
        let report = report.expect("report extension");
        assert_eq!(report.message, "An internal error occurred");
        assert_eq!(report.detail.as_deref(), Some("disk on fire"));
    }
}
