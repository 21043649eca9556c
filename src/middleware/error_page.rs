//! # HTML 에러 페이지 미들웨어
//!
//! `AppError`는 항상 JSON 응답을 만들고 `ErrorReport`를 응답 확장에 붙입니다.
//! 브라우저용 페이지 라우트에서는 이 미들웨어가 그 보고서를 읽어
//! `error.html`을 렌더링한 응답으로 바꿉니다.
//!
//! - 요청이 JSON을 원하면(`Accept`/`Content-Type`이 JSON) 원래 응답을 그대로 둡니다.
//! - 내부 에러 원문(detail)은 `DEBUG=true`일 때만 보여줍니다.

use axum::{
    extract::{Request, State},
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderMap,
    },
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use minijinja::context;

use super::locale::Locale;
use crate::{error::ErrorReport, routes::AppState, services::templates};

fn wants_json(headers: &HeaderMap) -> bool {
    [ACCEPT, CONTENT_TYPE].iter().any(|name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"))
    })
}

pub async fn render_error_page(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let json = wants_json(req.headers());
    let lang = req.extensions().get::<Locale>().copied().unwrap_or_default();

    let response = next.run(req).await;
    if json || response.status().is_success() || response.status().is_redirection() {
        return response;
    }
    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };

    let detail = if state.config.debug { report.detail.clone() } else { None };
    let ctx = context! {
        lang => lang.0,
        status => report.status.as_u16(),
        code => report.code,
        message => report.message.clone(),
        detail => detail,
        debug => state.config.debug,
    };

    match templates::render(&state.templates, "error.html", ctx) {
        Ok(html) => {
            let mut page = (report.status, Html(html)).into_response();
            page.extensions_mut().insert(report);
            page
        }
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            response
        }
    }
}
