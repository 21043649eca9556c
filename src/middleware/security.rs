//! # 요청 출처 검사 미들웨어
//!
//! 1. `Host` 헤더가 `ALLOWED_HOSTS`에 없으면 400
//!    - `*`는 모든 호스트 허용, `.example.com`은 그 도메인과 모든 하위 도메인 허용
//!    - `Host` 헤더가 아예 없는 요청은 통과 (HTTP/1.0 클라이언트)
//! 2. 상태를 바꾸는 메서드(POST/PUT/PATCH/DELETE)에 `Origin` 헤더가 있으면
//!    요청 호스트 또는 `CSRF_TRUSTED_ORIGINS` 중 하나와 일치해야 합니다. 아니면 403
//!    - Bearer 토큰 요청은 브라우저가 자동으로 보내지 않으므로 검사하지 않습니다.

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, HOST, ORIGIN},
        Method,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{error::AppError, routes::AppState};

pub async fn guard_origin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let host = req.headers().get(HOST).and_then(|value| value.to_str().ok());

    if let Some(host) = host {
        if !host_allowed(host, &state.config.allowed_hosts) {
            tracing::warn!(host, "Rejected request with a disallowed Host header");
            return AppError::BadRequest(format!("Invalid Host header: '{host}'")).into_response();
        }
    }

    let unsafe_method = !matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE);
    if unsafe_method && !req.headers().contains_key(AUTHORIZATION) {
        if let Some(origin) = req.headers().get(ORIGIN) {
            let origin = origin.to_str().unwrap_or("null");
            if !origin_allowed(origin, host, &state.config.csrf_trusted_origins) {
                tracing::warn!(origin, host = host.unwrap_or(""), path = %req.uri().path(), "Rejected cross-origin form submission");
                return AppError::Forbidden("Origin checking failed. Request aborted.".to_string())
                    .into_response();
            }
        }
    }

    next.run(req).await
}

/// 포트를 뗀 호스트 이름. IPv6(`[::1]:8000`)는 대괄호를 유지합니다.
fn host_name(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}

pub fn host_allowed(host: &str, allowed_hosts: &[String]) -> bool {
    let name = host_name(host).trim_end_matches('.').to_ascii_lowercase();
    allowed_hosts.iter().any(|pattern| {
        let pattern = pattern.to_ascii_lowercase();
        if pattern == "*" || pattern == name {
            return true;
        }
        match pattern.strip_prefix('.') {
            Some(domain) => name == domain || name.ends_with(&pattern),
            None => false,
        }
    })
}

pub fn origin_allowed(origin: &str, host: Option<&str>, trusted_origins: &[String]) -> bool {
    let origin = origin.trim_end_matches('/');
    if trusted_origins
        .iter()
        .any(|trusted| trusted.trim_end_matches('/').eq_ignore_ascii_case(origin))
    {
        return true;
    }

    let Ok(url) = url::Url::parse(origin) else {
        return false;
    };
    let Some(origin_host) = url.host_str() else {
        return false;
    };
    // 기본 포트(80/443)면 port()가 None이므로 Host 헤더에도 포트가 없습니다.
    let authority = match url.port() {
        Some(port) => format!("{origin_host}:{port}"),
        None => origin_host.to_string(),
    };
    host.is_some_and(|host| host.eq_ignore_ascii_case(&authority))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn host_patterns() {
        let allowed = hosts(&["localhost", ".example.com"]);
        assert!(host_allowed("localhost:8000", &allowed));
        assert!(host_allowed("example.com", &allowed));
        assert!(host_allowed("www.example.com", &allowed));
        assert!(!host_allowed("badexample.com", &allowed));
        assert!(!host_allowed("evil.test", &allowed));
        assert!(host_allowed("anything", &hosts(&["*"])));
        assert!(host_allowed("[::1]:8000", &hosts(&["[::1]"])));
    }

    #[test]
    fn origin_must_match_host_or_trusted_list() {
        let trusted = hosts(&["https://coach.example.org"]);
        assert!(origin_allowed("http://localhost:8000", Some("localhost:8000"), &[]));
        assert!(origin_allowed("https://example.com", Some("example.com"), &[]));
        assert!(!origin_allowed("https://evil.test", Some("example.com"), &[]));
        assert!(origin_allowed("https://coach.example.org", Some("example.com"), &trusted));
        assert!(!origin_allowed("null", Some("example.com"), &trusted));
        assert!(!origin_allowed("http://localhost:8000", None, &[]));
    }
}
