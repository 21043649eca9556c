//! # 미들웨어와 요청 추출기
//!
//! - `auth`: JWT/세션 인증 추출기(`AuthUser`, `StaffUser`, `LoginRequired`), 비밀번호 해싱
//! - `locale`: 요청 로케일 결정과 `Content-Language` 헤더
//! - `security`: Host 헤더와 Origin 검사
//! - `error_page`: 페이지 라우트의 에러 응답을 HTML 에러 페이지로 변환

pub mod auth;
pub mod error_page;
pub mod locale;
pub mod security;
