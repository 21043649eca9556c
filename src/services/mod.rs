//! # 비즈니스 로직 서비스 모듈
//!
//! DB에 직접 속하지 않는 로직을 모아둔 모듈입니다.
//!
//! - `cart`: 세션에 저장되는 카트(훈련 세션 초안)
//! - `flash`: 리다이렉트 후 한 번 보여주는 알림 메시지
//! - `forms`: 폼 본문 파싱과 필드 검증
//! - `i18n`: 번역 카탈로그와 로케일 협상
//! - `markdown`: 제한된 마크다운 → HTML 변환
//! - `templates`: minijinja 템플릿 환경

pub mod cart;
pub mod flash;
pub mod forms;
pub mod i18n;
pub mod markdown;
pub mod templates;
