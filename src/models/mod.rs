//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `game`: 게임, 선택지(인원 수, 소요 시간), 목록 필터, 페이지네이션
//! - `tag`: 포커스/준비물/라벨 분류 태그
//! - `language`: 게임 설명 언어
//! - `session`: 훈련 세션과 세션 칸
//! - `suggestion`: 사용자 게임 제안과 검토 상태
//! - `user`: 사용자(User)와 인증 요청/응답
//! - `info`: 소개/임프레숨 안내 섹션
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Game`처럼 짧게 접근합니다.

pub mod game;
pub mod info;
pub mod language;
pub mod session;
pub mod suggestion;
pub mod tag;
pub mod user;

pub use game::*;
pub use info::*;
pub use language::*;
pub use session::*;
pub use suggestion::*;
pub use tag::*;
pub use user::*;
