//! # MiniGameArchive
//!
//! 스포츠 훈련용 게임(연습 드릴) 카탈로그와 훈련 세션 플랜 빌더입니다.
//!
//! - 방문자는 게임을 검색/필터링하고, 카트에 담아 훈련 세션 초안을 만듭니다.
//! - 로그인한 사용자는 카트를 이름 붙인 훈련 세션으로 저장하고 편집합니다.
//! - 게임 카드와 세션은 명함 크기 카드로 인쇄할 수 있습니다.
//! - 누구나 새 게임을 제안하고, 관리자가 승인하면 카탈로그에 공개됩니다.
//!
//! 서버 실행 파일(main.rs)과 통합 테스트(tests/)가 이 라이브러리를 공유합니다.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{router, AppState};
