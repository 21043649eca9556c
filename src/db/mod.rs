//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `games`: 게임 카탈로그 조회/필터/CRUD
//! - `tags`: 포커스/준비물/라벨 CRUD 및 게임-태그 관계
//! - `languages`: 언어 목록과 게임-언어 관계
//! - `sessions`: 훈련 세션과 세션 칸
//! - `suggestions`: 사용자 게임 제안과 검토
//! - `users`: 사용자 인증 관련 쿼리
//! - `info`: 소개/임프레숨 안내 섹션
//! - `seed`: 샘플 데이터 적재

pub mod games;
pub mod info;
pub mod languages;
pub mod seed;
pub mod sessions;
pub mod suggestions;
pub mod tags;
pub mod users;

use sqlx::{
    migrate::Migrator,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;

/// 컴파일 타임에 ./migrations 폴더의 SQL 파일들을 바이너리에 포함시킵니다.
/// 서버와 통합 테스트가 같은 스키마를 사용합니다.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// SQLite 연결 풀을 만듭니다.
///
/// 외래키 제약(`ON DELETE CASCADE`)이 동작하도록 `foreign_keys`를 명시적으로 켭니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}
