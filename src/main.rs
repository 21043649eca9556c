//! # MiniGameArchive 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩과 설정 읽기
//! 2. 로깅(tracing) 초기화: 콘솔 + 일 단위 회전 로그 파일
//! 3. SQLite 연결 풀 생성과 마이그레이션
//! 4. 관리자 계정 생성, 샘플 데이터 적재 (설정된 경우)
//! 5. 번역 카탈로그와 템플릿 로딩
//! 6. 세션 스토어 준비와 만료 세션 정리 작업 시작
//! 7. 라우터 구성 후 HTTP 서버 시작

use std::{path::Path, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use minigame_archive::{
    config::Config,
    db,
    logging,
    middleware::auth::hash_password,
    routes::{self, AppState},
    services::{i18n::Translations, templates},
};
use tower_sessions::session_store::ExpiredDeletion;
use tower_sessions_sqlx_store::SqliteStore;

/// 만료된 방문자 세션을 지우는 주기
const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 설정 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // ── 2단계: 로깅 ──
    // guard가 drop되면 파일 로그 버퍼가 비워지지 않으므로 main 끝까지 들고 있습니다.
    let _log_guard = logging::init(&config)?;
    tracing::info!(
        debug = config.debug,
        "Starting MiniGameArchive on {}:{}",
        config.host,
        config.port
    );

    // ── 3단계: 데이터베이스 ──
    ensure_database_dir(&config.database_url).await?;
    let pool = db::connect(&config.database_url, 5).await?;

    tracing::info!("Running database migrations...");
    db::MIGRATOR.run(&pool).await?;

    // ── 4단계: 관리자 계정, 샘플 데이터 ──
    if let Some(admin) = &config.admin {
        let hash = hash_password(&admin.password)?;
        let (user, created) =
            db::users::ensure_superuser(&pool, &admin.username, admin.email.as_deref(), &hash).await?;
        if created {
            tracing::info!(user = %user.username, "Created admin user");
        }
    }
    if config.load_sample_data {
        db::seed::load_sample_data(&pool).await?;
    }

    // ── 5단계: 번역, 템플릿 ──
    let translations = Arc::new(
        Translations::load(&config.locale_dir)
            .with_context(|| format!("loading translations from {}", config.locale_dir))?,
    );
    let templates = Arc::new(templates::build(Arc::clone(&translations))?);

    // ── 6단계: 세션 스토어 ──
    let session_store = SqliteStore::new(pool.clone());
    session_store.migrate().await?;

    let cleanup_store = session_store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = cleanup_store.delete_expired().await {
                tracing::warn!("Failed to delete expired sessions: {}", e);
            }
        }
    });

    // ── 7단계: 라우터, 서버 ──
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState {
        pool,
        config: Arc::new(config),
        templates,
        translations,
    };
    let app = routes::router(state, session_store);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// `sqlite:data/app.db?mode=rwc` 같은 URL에서 파일의 상위 디렉토리를 만듭니다.
async fn ensure_database_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
            tracing::info!("Created database directory: {}", parent.display());
        }
    }
    Ok(())
}
