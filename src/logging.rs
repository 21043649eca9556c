//! # 로깅(tracing) 초기화 모듈
//!
//! 개발 모드와 프로덕션 모드에서 서로 다른 로그 출력을 구성합니다.
//!
//! | 모드 | 콘솔 | 파일 (`LOG_DIR/minigamearchive.log.YYYY-MM-DD`) |
//! |------|------|------|
//! | DEBUG | 사람이 읽는 포맷, debug 레벨 | JSON, 같은 필터 |
//! | 프로덕션 | JSON, info 레벨 | JSON, 같은 필터 |
//!
//! `RUST_LOG` 환경변수가 있으면 기본 필터 대신 그 값을 사용합니다.

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::Config;

/// 로그 파일 이름 접두사
const LOG_FILE_PREFIX: &str = "minigamearchive.log";

/// 모드별 기본 로그 필터
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "minigame_archive=debug,tower_http=debug"
    } else {
        "minigame_archive=info,tower_http=info"
    }
}

/// 전역 tracing 구독자(subscriber)를 등록합니다.
///
/// 반환된 `WorkerGuard`는 main이 끝날 때까지 살아 있어야 합니다.
/// guard가 drop되면 non-blocking 파일 writer의 버퍼가 비워지고 기록이 멈춥니다.
pub fn init(config: &Config) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir)?;

    // 일 단위 회전 파일 + 백그라운드 스레드에서 쓰는 non-blocking writer
    let appender = rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config.debug)));

    // 콘솔 레이어: 개발 모드는 사람이 읽는 포맷, 프로덕션은 JSON
    // 타입이 서로 다르므로 boxed()로 통일합니다.
    let console = if config.debug {
        fmt::layer().with_target(true).boxed()
    } else {
        fmt::layer().json().with_current_span(false).boxed()
    };

    let file = fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_mode_logs_more_than_production() {
        assert!(default_filter(true).contains("=debug"));
        assert!(default_filter(false).contains("=info"));
        assert!(!default_filter(false).contains("debug"));
    }
}
