//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로
//! - `SECRET_KEY`: JWT 서명 비밀키 (프로덕션 모드에서 필수)
//! - `HOST` / `PORT`: 서버 바인딩 주소
//! - `DEBUG`: 개발 모드 토글 (로그 포맷, 에러 페이지 상세 표시)
//! - `ALLOWED_HOSTS`: 허용할 Host 헤더 목록 (쉼표 구분, `*`는 전체 허용)
//! - `CSRF_TRUSTED_ORIGINS`: 교차 출처 폼 전송을 허용할 Origin 목록
//! - `LOG_DIR` / `LOCALE_DIR`: 로그 파일, 번역 카탈로그 디렉토리
//! - `SESSION_IDLE_DAYS`: 방문자 세션(장바구니)의 비활성 만료 기간
//! - `LOAD_SAMPLE_DATA`: 시작 시 샘플 데이터 적재 여부
//! - `ADMIN_USERNAME` / `ADMIN_PASSWORD` / `ADMIN_EMAIL`: 최초 관리자 계정

use std::env;

/// 개발 모드에서 `SECRET_KEY`가 없을 때 쓰는 키. 프로덕션에서는 절대 쓰이지 않습니다.
const DEVELOPMENT_SECRET_KEY: &str = "minigamearchive-insecure-development-key";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SECRET_KEY must be set when DEBUG is off")]
    MissingSecretKey,
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// 최초 관리자(superuser) 계정 정보
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
}

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/minigamearchive.db?mode=rwc")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub secret_key: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 8000)
    pub port: u16,
    /// 개발 모드 여부. false면 프로덕션 모드입니다.
    pub debug: bool,
    /// 허용할 Host 헤더 값 목록
    pub allowed_hosts: Vec<String>,
    /// 교차 출처 요청을 허용할 Origin 목록 (예: "https://coach.example.com")
    pub csrf_trusted_origins: Vec<String>,
    /// 로그 파일 디렉토리
    pub log_dir: String,
    /// 번역 카탈로그(JSON) 디렉토리
    pub locale_dir: String,
    /// 정적 파일(CSS, JS) 디렉토리
    pub static_dir: String,
    /// 세션 비활성 만료 기간 (일)
    pub session_idle_days: i64,
    /// 시작 시 샘플 데이터를 적재할지 여부
    pub load_sample_data: bool,
    /// 최초 관리자 계정 (둘 다 설정된 경우에만 Some)
    pub admin: Option<AdminBootstrap>,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// - 프로덕션 모드(`DEBUG`가 꺼짐)에서 `SECRET_KEY`가 없으면 에러
    /// - `PORT`, `SESSION_IDLE_DAYS`가 숫자가 아니면 에러
    pub fn from_env() -> Result<Self, ConfigError> {
        let debug = env_flag("DEBUG");

        let secret_key = match env::var("SECRET_KEY") {
            Ok(key) if !key.is_empty() => key,
            _ if debug => DEVELOPMENT_SECRET_KEY.to_string(),
            _ => return Err(ConfigError::MissingSecretKey),
        };

        let admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap {
                    username,
                    password,
                    email: env::var("ADMIN_EMAIL").ok().filter(|e| !e.is_empty()),
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/minigamearchive.db?mode=rwc".to_string()),
            secret_key,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 8000)?,
            debug,
            allowed_hosts: env_list("ALLOWED_HOSTS")
                .unwrap_or_else(|| vec!["localhost".to_string(), "127.0.0.1".to_string()]),
            csrf_trusted_origins: env_list("CSRF_TRUSTED_ORIGINS").unwrap_or_default(),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            locale_dir: env::var("LOCALE_DIR").unwrap_or_else(|_| "locale".to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
            session_idle_days: parse_var("SESSION_IDLE_DAYS", 14)?,
            load_sample_data: env_flag("LOAD_SAMPLE_DATA"),
            admin,
        })
    }
}

/// "1", "true", "yes", "on" (대소문자 무시)를 참으로 해석합니다.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// 쉼표로 구분된 목록을 파싱합니다. 빈 항목은 버립니다.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_flag(name: &str) -> bool {
    env::var(name).map(|v| parse_flag(&v)).unwrap_or(false)
}

fn env_list(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|v| parse_list(&v))
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_truthy_spellings() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("production"));
    }

    #[test]
    fn lists_are_trimmed_and_skip_empty_items() {
        assert_eq!(
            parse_list("example.com, .example.org,,localhost "),
            vec!["example.com", ".example.org", "localhost"]
        );
        assert!(parse_list(" , ").is_empty());
    }
}
