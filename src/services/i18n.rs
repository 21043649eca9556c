//! # 다국어(i18n) 번역 카탈로그와 로케일 협상
//!
//! `LOCALE_DIR` 아래에 언어별 JSON 카탈로그가 하나씩 있습니다.
//!
//! ```json
//! { "name": "Deutsch", "messages": { "Training Session": "Trainingseinheit" } }
//! ```
//!
//! 메시지 키는 영어 원문입니다. 번역이 없으면 기본 언어(영어) 카탈로그,
//! 그래도 없으면 키 자체를 그대로 씁니다.
//!
//! 요청 로케일 결정 순서: 세션에 저장된 선택 → `Accept-Language` → 기본 언어

use std::{collections::HashMap, path::Path};

use serde::Deserialize;

/// 기본 언어
pub const DEFAULT_LANGUAGE: &str = "en";

/// 지원 언어 (코드, 표시 이름). 언어 선택 메뉴에 이 순서로 나옵니다.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("de", "Deutsch")];

/// 세션에 사용자의 언어 선택을 저장하는 키
pub const LANGUAGE_SESSION_KEY: &str = "language";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[allow(dead_code)]
    name: String,
    #[serde(default)]
    messages: HashMap<String, String>,
}

/// 로드된 모든 언어의 번역 메시지
#[derive(Debug, Default)]
pub struct Translations {
    catalogs: HashMap<&'static str, HashMap<String, String>>,
}

impl Translations {
    /// 지원 언어마다 `<dir>/<code>.json`을 읽습니다.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let mut catalogs = HashMap::new();
        for (code, _) in SUPPORTED_LANGUAGES {
            let path = dir.as_ref().join(format!("{code}.json"));
            let display = path.display().to_string();
            let raw = std::fs::read_to_string(&path).map_err(|source| CatalogError::Io {
                path: display.clone(),
                source,
            })?;
            let file: CatalogFile = serde_json::from_str(&raw)
                .map_err(|source| CatalogError::Parse { path: display, source })?;
            catalogs.insert(*code, file.messages);
        }
        Ok(Translations { catalogs })
    }

    /// 메시지를 번역합니다.
    pub fn translate<'a>(&'a self, lang: &str, key: &'a str) -> &'a str {
        self.lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANGUAGE, key))
            .unwrap_or(key)
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.catalogs
            .get(lang)
            .and_then(|messages| messages.get(key))
            .map(String::as_str)
    }

    /// 번역 후 `{name}` 형태의 자리표시자를 값으로 바꿉니다.
    pub fn format(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        let mut message = self.translate(lang, key).to_string();
        for (name, value) in args {
            message = message.replace(&format!("{{{name}}}"), value);
        }
        message
    }
}

/// 지원 언어 코드면 그 코드의 `'static` 참조를 돌려줍니다.
pub fn supported(code: &str) -> Option<&'static str> {
    let code = code.trim().to_ascii_lowercase();
    SUPPORTED_LANGUAGES
        .iter()
        .map(|(c, _)| *c)
        .find(|c| *c == code)
}

/// `Accept-Language` 헤더에서 지원 언어 중 가장 선호도가 높은 것을 고릅니다.
///
/// `de-CH;q=0.9, en;q=0.8`처럼 지역 코드가 붙으면 주 언어(`de`)만 비교합니다.
/// q=0 은 "원하지 않음"이므로 제외합니다.
pub fn negotiate(accept_language: &str) -> Option<&'static str> {
    let mut candidates: Vec<(f32, usize, &'static str)> = accept_language
        .split(',')
        .enumerate()
        .filter_map(|(index, part)| {
            let mut pieces = part.trim().split(';');
            let tag = pieces.next()?.trim();
            let quality = pieces
                .find_map(|p| p.trim().strip_prefix("q="))
                .map(|q| q.trim().parse::<f32>().unwrap_or(0.0))
                .unwrap_or(1.0);
            if quality <= 0.0 {
                return None;
            }
            let primary = tag.split('-').next()?;
            supported(primary).map(|code| (quality, index, code))
        })
        .collect();

    // 선호도 내림차순, 같으면 헤더에 먼저 나온 순서
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
    candidates.first().map(|(_, _, code)| *code)
}

/// 세션 선택 → Accept-Language → 기본 언어 순서로 로케일을 결정합니다.
pub fn resolve(session_choice: Option<&str>, accept_language: Option<&str>) -> &'static str {
    session_choice
        .and_then(supported)
        .or_else(|| accept_language.and_then(negotiate))
        .unwrap_or(DEFAULT_LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translations() -> Translations {
        let mut catalogs = HashMap::new();
        catalogs.insert(
            "en",
            HashMap::from([("Cart".to_string(), "Training Session".to_string())]),
        );
        catalogs.insert(
            "de",
            HashMap::from([(
                "Hello {name}".to_string(),
                "Hallo {name}".to_string(),
            )]),
        );
        Translations { catalogs }
    }

    #[test]
    fn translation_falls_back_to_default_then_key() {
        let t = translations();
        assert_eq!(t.translate("de", "Hello {name}"), "Hallo {name}");
        assert_eq!(t.translate("de", "Cart"), "Training Session");
        assert_eq!(t.translate("de", "Unknown"), "Unknown");
        assert_eq!(t.format("de", "Hello {name}", &[("name", "Coach")]), "Hallo Coach");
    }

    #[test]
    fn accept_language_prefers_highest_quality() {
        assert_eq!(negotiate("fr-FR, de-CH;q=0.9, en;q=0.8"), Some("de"));
        assert_eq!(negotiate("en-US,en;q=0.9,de;q=0.8"), Some("en"));
        assert_eq!(negotiate("de;q=0.5, en;q=0.7"), Some("en"));
        assert_eq!(negotiate("fr, es"), None);
        assert_eq!(negotiate("de;q=0"), None);
        assert_eq!(negotiate(""), None);
    }

    #[test]
    fn session_choice_wins_over_header() {
        assert_eq!(resolve(Some("de"), Some("en")), "de");
        assert_eq!(resolve(Some("xx"), Some("de")), "de");
        assert_eq!(resolve(None, None), DEFAULT_LANGUAGE);
    }

    #[test]
    fn supported_codes_are_case_insensitive() {
        assert_eq!(supported("DE"), Some("de"));
        assert_eq!(supported("fr"), None);
    }
}
