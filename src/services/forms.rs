//! # HTML 폼 파싱과 검증
//!
//! 브라우저 폼(`application/x-www-form-urlencoded`)은 다중 선택 필드를
//! `focus=a&focus=b`처럼 같은 키로 반복해서 보냅니다. serde의 `Form`
//! 추출자는 이를 Vec으로 모으지 못하므로 `FormData`로 직접 파싱합니다.
//!
//! 검증 함수들은 JSON API와 HTML 폼이 함께 사용합니다.
//! 실패하면 `FieldErrors`(필드 → 메시지 목록)를 돌려주고, 메시지는 번역 카탈로그의 키입니다.

use crate::{
    error::{AppError, FieldErrors},
    models::{
        CreateSessionRequest, GameDuration, GameInput, PlayerCount, MAX_DURATION_MULTIPLIER,
        MIN_DURATION_MULTIPLIER,
    },
};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice.";
pub const NAME_TOO_LONG: &str = "Ensure this value has at most 200 characters.";
pub const DUPLICATE_GAME_NAME: &str = "A game with this name already exists.";
pub const EMPTY_CART: &str = "Your training session is empty. Add games before saving.";
pub const MULTIPLIER_RANGE: &str = "Duration multiplier must be between 0.5 and 3.0.";
pub const NEGATIVE_ORDER: &str = "Order must be zero or greater.";
pub const DUPLICATE_POSITION: &str = "This game is already at that position.";

/// 게임/세션 이름 최대 길이 (문자 수)
pub const MAX_NAME_LEN: usize = 200;

/// 파싱된 urlencoded 폼 본문. 키 순서와 반복을 그대로 보존합니다.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn parse(body: &[u8]) -> Self {
        let pairs = url::form_urlencoded::parse(body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        FormData { pairs }
    }

    /// 키의 첫 번째 값
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 키의 첫 번째 값 (없으면 빈 문자열, 앞뒤 공백 제거)
    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().trim().to_string()
    }

    /// 키의 모든 비어 있지 않은 값
    pub fn all(&self, key: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.trim().to_string())
            .collect()
    }
}

impl GameInput {
    /// 제안 폼에서 게임 입력을 읽습니다.
    pub fn from_form(form: &FormData) -> Self {
        GameInput {
            name: form.text("name"),
            description: form.text("description"),
            player_count: form.text("player_count"),
            duration: form.text("duration"),
            variants: form.text("variants"),
            focus: form.all("focus"),
            materials: form.all("materials"),
            labels: form.all("labels"),
            languages: form.all("languages"),
        }
    }

    /// 입력값의 앞뒤 공백을 정리하고 중복 태그 ID를 제거합니다.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();
        self.player_count = self.player_count.trim().to_string();
        self.duration = self.duration.trim().to_string();
        self.variants = self.variants.trim().to_string();
        for ids in [
            &mut self.focus,
            &mut self.materials,
            &mut self.labels,
            &mut self.languages,
        ] {
            dedup_preserving_order(ids);
        }
        self
    }
}

fn dedup_preserving_order(values: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    values.retain(|v| seen.insert(v.clone()));
}

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

/// 이름 필드 검증 (필수, 최대 200자)
pub fn check_name(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        push(errors, field, REQUIRED);
    } else if value.chars().count() > MAX_NAME_LEN {
        push(errors, field, NAME_TOO_LONG);
    }
}

/// 게임 입력 검증
///
/// 태그 ID가 실제로 존재하는지는 DB 계층에서 확인합니다.
pub fn validate_game(input: &GameInput) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();

    check_name(&mut errors, "name", &input.name);
    if input.description.trim().is_empty() {
        push(&mut errors, "description", REQUIRED);
    }
    check_player_count(&mut errors, &input.player_count);
    check_duration(&mut errors, &input.duration);
    if input.focus.is_empty() {
        push(&mut errors, "focus", REQUIRED);
    }

    into_result(errors)
}

pub fn check_player_count(errors: &mut FieldErrors, value: &str) {
    if value.is_empty() {
        push(errors, "player_count", REQUIRED);
    } else if value.parse::<PlayerCount>().is_err() {
        push(errors, "player_count", INVALID_CHOICE);
    }
}

pub fn check_duration(errors: &mut FieldErrors, value: &str) {
    if value.is_empty() {
        push(errors, "duration", REQUIRED);
    } else if value.parse::<GameDuration>().is_err() {
        push(errors, "duration", INVALID_CHOICE);
    }
}

/// 세션 저장 폼 검증. 장바구니(또는 game_ids)가 비어 있으면 실패합니다.
pub fn validate_session(input: &CreateSessionRequest) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    check_name(&mut errors, "name", &input.name);
    if input.game_ids.is_empty() {
        push(&mut errors, "games", EMPTY_CART);
    }
    into_result(errors)
}

/// 세션 칸의 순서와 시간 배율 검증
pub fn validate_entry(order: Option<i64>, multiplier: Option<f64>) -> Result<(), AppError> {
    let mut errors = FieldErrors::new();
    if matches!(order, Some(o) if o < 0) {
        push(&mut errors, "order", NEGATIVE_ORDER);
    }
    if let Some(m) = multiplier {
        if !(MIN_DURATION_MULTIPLIER..=MAX_DURATION_MULTIPLIER).contains(&m) {
            push(&mut errors, "duration_multiplier", MULTIPLIER_RANGE);
        }
    }
    into_result(errors)
}

pub fn into_result(errors: FieldErrors) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
