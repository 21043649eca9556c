//! # HTML 템플릿 환경
//!
//! minijinja(Jinja2 문법) 환경을 만들고 템플릿 파일을 바이너리에 포함시킵니다.
//! `.html` 이름의 템플릿은 자동으로 HTML 이스케이프가 적용됩니다.
//!
//! 템플릿에서 쓸 수 있는 것:
//! - `t("Message {name}", name=value)`: 현재 로케일로 번역 (컨텍스트의 `lang` 사용)
//! - `|markdown`: 제한된 마크다운 렌더링 (`services::markdown`)
//! - `|player_count_label`, `|duration_label`: 선택지 값을 번역된 표시 이름으로
//! - 전역 `player_count_choices`, `duration_choices`, `supported_languages`

use std::sync::Arc;

use minijinja::{
    context,
    value::{merge_maps, Kwargs},
    Environment, Error, State, Value,
};

use super::{
    i18n::{Translations, DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES},
    markdown,
};
use crate::{
    error::AppError,
    models::{GameDuration, PlayerCount},
};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("game_list.html", include_str!("../../templates/game_list.html")),
    ("game_detail.html", include_str!("../../templates/game_detail.html")),
    ("cart.html", include_str!("../../templates/cart.html")),
    ("session_list.html", include_str!("../../templates/session_list.html")),
    ("session_detail.html", include_str!("../../templates/session_detail.html")),
    ("game_suggestion.html", include_str!("../../templates/game_suggestion.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("print_cards.html", include_str!("../../templates/print_cards.html")),
    ("print_game.html", include_str!("../../templates/print_game.html")),
    ("print_session.html", include_str!("../../templates/print_session.html")),
    ("error.html", include_str!("../../templates/error.html")),
];

/// 현재 렌더링 중인 템플릿의 로케일
fn current_lang(state: &State) -> String {
    state
        .lookup("lang")
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

/// 템플릿 환경을 만듭니다.
pub fn build(translations: Arc<Translations>) -> Result<Environment<'static>, Error> {
    let mut env = Environment::new();
    for &(name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }

    env.add_filter("markdown", |text: &str| {
        Value::from_safe_string(markdown::render(text))
    });

    let t = Arc::clone(&translations);
    env.add_function(
        "t",
        move |state: &State, key: &str, kwargs: Kwargs| -> Result<String, Error> {
            let lang = current_lang(state);
            let mut message = t.translate(&lang, key).to_string();
            let names: Vec<String> = kwargs.args().map(str::to_string).collect();
            for name in names {
                let value: Value = kwargs.get(&name)?;
                message = message.replace(&format!("{{{name}}}"), &value.to_string());
            }
            kwargs.assert_all_used()?;
            Ok(message)
        },
    );

    let t = Arc::clone(&translations);
    env.add_filter("player_count_label", move |state: &State, value: &str| -> String {
        match value.parse::<PlayerCount>() {
            Ok(choice) => t.translate(&current_lang(state), choice.label()).to_string(),
            Err(()) => value.to_string(),
        }
    });

    let t = Arc::clone(&translations);
    env.add_filter("duration_label", move |state: &State, value: &str| -> String {
        match value.parse::<GameDuration>() {
            Ok(duration) => {
                let key = if duration.open_ended {
                    "{minutes}+ minutes"
                } else {
                    "{minutes} minutes"
                };
                t.format(
                    &current_lang(state),
                    key,
                    &[("minutes", &duration.minutes.to_string())],
                )
            }
            Err(()) => value.to_string(),
        }
    });

    env.add_global(
        "player_count_choices",
        Value::from_serialize(PlayerCount::ALL.map(PlayerCount::as_str)),
    );
    env.add_global("duration_choices", Value::from_serialize(GameDuration::CHOICES));
    env.add_global(
        "supported_languages",
        Value::from_serialize(
            SUPPORTED_LANGUAGES
                .iter()
                .map(|(code, name)| context! { code => code, name => name })
                .collect::<Vec<_>>(),
        ),
    );

    Ok(env)
}

/// 공통 컨텍스트 위에 페이지별 컨텍스트를 얹습니다.
/// minijinja는 뒤쪽 맵을 먼저 찾으므로 같은 키가 있으면 `ctx` 값이 쓰입니다.
pub fn with_base(base: Value, ctx: Value) -> Value {
    merge_maps([base, ctx])
}

/// 템플릿을 렌더링합니다.
pub fn render(env: &Environment<'_>, name: &str, ctx: Value) -> Result<String, AppError> {
    let template = env.get_template(name)?;
    Ok(template.render(ctx)?)
}
