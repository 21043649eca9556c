//! # 샘플 데이터 적재
//!
//! `LOAD_SAMPLE_DATA=true`로 시작하면 서버가 마이그레이션 직후 이 모듈을 실행합니다.
//! 모든 항목은 이름으로 존재 여부를 확인한 뒤 없을 때만 만들어지므로
//! 여러 번 실행해도 결과가 같습니다(멱등).
//!
//! 적재 순서: 언어 → 포커스/준비물/라벨 → 게임 → 훈련 세션(관리자 소유) → 안내 섹션

use sqlx::SqlitePool;

use super::{games, info, languages, sessions, tags, users};
use crate::error::AppError;
use crate::models::*;

const LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("de", "Deutsch")];

const FOCUS_AREAS: &[&str] = &[
    "Dribbling",
    "Shooting",
    "Passing",
    "Defense",
    "Teamwork",
    "Conditioning",
    "Agility",
    "Speed",
    "Strength",
    "Coordination",
];

const MATERIALS: &[&str] = &[
    "Basketball",
    "Halfcourt",
    "Full Court",
    "Hoop",
    "Cones",
    "Stopwatch",
    "Whistle",
    "Wall",
    "Net",
    "Rebounder",
];

const LABELS: &[(&str, &str)] = &[
    ("Warmup", "#28a745"),
    ("Cool-down", "#6c757d"),
    ("Competitive", "#dc3545"),
    ("Fun", "#ffc107"),
    ("Advanced", "#6f42c1"),
    ("Beginner", "#17a2b8"),
];

struct SampleGame {
    name: &'static str,
    description: &'static str,
    player_count: &'static str,
    duration: &'static str,
    focus: &'static [&'static str],
    materials: &'static [&'static str],
    labels: &'static [&'static str],
    variants: &'static str,
}

const GAMES: &[SampleGame] = &[
    SampleGame {
        name: "Fruit Bowl",
        description: "Players dribble around cones while calling out different fruits. When \"banana\" is called, everyone must change direction. Great for dribbling skills and listening.",
        player_count: "5-6",
        duration: "10min",
        focus: &["Dribbling", "Coordination"],
        materials: &["Basketball", "Cones"],
        labels: &["Fun", "Beginner"],
        variants: "Add more fruits, increase speed, or add defensive players.",
    },
    SampleGame {
        name: "Sharks and Minnows",
        description: "One player is the shark in the middle. Other players (minnows) must dribble from one end to the other without getting their ball stolen. If caught, they become a shark.",
        player_count: "7-8",
        duration: "15min",
        focus: &["Dribbling", "Defense", "Agility"],
        materials: &["Basketball", "Halfcourt"],
        labels: &["Competitive", "Fun"],
        variants: "Add multiple balls, change the playing area, or add obstacles.",
    },
    SampleGame {
        name: "Around the World",
        description: "Players shoot from different spots around the court. Must make a shot from each spot before moving to the next. Great for shooting practice and accuracy.",
        player_count: "3-4",
        duration: "20min",
        focus: &["Shooting"],
        materials: &["Basketball", "Hoop"],
        labels: &["Advanced"],
        variants: "Add time limits, increase distance, or add defensive pressure.",
    },
    SampleGame {
        name: "Passing Relay",
        description: "Teams line up and pass the ball down the line. Last player dribbles to the front and the process continues. First team to get everyone through wins.",
        player_count: "9-10",
        duration: "10min",
        focus: &["Passing", "Teamwork"],
        materials: &["Basketball"],
        labels: &["Fun"],
        variants: "Add different types of passes, increase distance, or add obstacles.",
    },
    SampleGame {
        name: "Defensive Slides",
        description: "Players practice defensive stance and sliding movements. Coach calls out directions and players slide accordingly. Focus on proper defensive positioning.",
        player_count: "5-6",
        duration: "15min",
        focus: &["Defense", "Conditioning"],
        materials: &["Halfcourt"],
        labels: &["Beginner"],
        variants: "Add offensive players, increase speed, or add different defensive techniques.",
    },
];

const SESSIONS: &[(&str, &str, &[&str])] = &[
    (
        "Beginner Dribbling Session",
        "A focused session on dribbling fundamentals for beginners",
        &["Fruit Bowl", "Sharks and Minnows"],
    ),
    (
        "Advanced Shooting Session",
        "Advanced shooting practice with various drills",
        &["Around the World"],
    ),
    (
        "Team Building Session",
        "Focus on teamwork and passing skills",
        &["Passing Relay", "Sharks and Minnows"],
    ),
];

const INFO_SECTIONS: &[(InfoKind, &str, &str)] = &[
    (
        InfoKind::About,
        "Getting Started",
        "**Welcome to MiniGameArchive!**\n\n\
         This platform helps you organize and plan your sports training sessions:\n\n\
         1. **Browse Games**: use the search and filter options to find games that match your needs\n\
         2. **Add to Session**: click \"Add to Session\" on any game to include it in your training plan\n\
         3. **Review & Print**: check your session in the \"Training Session\" tab and print when ready\n\n\
         *Tip: you can filter games by focus area, player count, duration and materials.*",
    ),
    (
        InfoKind::About,
        "Custom Instructions",
        "**Custom Training Guidelines**\n\n\
         - **Warm up properly** before starting any session\n\
         - **Adapt games** to your players' skill levels\n\
         - **Keep it fun**, engagement is key to learning\n\
         - **Track progress** by saving your favourite sessions\n\n\
         > *The best sessions challenge players while keeping them engaged.*",
    ),
    (
        InfoKind::About,
        "Contact Information",
        "**Need Help?**\n\n\
         If you have questions or suggestions, contact the site operator at coach@example.com.",
    ),
    (
        InfoKind::Impressum,
        "Angaben gemäß § 5 TMG",
        "**Verantwortlich für den Inhalt:**\n\n\
         [Name des Betreibers]\n\
         [Adresse]\n\
         Deutschland\n\n\
         **Kontakt:** [E-Mail-Adresse]",
    ),
    (
        InfoKind::Impressum,
        "Haftung für Inhalte",
        "Die Inhalte unserer Seiten wurden mit größter Sorgfalt erstellt. \
         Für die Richtigkeit, Vollständigkeit und Aktualität der Inhalte können wir \
         jedoch keine Gewähr übernehmen.",
    ),
];

/// 적재 결과 요약 (새로 만든 항목 수)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub languages: usize,
    pub tags: usize,
    pub games: usize,
    pub sessions: usize,
    pub info_sections: usize,
}

/// 샘플 데이터를 적재합니다.
///
/// 관리자 계정이 없으면 훈련 세션은 건너뜁니다.
pub async fn load_sample_data(pool: &SqlitePool) -> Result<SeedReport, AppError> {
    let mut report = SeedReport::default();

    for (code, name) in LANGUAGES {
        if languages::find_by_code(pool, code).await?.is_none() {
            languages::create_language(
                pool,
                &CreateLanguageRequest {
                    code: code.to_string(),
                    name: name.to_string(),
                },
            )
            .await?;
            report.languages += 1;
        }
    }

    for name in FOCUS_AREAS {
        report.tags += ensure_tag(pool, TagKind::Focus, name, None).await? as usize;
    }
    for name in MATERIALS {
        report.tags += ensure_tag(pool, TagKind::Materials, name, None).await? as usize;
    }
    for (name, color) in LABELS {
        report.tags += ensure_tag(pool, TagKind::Labels, name, Some(*color)).await? as usize;
    }

    let owner = users::first_staff_user(pool).await?;
    let english = languages::find_by_code(pool, "en").await?;

    for sample in GAMES {
        if games::find_by_name(pool, sample.name).await?.is_some() {
            continue;
        }
        let input = GameInput {
            name: sample.name.to_string(),
            description: sample.description.to_string(),
            player_count: sample.player_count.to_string(),
            duration: sample.duration.to_string(),
            variants: sample.variants.to_string(),
            focus: tag_ids(pool, TagKind::Focus, sample.focus).await?,
            materials: tag_ids(pool, TagKind::Materials, sample.materials).await?,
            labels: tag_ids(pool, TagKind::Labels, sample.labels).await?,
            languages: english.iter().map(|l| l.id.clone()).collect(),
        };
        games::create_game(
            pool,
            &input,
            &games::NewGame {
                created_by: owner.as_ref().map(|u| u.id.as_str()),
                ..Default::default()
            },
        )
        .await?;
        tracing::debug!(game = sample.name, "Created sample game");
        report.games += 1;
    }

    match &owner {
        Some(owner) => {
            for (name, description, game_names) in SESSIONS {
                let existing: Option<String> = sqlx::query_scalar(
                    "SELECT id FROM training_sessions WHERE created_by = ? AND name = ?",
                )
                .bind(&owner.id)
                .bind(*name)
                .fetch_optional(pool)
                .await?;
                if existing.is_some() {
                    continue;
                }

                let mut game_ids = Vec::new();
                for game_name in *game_names {
                    if let Some(game) = games::find_by_name(pool, game_name).await? {
                        game_ids.push(game.id);
                    }
                }
                sessions::create_session(
                    pool,
                    &owner.id,
                    &CreateSessionRequest {
                        name: name.to_string(),
                        description: description.to_string(),
                        game_ids,
                    },
                )
                .await?;
                report.sessions += 1;
            }
        }
        None => tracing::warn!("No staff user exists, skipping sample training sessions"),
    }

    for (index, (kind, title, content)) in INFO_SECTIONS.iter().enumerate() {
        if info::find_by_title(pool, *kind, title).await?.is_some() {
            continue;
        }
        info::create_section(
            pool,
            &CreateInfoRequest {
                kind: *kind,
                title: title.to_string(),
                content: content.to_string(),
                is_active: Some(true),
                sort_order: Some(index as i64 + 1),
            },
        )
        .await?;
        report.info_sections += 1;
    }

    tracing::info!(?report, "Sample data loaded");
    Ok(report)
}

/// 태그가 없으면 만듭니다. 새로 만들었으면 true
async fn ensure_tag(
    pool: &SqlitePool,
    kind: TagKind,
    name: &str,
    color: Option<&str>,
) -> Result<bool, AppError> {
    if tags::find_tag_by_name(pool, kind, name).await?.is_some() {
        return Ok(false);
    }
    tags::create_tag(
        pool,
        kind,
        &CreateTagRequest {
            name: name.to_string(),
            description: None,
            color: color.map(str::to_string),
        },
    )
    .await?;
    Ok(true)
}

/// 이름 목록을 태그 ID 목록으로 바꿉니다. 없는 이름은 경고만 남기고 건너뜁니다.
async fn tag_ids(pool: &SqlitePool, kind: TagKind, names: &[&str]) -> Result<Vec<String>, AppError> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        match tags::find_tag_by_name(pool, kind, name).await? {
            Some(tag) => ids.push(tag.id),
            None => tracing::warn!(kind = kind.as_str(), name, "Sample tag not found"),
        }
    }
    Ok(ids)
}
