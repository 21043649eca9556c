//! # 게임(Game) 모델 정의
//!
//! 카탈로그의 중심 엔티티인 게임(훈련용 연습 드릴)과
//! 그 선택지(인원 수, 소요 시간), 목록 필터, 페이지네이션 구조체를 정의합니다.
//!
//! ## 구조체 역할
//! - `PlayerCount` / `GameDuration`: 허용된 선택지만 표현하는 값 타입
//! - `Game`: DB의 `games` 테이블 한 행
//! - `GameDetail`: 게임 + 연결된 분류 태그(포커스, 준비물, 라벨, 언어)
//! - `GameInput` / `UpdateGameRequest`: 생성/수정 요청 본문
//! - `GameFilter`: 목록 화면의 검색/필터 조건
//! - `PageInfo`: 범위를 벗어난 페이지 번호를 바로잡는 페이지 계산

use std::{fmt, num::IntErrorKind, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{Language, Tag};

/// 한 페이지에 보여줄 게임 수
pub const GAMES_PER_PAGE: i64 = 12;

// ── 인원 수 선택지 ──

/// 게임에 필요한 인원 수 구간
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCount {
    OneToTwo,
    ThreeToFour,
    FiveToSix,
    SevenToEight,
    NineToTen,
    ElevenToTwelve,
    ThirteenPlus,
    Any,
}

impl PlayerCount {
    /// 화면의 선택 상자에 나열되는 순서
    pub const ALL: [PlayerCount; 8] = [
        PlayerCount::OneToTwo,
        PlayerCount::ThreeToFour,
        PlayerCount::FiveToSix,
        PlayerCount::SevenToEight,
        PlayerCount::NineToTen,
        PlayerCount::ElevenToTwelve,
        PlayerCount::ThirteenPlus,
        PlayerCount::Any,
    ];

    /// DB와 폼에 저장되는 값 (예: "5-6")
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerCount::OneToTwo => "1-2",
            PlayerCount::ThreeToFour => "3-4",
            PlayerCount::FiveToSix => "5-6",
            PlayerCount::SevenToEight => "7-8",
            PlayerCount::NineToTen => "9-10",
            PlayerCount::ElevenToTwelve => "11-12",
            PlayerCount::ThirteenPlus => "13+",
            PlayerCount::Any => "any",
        }
    }

    /// 번역 카탈로그의 키로도 쓰이는 영어 표시 이름
    pub fn label(self) -> &'static str {
        match self {
            PlayerCount::OneToTwo => "1-2 players",
            PlayerCount::ThreeToFour => "3-4 players",
            PlayerCount::FiveToSix => "5-6 players",
            PlayerCount::SevenToEight => "7-8 players",
            PlayerCount::NineToTen => "9-10 players",
            PlayerCount::ElevenToTwelve => "11-12 players",
            PlayerCount::ThirteenPlus => "13+ players",
            PlayerCount::Any => "Any number",
        }
    }
}

impl FromStr for PlayerCount {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlayerCount::ALL
            .into_iter()
            .find(|choice| choice.as_str() == s)
            .ok_or(())
    }
}

// ── 소요 시간 선택지 ──

/// 게임 소요 시간. `open_ended`가 true면 "N분 이상"(`N+min`)을 뜻합니다.
///
/// 총 소요 시간을 계산할 때 "N분 이상"은 최소값 N분으로 셉니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameDuration {
    pub minutes: u32,
    pub open_ended: bool,
}

impl GameDuration {
    /// 허용된 소요 시간 값 (화면 표시 순서)
    pub const CHOICES: [&'static str; 13] = [
        "5min", "10min", "15min", "20min", "30min", "45min", "60min", "90min", "120min",
        "10+min", "15+min", "20+min", "30+min",
    ];

    /// 표시 이름 (예: "15 minutes", "10+ minutes")
    pub fn label(self) -> String {
        if self.open_ended {
            format!("{}+ minutes", self.minutes)
        } else {
            format!("{} minutes", self.minutes)
        }
    }
}

impl fmt::Display for GameDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.open_ended {
            write!(f, "{}+min", self.minutes)
        } else {
            write!(f, "{}min", self.minutes)
        }
    }
}

impl FromStr for GameDuration {
    type Err = ();

    /// 선택지에 있는 값만 받아들입니다. "7min"처럼 목록에 없는 값은 거부합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::CHOICES.contains(&s) {
            return Err(());
        }
        let (number, open_ended) = match s.strip_suffix("+min") {
            Some(number) => (number, true),
            None => (s.strip_suffix("min").ok_or(())?, false),
        };
        let minutes = number.parse().map_err(|_| ())?;
        Ok(GameDuration { minutes, open_ended })
    }
}

// ── 게임 엔티티 ──

/// 게임 엔티티. DB의 `games` 테이블 한 행에 대응합니다.
///
/// `player_count`, `duration`은 문자열로 저장되며 쓰기 시점에 선택지 검증을 거칩니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub description: String,
    pub player_count: String,
    pub variants: String,
    pub duration: String,
    pub is_active: bool,
    pub is_suggestion: bool,
    pub approved: bool,
    pub created_by: Option<String>,
    pub suggested_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Game {
    /// 공개 카탈로그에 보이는 게임인지 여부
    pub fn is_public(&self) -> bool {
        self.is_active && !self.is_suggestion
    }

    /// 소요 시간(분). 저장된 값이 선택지가 아니면 0으로 셉니다.
    pub fn minutes(&self) -> u32 {
        self.duration
            .parse::<GameDuration>()
            .map(|d| d.minutes)
            .unwrap_or(0)
    }
}

/// 게임과 연결된 모든 분류 태그
///
/// `#[serde(flatten)]`: Game의 필드를 같은 JSON 객체 레벨로 펼칩니다.
#[derive(Debug, Clone, Serialize)]
pub struct GameDetail {
    #[serde(flatten)]
    pub game: Game,
    pub focus: Vec<Tag>,
    pub materials: Vec<Tag>,
    pub labels: Vec<Tag>,
    pub languages: Vec<Language>,
}

/// 게임 생성 요청 (관리자 API, 사용자 제안 폼 공용)
///
/// 다대다 관계 필드는 태그 ID 목록입니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub player_count: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub variants: String,
    #[serde(default)]
    pub focus: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

/// 게임 수정 요청: `PATCH /api/v1/games/{id}`
///
/// None인 필드는 변경하지 않습니다. 태그 목록을 보내면 기존 연결을 통째로 교체합니다.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGameRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub player_count: Option<String>,
    pub duration: Option<String>,
    pub variants: Option<String>,
    pub is_active: Option<bool>,
    pub focus: Option<Vec<String>>,
    pub materials: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
}

// ── 목록 필터 ──

/// 카탈로그 검색/필터 조건
///
/// 같은 항목 안의 여러 값은 OR, 서로 다른 항목끼리는 AND로 결합됩니다.
/// 다대다 필터(focus, materials, labels, languages)는 태그 **이름**으로 비교합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameFilter {
    pub search: String,
    pub focus: Vec<String>,
    pub materials: Vec<String>,
    pub labels: Vec<String>,
    pub languages: Vec<String>,
    pub player_count: Option<String>,
    pub duration: Option<String>,
}

impl GameFilter {
    /// 쿼리스트링에서 필터와 요청 페이지 번호(원문 그대로)를 읽어옵니다.
    ///
    /// `focus=a&focus=b`처럼 반복되는 키를 모두 모으기 위해 serde 대신
    /// `form_urlencoded`로 직접 파싱합니다. 빈 값은 무시합니다.
    pub fn from_query(query: &str) -> (Self, Option<String>) {
        let mut filter = GameFilter::default();
        let mut page = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim().to_string();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "search" => filter.search = value,
                "focus" => filter.focus.push(value),
                "materials" => filter.materials.push(value),
                "labels" => filter.labels.push(value),
                "languages" => filter.languages.push(value),
                "player_count" => filter.player_count = Some(value),
                "duration" => filter.duration = Some(value),
                "page" => page = Some(value),
                _ => {}
            }
        }

        (filter, page)
    }

    /// 페이지 링크에 붙일 쿼리스트링 (page 제외)
    pub fn to_query(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            serializer.append_pair("search", &self.search);
        }
        for (key, values) in [
            ("focus", &self.focus),
            ("materials", &self.materials),
            ("labels", &self.labels),
            ("languages", &self.languages),
        ] {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        if let Some(player_count) = &self.player_count {
            serializer.append_pair("player_count", player_count);
        }
        if let Some(duration) = &self.duration {
            serializer.append_pair("duration", duration);
        }
        serializer.finish()
    }
}

// ── 페이지네이션 ──

/// 현재 페이지 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub number: i64,
    pub num_pages: i64,
    pub total: i64,
    pub per_page: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageInfo {
    /// 요청된 페이지 번호를 유효한 범위로 맞춥니다.
    ///
    /// - 숫자가 아니거나 없으면 1페이지
    /// - 마지막 페이지를 넘거나 1보다 작으면 마지막 페이지 (i64를 넘치는 숫자 포함)
    /// - 결과가 0건이어도 페이지 수는 최소 1
    pub fn resolve(requested: Option<&str>, total: i64, per_page: i64) -> Self {
        let num_pages = ((total + per_page - 1) / per_page).max(1);
        let number = match requested.map(|p| p.trim().parse::<i64>()) {
            Some(Ok(n)) if (1..=num_pages).contains(&n) => n,
            Some(Ok(_)) => num_pages,
            Some(Err(e))
                if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) =>
            {
                num_pages
            }
            Some(Err(_)) | None => 1,
        };

        PageInfo {
            number,
            num_pages,
            total,
            per_page,
            has_previous: number > 1,
            has_next: number < num_pages,
        }
    }

    /// SQL OFFSET 값
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }
}

/// 한 페이지 분량의 결과
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_parse_only_listed_choices() {
        assert_eq!(
            "15min".parse::<GameDuration>(),
            Ok(GameDuration { minutes: 15, open_ended: false })
        );
        assert_eq!(
            "10+min".parse::<GameDuration>(),
            Ok(GameDuration { minutes: 10, open_ended: true })
        );
        assert!("7min".parse::<GameDuration>().is_err());
        assert!("5+min".parse::<GameDuration>().is_err());
        assert!("".parse::<GameDuration>().is_err());
    }

    #[test]
    fn every_duration_choice_round_trips_through_display() {
        for choice in GameDuration::CHOICES {
            let parsed: GameDuration = choice.parse().unwrap();
            assert_eq!(parsed.to_string(), choice);
        }
    }

    #[test]
    fn open_ended_durations_count_as_their_minimum() {
        let game = Game {
            id: "g".into(),
            name: "Fruit Bowl".into(),
            description: String::new(),
            player_count: "5-6".into(),
            variants: String::new(),
            duration: "30+min".into(),
            is_active: true,
            is_suggestion: false,
            approved: false,
            created_by: None,
            suggested_by: None,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(game.minutes(), 30);
        assert!(game.is_public());
    }

    #[test]
    fn player_counts_reject_unknown_values() {
        assert_eq!("13+".parse(), Ok(PlayerCount::ThirteenPlus));
        assert_eq!("any".parse(), Ok(PlayerCount::Any));
        assert!("2-3".parse::<PlayerCount>().is_err());
    }

    #[test]
    fn filter_collects_repeated_keys_and_skips_blanks() {
        let (filter, page) = GameFilter::from_query(
            "search=relay&focus=Passing&focus=Teamwork&materials=&player_count=9-10&page=2",
        );
        assert_eq!(filter.search, "relay");
        assert_eq!(filter.focus, vec!["Passing", "Teamwork"]);
        assert!(filter.materials.is_empty());
        assert_eq!(filter.player_count.as_deref(), Some("9-10"));
        assert_eq!(filter.duration, None);
        assert_eq!(page.as_deref(), Some("2"));
    }

    #[test]
    fn filter_query_string_round_trips() {
        let (filter, _) =
            GameFilter::from_query("search=a+b&labels=Fun&labels=Warmup&duration=10%2Bmin");
        assert_eq!(filter.duration.as_deref(), Some("10+min"));
        let (again, _) = GameFilter::from_query(&filter.to_query());
        assert_eq!(again, filter);
    }

    #[test]
    fn page_resolution_follows_get_page_rules() {
        assert_eq!(PageInfo::resolve(None, 30, 12).number, 1);
        assert_eq!(PageInfo::resolve(Some("abc"), 30, 12).number, 1);
        assert_eq!(PageInfo::resolve(Some("2"), 30, 12).number, 2);
        assert_eq!(PageInfo::resolve(Some("99"), 30, 12).number, 3);
        assert_eq!(PageInfo::resolve(Some("0"), 30, 12).number, 3);
        assert_eq!(PageInfo::resolve(Some("99999999999999999999"), 30, 12).number, 3);
        assert_eq!(PageInfo::resolve(Some("-99999999999999999999"), 30, 12).number, 3);

        let empty = PageInfo::resolve(Some("5"), 0, 12);
        assert_eq!((empty.number, empty.num_pages), (1, 1));
        assert!(!empty.has_next && !empty.has_previous);

        let middle = PageInfo::resolve(Some("2"), 30, 12);
        assert!(middle.has_previous && middle.has_next);
        assert_eq!(middle.offset(), 12);
    }
}
