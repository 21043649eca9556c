//! # 제한된 마크다운 렌더링
//!
//! 게임 설명, 변형 규칙, 안내 섹션의 마크다운을 HTML로 변환합니다.
//!
//! 허용되는 결과 태그는 문단, 줄바꿈, 강조(strong/em), 목록, 인용, 코드뿐입니다.
//! - 제목(`# ...`)은 일반 문단으로 바뀝니다.
//! - 링크와 이미지는 태그를 버리고 텍스트(이미지는 대체 텍스트)만 남깁니다.
//! - 원시 HTML은 이스케이프된 텍스트로 출력됩니다.
//! - 문단 안의 줄바꿈은 `<br />`로 유지됩니다 (카드 인쇄 시 줄 구성이 그대로 보이도록).
//!
//! pulldown-cmark는 파서가 이벤트 스트림을 내보내고, `html::push_html`이
//! 그 이벤트를 HTML로 씁니다. 중간에서 이벤트를 바꾸거나 버려서 태그를 제한합니다.

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

/// 마크다운을 제한된 HTML로 변환합니다. 빈 입력이면 빈 문자열
pub fn render(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    // 표, 각주, 취소선 등 확장 문법은 켜지 않습니다.
    let parser = Parser::new_ext(text, Options::empty());
    let events = parser.filter_map(restrict);

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// 이벤트 하나를 허용 태그 집합 안으로 옮깁니다. None이면 버립니다.
fn restrict(event: Event<'_>) -> Option<Event<'_>> {
    match event {
        Event::Start(Tag::Heading { .. }) => Some(Event::Start(Tag::Paragraph)),
        Event::End(TagEnd::Heading(_)) => Some(Event::End(TagEnd::Paragraph)),

        Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::HtmlBlock)
        | Event::End(TagEnd::Link | TagEnd::Image | TagEnd::HtmlBlock) => None,

        Event::Html(raw) | Event::InlineHtml(raw) => Some(Event::Text(raw)),
        Event::SoftBreak => Some(Event::HardBreak),
        Event::Rule => None,

        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emphasis_and_lists_survive() {
        let html = render("**Fast** and *low*\n\n- one\n- two");
        assert!(html.contains("<strong>Fast</strong>"));
        assert!(html.contains("<em>low</em>"));
        assert!(html.contains("<ul>"));
        assert!(html.contains("<li>two</li>"));
    }

    #[test]
    fn headings_become_paragraphs() {
        let html = render("# Setup\nPlace cones");
        assert!(!html.contains("<h1"));
        assert!(html.contains("<p>Setup</p>"));
    }

    #[test]
    fn links_and_images_keep_only_text() {
        let html = render("See [the court](https://example.com) ![diagram](court.png)");
        assert!(!html.contains("<a"));
        assert!(!html.contains("<img"));
        assert!(html.contains("the court"));
        assert!(html.contains("diagram"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render("Hello <script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));

        let block = render("<div onclick=\"x()\">box</div>");
        assert!(!block.contains("<div"));
    }

    #[test]
    fn single_newlines_become_line_breaks() {
        let html = render("first line\nsecond line");
        assert!(html.contains("first line<br />"));
    }

    #[test]
    fn blank_input_renders_nothing() {
        assert_eq!(render("   \n"), "");
    }
}
