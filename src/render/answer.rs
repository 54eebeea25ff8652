// file: src/render/answer.rs
// description: places citation markers into the answer text for terminal and HTML output
// reference: https://docs.rs/pulldown-cmark

use crate::models::SearchResult;
use pulldown_cmark::{CowStr, Event, Options, Parser, TagEnd, html};
use std::collections::VecDeque;
use std::ops::Range;

/// `(char offset, source number)` pairs, ascending, without duplicates.
fn markers(result: &SearchResult) -> Vec<(usize, usize)> {
    let mut markers: Vec<(usize, usize)> = result
        .citations
        .iter()
        .filter_map(|c| Some((c.offset?, result.source_number(&c.file)?)))
        .collect();
    markers.sort_unstable();
    markers.dedup();
    markers
}

fn char_to_byte(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

fn insert_markers(text: &str, markers: &[(usize, usize)], render: impl Fn(usize) -> String) -> String {
    let mut out = String::with_capacity(text.len() + markers.len() * 8);
    let mut cursor = 0;

    for &(offset, number) in markers {
        let byte = char_to_byte(text, offset);
        out.push_str(&text[cursor..byte]);
        out.push_str(&render(number));
        cursor = byte;
    }

    out.push_str(&text[cursor..]);
    out
}

/// Answer with ` [n]` after each cited span, `n` being the source number.
pub fn annotate_plain(result: &SearchResult) -> String {
    insert_markers(&result.answer, &markers(result), |n| format!(" [{}]", n))
}

/// Answer rendered from markdown with citation badges. Raw HTML in the answer is escaped.
///
/// Badges are placed on parsed text, so an offset that lands inside markdown syntax
/// (a link destination, emphasis delimiters) moves to the nearest following text.
pub fn annotate_html(result: &SearchResult) -> String {
    let answer = result.answer.as_str();
    let mut pending: VecDeque<(usize, usize)> = markers(result)
        .into_iter()
        .map(|(offset, number)| (char_to_byte(answer, offset), number))
        .collect();

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let mut events = Vec::new();
    for (event, range) in Parser::new_ext(answer, options).into_offset_iter() {
        match event {
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                push_text(&mut events, text, answer, range, &mut pending);
            }
            Event::End(tag) if closes_block(&tag) => {
                flush_badges(&mut events, &mut pending, range.end);
                events.push(Event::End(tag));
            }
            other => events.push(other),
        }
    }
    flush_badges(&mut events, &mut pending, usize::MAX);

    let mut rendered = String::with_capacity(answer.len() * 2);
    html::push_html(&mut rendered, events.into_iter());
    rendered
}

fn badge(number: usize) -> Event<'static> {
    Event::Html(CowStr::from(format!(
        "<sup class=\"citation-badge\">[{}]</sup>",
        number
    )))
}

fn closes_block(tag: &TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::TableCell | TagEnd::CodeBlock
    )
}

fn flush_badges(events: &mut Vec<Event<'_>>, pending: &mut VecDeque<(usize, usize)>, until: usize) {
    while let Some(&(byte, number)) = pending.front() {
        if byte > until {
            break;
        }
        events.push(badge(number));
        pending.pop_front();
    }
}

/// Emits `text` as escaped text with any badges whose offset falls at or before its end.
fn push_text<'a>(
    events: &mut Vec<Event<'a>>,
    text: CowStr<'a>,
    source: &str,
    range: Range<usize>,
    pending: &mut VecDeque<(usize, usize)>,
) {
    let verbatim = source.get(range.clone()) == Some(&*text);
    let mut cursor = 0;

    while let Some(&(byte, number)) = pending.front() {
        if byte > range.end {
            break;
        }
        let at = if byte <= range.start {
            0
        } else if verbatim {
            byte - range.start
        } else {
            text.len()
        };
        if at > cursor {
            events.push(Event::Text(CowStr::from(text[cursor..at].to_string())));
            cursor = at;
        }
        events.push(badge(number));
        pending.pop_front();
    }

    if cursor == 0 {
        events.push(Event::Text(text));
    } else if cursor < text.len() {
        events.push(Event::Text(CowStr::from(text[cursor..].to_string())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Citation;
    use pretty_assertions::assert_eq;

    fn result(answer: &str, cites: &[(&str, Option<usize>)]) -> SearchResult {
        SearchResult {
            answer: answer.to_string(),
            citations: cites
                .iter()
                .enumerate()
                .map(|(index, (file, offset))| Citation {
                    index,
                    file: file.to_string(),
                    file_id: None,
                    quoted_text: None,
                    offset: *offset,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_markers_use_source_numbers() {
        let r = result(
            "Alpha. Beta. Gamma.",
            &[("a.pdf", Some(6)), ("b.pdf", Some(12)), ("a.pdf", Some(19))],
        );
        assert_eq!(annotate_plain(&r), "Alpha. [1] Beta. [2] Gamma. [1]");
    }

    #[test]
    fn test_plain_skips_citations_without_offset() {
        let r = result("Alpha.", &[("a.pdf", None)]);
        assert_eq!(annotate_plain(&r), "Alpha.");
    }

    #[test]
    fn test_plain_duplicate_markers_collapse() {
        let r = result("Alpha.", &[("a.pdf", Some(6)), ("a.pdf", Some(6))]);
        assert_eq!(annotate_plain(&r), "Alpha. [1]");
    }

    #[test]
    fn test_plain_handles_multibyte_offsets() {
        let r = result("café au lait", &[("menu.pdf", Some(4))]);
        assert_eq!(annotate_plain(&r), "café [1] au lait");
    }

    #[test]
    fn test_plain_offset_at_start() {
        let r = result("Alpha", &[("a.pdf", Some(0))]);
        assert_eq!(annotate_plain(&r), " [1]Alpha");
    }

    #[test]
    fn test_html_renders_markdown_and_badges() {
        let r = result("Deep research is **agentic**.", &[("a.pdf", Some(29))]);
        let html = annotate_html(&r);
        assert!(html.contains("<strong>agentic</strong>"));
        assert!(html.contains("agentic</strong>.<sup class=\"citation-badge\">[1]</sup>"));
    }

    #[test]
    fn test_html_offset_inside_link_destination_keeps_href() {
        let answer = "See [the docs](https://example.com/guide) for details.";
        let inside_url = answer.find("example").unwrap();
        let r = result(answer, &[("a.pdf", Some(inside_url))]);
        let html = annotate_html(&r);

        assert!(html.contains("<a href=\"https://example.com/guide\">the docs</a>"));
        assert!(html.contains("</a><sup class=\"citation-badge\">[1]</sup> for details."));
        assert!(!html.contains('\u{E000}'));
        assert!(!html.contains("%EE"));
    }

    #[test]
    fn test_html_offset_between_emphasis_delimiters() {
        let r = result("Deep research is **agentic**.", &[("a.pdf", Some(18))]);
        let html = annotate_html(&r);
        assert!(html.contains("<strong><sup class=\"citation-badge\">[1]</sup>agentic</strong>"));
    }

    #[test]
    fn test_html_badge_mid_text_and_at_block_end() {
        let r = result(
            "Alpha beta\n\n**Gamma**",
            &[("a.pdf", Some(5)), ("b.pdf", Some(21))],
        );
        let html = annotate_html(&r);
        assert!(html.contains("<p>Alpha<sup class=\"citation-badge\">[1]</sup> beta</p>"));
        assert!(html.contains("</strong><sup class=\"citation-badge\">[2]</sup></p>"));
    }

    #[test]
    fn test_html_escapes_raw_html() {
        let r = result("<script>alert(1)</script> and <b>bold</b>", &[]);
        let html = annotate_html(&r);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_html_ignores_marker_lookalikes_in_answer() {
        let r = result("odd \u{E000}7\u{E001} text", &[]);
        let html = annotate_html(&r);
        assert!(!html.contains("citation-badge"));
    }
}
