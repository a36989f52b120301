//! Minimal markdown rendering for the chat panels.
//!
//! Covers what chat responses actually use: headings, bullets, bold and
//! inline code. Everything else passes through as plain text.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

/// Render markdown-ish text into styled lines.
pub fn render(text: &str) -> Text<'static> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        if let Some(rest) = heading(raw) {
            lines.push(Line::from(Span::styled(
                rest.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
        } else if let Some(rest) = bullet(raw) {
            let mut spans = vec![Span::raw("  • ")];
            spans.extend(parse_inline(rest));
            lines.push(Line::from(spans));
        } else {
            lines.push(Line::from(parse_inline(raw)));
        }
    }
    Text::from(lines)
}

/// Strip a heading prefix, if any.
fn heading(line: &str) -> Option<&str> {
    for prefix in ["### ", "## ", "# "] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Some(rest);
        }
    }
    None
}

/// Strip a bullet prefix, if any.
fn bullet(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
}

/// Split a line into plain, `**bold**`, and `` `code` `` spans.
fn parse_inline(line: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut rest = line;
    loop {
        let bold_at = rest.find("**");
        let code_at = rest.find('`');
        let next = match (bold_at, code_at) {
            (Some(b), Some(c)) if b <= c => Marker::Bold(b),
            (_, Some(c)) => Marker::Code(c),
            (Some(b), None) => Marker::Bold(b),
            (None, None) => {
                if !rest.is_empty() {
                    spans.push(Span::raw(rest.to_string()));
                }
                break;
            }
        };
        match next {
            Marker::Bold(at) => {
                let (before, tail) = rest.split_at(at);
                if !before.is_empty() {
                    spans.push(Span::raw(before.to_string()));
                }
                let tail = &tail[2..];
                match tail.find("**") {
                    Some(end) => {
                        spans.push(Span::styled(
                            tail[..end].to_string(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ));
                        rest = &tail[end + 2..];
                    }
                    None => {
                        // Unclosed marker renders literally.
                        spans.push(Span::raw(format!("**{}", tail)));
                        break;
                    }
                }
            }
            Marker::Code(at) => {
                let (before, tail) = rest.split_at(at);
                if !before.is_empty() {
                    spans.push(Span::raw(before.to_string()));
                }
                let tail = &tail[1..];
                match tail.find('`') {
                    Some(end) => {
                        spans.push(Span::styled(
                            tail[..end].to_string(),
                            Style::default().fg(Color::Yellow),
                        ));
                        rest = &tail[end + 1..];
                    }
                    None => {
                        spans.push(Span::raw(format!("`{}", tail)));
                        break;
                    }
                }
            }
        }
    }
    spans
}

enum Marker {
    Bold(usize),
    Code(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let text = render("just words");
        assert_eq!(text.lines.len(), 1);
        assert_eq!(text.lines[0].spans[0].content, "just words");
    }

    #[test]
    fn test_heading_is_styled() {
        let text = render("## Results");
        let span = &text.lines[0].spans[0];
        assert_eq!(span.content, "Results");
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_bullet_gets_marker() {
        let text = render("- first point");
        assert_eq!(text.lines[0].spans[0].content, "  • ");
        assert_eq!(text.lines[0].spans[1].content, "first point");
    }

    #[test]
    fn test_bold_span_is_split_out() {
        let spans = parse_inline("a **b** c");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content, "b");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_code_span_is_styled() {
        let spans = parse_inline("run `cargo bench` now");
        assert_eq!(spans[1].content, "cargo bench");
        assert_eq!(spans[1].style.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_unclosed_bold_renders_literally() {
        let spans = parse_inline("a **b");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].content, "**b");
    }

    #[test]
    fn test_multiline_input() {
        let text = render("# Title\nbody\n- item");
        assert_eq!(text.lines.len(), 3);
    }
}
