//! Chat TUI rendering with ratatui.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::ChatState;
use super::markdown;

/// Draw the entire chat TUI.
pub fn draw(f: &mut Frame, state: &ChatState) {
    let area = f.area();

    let thinking_height = if state.panels.thinking.is_empty() {
        3
    } else if state.panels.thinking_collapsed && !state.thinking_expanded {
        3
    } else {
        8
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),                    // Transcript
            Constraint::Length(thinking_height),   // Thinking
            Constraint::Length(8),                 // Answer
            Constraint::Length(3),                 // Input
            Constraint::Length(1),                 // Status
        ])
        .split(area);

    draw_transcript(f, chunks[0], state);
    draw_thinking(f, chunks[1], state);
    draw_answer(f, chunks[2], state);
    draw_input(f, chunks[3], state);
    draw_status(f, chunks[4], state);
}

/// Draw the chat log region.
fn draw_transcript(f: &mut Frame, area: Rect, state: &ChatState) {
    let text = markdown::render(&state.panels.transcript_text);
    let paragraph = scrolled(text, area, state)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Chat ")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

/// Stick to the bottom unless the user scrolled away.
fn scrolled<'a>(text: Text<'a>, area: Rect, state: &ChatState) -> Paragraph<'a> {
    let total = text.lines.len() as u16;
    let inner = area.height.saturating_sub(2);
    let bottom = total.saturating_sub(inner);
    let offset = if state.panels.stick_to_bottom {
        bottom
    } else {
        bottom.saturating_sub(state.scroll_offset)
    };
    Paragraph::new(text).scroll((offset, 0))
}

/// Draw the thinking region.
fn draw_thinking(f: &mut Frame, area: Rect, state: &ChatState) {
    let collapsed = state.panels.thinking_collapsed && !state.thinking_expanded;

    let (title, body): (&str, Text) = if state.panels.thinking.is_empty() {
        (" Thinking ", Text::default())
    } else if collapsed {
        (
            " Thinking (done) ",
            Text::from(Line::from(Span::styled(
                "… Ctrl+T to expand",
                Style::default().fg(Color::DarkGray),
            ))),
        )
    } else if state.panels.thinking_collapsed {
        // Expanded collapsible block shows the raw accumulated text.
        (" Thinking (done) ", Text::raw(state.panels.thinking.clone()))
    } else {
        (" Thinking… ", markdown::render(&state.panels.thinking))
    };

    let paragraph = Paragraph::new(body)
        .style(Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

/// Draw the answer region.
fn draw_answer(f: &mut Frame, area: Rect, state: &ChatState) {
    let text = markdown::render(&state.panels.answer);
    let total = text.lines.len() as u16;
    let inner = area.height.saturating_sub(2);
    let offset = if state.panels.stick_to_bottom {
        total.saturating_sub(inner)
    } else {
        0
    };
    let paragraph = Paragraph::new(text)
        .scroll((offset, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Answer ")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

/// Draw the input line with the mode indicator.
fn draw_input(f: &mut Frame, area: Rect, state: &ChatState) {
    let title = format!(" Message ─ mode: {} (Tab cycles) ", state.mode);
    let spinner = if state.busy { " ⣾" } else { "" };
    let line = Line::from(vec![
        Span::raw(state.input.clone()),
        Span::styled("▏", Style::default().fg(Color::Cyan)),
        Span::styled(spinner, Style::default().fg(Color::Cyan)),
    ]);
    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, area);
}

/// Draw the status line: a pending alert, or the key hints.
fn draw_status(f: &mut Frame, area: Rect, state: &ChatState) {
    let line = match &state.status {
        Some(alert) => Line::from(Span::styled(
            format!(" {} ", alert),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            " Enter send · Tab mode · Ctrl+E export · Ctrl+T thinking · Esc quit ",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}
