//! Response screen rendering
//!
//! Renders the request line and phase, the response body (loading message,
//! error text, or pretty-printed JSON), and a footer with key hints.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use serde_json::Value;

use crate::app::App;
use fetchstate::{Phase, Transport};

/// Color for each request phase
fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Idle => Color::Gray,
        Phase::Loading => Color::Cyan,
        Phase::Success => Color::Green,
        Phase::Failure => Color::Red,
    }
}

/// Renders the whole response screen
pub fn render<Tr: Transport<Value> + 'static>(frame: &mut Frame, app: &App<Tr>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_body(frame, app, chunks[1]);
    render_footer(frame, chunks[2]);

    if app.show_help {
        super::render_help_overlay(frame);
    }
}

/// Request line with method, URL and phase badge
fn render_header<Tr: Transport<Value> + 'static>(frame: &mut Frame, app: &App<Tr>, area: Rect) {
    let descriptor = app.controller().descriptor();
    let phase = app.state().phase();

    let mut spans = vec![
        Span::styled(
            format!("{} ", descriptor.method()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(descriptor.url().to_string()),
        Span::raw("  "),
        Span::styled(
            format!("[{}]", phase),
            Style::default().fg(phase_color(phase)),
        ),
    ];
    if let Some(updated) = app.last_update {
        spans.push(Span::styled(
            format!("  updated {}", updated.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" fetchstate "),
    );
    frame.render_widget(header, area);
}

/// Text shown in the body for the current state
fn body_lines<Tr: Transport<Value> + 'static>(app: &App<Tr>) -> Vec<Line<'static>> {
    let state = app.state();
    match state.phase() {
        Phase::Idle => vec![Line::from(Span::styled(
            "Waiting to start...",
            Style::default().fg(Color::DarkGray),
        ))],
        Phase::Loading => vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Cyan),
        ))],
        Phase::Failure => {
            let message = state
                .error()
                .map(|error| error.to_string())
                .unwrap_or_default();
            vec![
                Line::from(Span::styled(
                    "Request failed",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(message),
                Line::from(""),
                Line::from(Span::styled(
                    "Press r to retry",
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        }
        Phase::Success => {
            let text = state
                .data()
                .map(|data| serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string()))
                .unwrap_or_default();
            text.lines().map(|line| Line::from(line.to_string())).collect()
        }
    }
}

fn render_body<Tr: Transport<Value> + 'static>(frame: &mut Frame, app: &App<Tr>, area: Rect) {
    let alignment = match app.state().phase() {
        Phase::Success => Alignment::Left,
        _ => Alignment::Center,
    };

    let body = Paragraph::new(body_lines(app))
        .block(Block::default().borders(Borders::ALL).title(" Response "))
        .alignment(alignment)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset, 0));
    frame.render_widget(body, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" retry  "),
        Span::styled("↑↓", Style::default().fg(Color::Yellow)),
        Span::raw(" scroll  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ]);
    frame.render_widget(Paragraph::new(hints), area);
}
