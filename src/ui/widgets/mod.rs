//! UI widgets
//!
//! Small rendering helpers shared by the screens.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
};

use crate::ecs::Pool;
use crate::game::{MessageCategory, MessageLog};

/// A `label [#####-----] cur/max` line
pub fn pool_bar(label: &str, pool: &Pool, width: usize, color: Color) -> Line<'static> {
    let max = pool.max.max(1) as usize;
    let filled = (pool.current.max(0) as usize * width) / max;
    let empty = width.saturating_sub(filled);
    Line::from(vec![
        Span::styled(format!("{:<3}", label), Style::default().fg(Color::Gray)),
        Span::styled("█".repeat(filled), Style::default().fg(color)),
        Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {}/{}", pool.current, pool.max)),
    ])
}

pub fn category_color(category: MessageCategory) -> Color {
    match category {
        MessageCategory::Combat => Color::Red,
        MessageCategory::Reward => Color::Yellow,
        MessageCategory::World => Color::White,
        MessageCategory::System => Color::Cyan,
        MessageCategory::Warning => Color::LightRed,
    }
}

/// The rolling log, oldest first
pub fn message_lines(log: &MessageLog) -> Vec<Line<'static>> {
    log.entries()
        .map(|entry| {
            Line::from(Span::styled(
                entry.to_string(),
                Style::default().fg(category_color(entry.category())),
            ))
        })
        .collect()
}

/// Create a centered rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
