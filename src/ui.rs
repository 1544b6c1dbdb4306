/*
 * This file is part of Fanctl.
 *
 * Copyright (C) 2026 Fanctl contributors
 *
 * Fanctl is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Fanctl is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Fanctl. If not, see <https://www.gnu.org/licenses/>.
 */

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, Paragraph};

use crate::app::{App, ChannelRow};

/// Draw the whole session. No hardware I/O happens here; everything
/// rendered was fetched by the last refresh.
pub fn ui(f: &mut Frame, app: &App) {
    let size = f.area();

    if app.controller_missing() {
        let msg = format!(
            "{} not found (wrong hwmon directory?)\n\nPress q or Esc to quit.",
            app.controller.dir().display()
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Fan/Pump Control ");
        let para = Paragraph::new(msg)
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red));
        f.render_widget(para, size);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(size);

    let title = match &app.chip_name {
        Some(name) => format!(" Fan/Pump Control ({} @ {}) ", name, app.controller.dir().display()),
        None => format!(" Fan/Pump Control ({}) ", app.controller.dir().display()),
    };
    let privilege_line = if app.privileged {
        Line::from("Mode: root (writing allowed)")
    } else {
        Line::from(Span::styled(
            "Mode: not root (read-only, PWM changes are ignored)",
            Style::default().fg(Color::Yellow),
        ))
    };
    let status_line = if app.status.is_empty() {
        Line::from("Status: OK")
    } else {
        Line::from(Span::styled(
            format!("Status: {}", app.status),
            Style::default().fg(Color::Yellow),
        ))
    };
    let header_lines = vec![
        privilege_line,
        Line::from("q/Esc: quit | Tab/↑/↓: channel | ←/→/-/+: pwm ±8 | PgUp/PgDn: pwm ±32 | a: auto/manual | r: reset"),
        Line::from("Original controller settings are restored automatically on exit."),
        Line::from(""),
        status_line,
    ];
    let header = Paragraph::new(header_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title),
    );
    f.render_widget(header, layout[0]);

    let mut items: Vec<ListItem> = Vec::new();
    for (idx, row) in app.rows.iter().enumerate() {
        let selected = idx == app.selected;
        let mut item = ListItem::new(format_row(row, selected));
        if selected {
            item = item.style(Style::default().fg(Color::Cyan));
        }
        items.push(item);
    }
    if app.rows.is_empty() {
        items.push(ListItem::new("(no channels configured)"));
    }
    let channels = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Channels "),
    );
    f.render_widget(channels, layout[1]);
}

/// One display line per channel; absent values render as `?`.
pub fn format_row(row: &ChannelRow, selected: bool) -> String {
    let marker = if selected { ">" } else { " " };
    let duty = row
        .duty
        .map(|v| v.to_string())
        .unwrap_or_else(|| "?".to_string());
    let mode = row
        .mode
        .map(|m| m.label().to_string())
        .unwrap_or_else(|| "?".to_string());
    let tach = row
        .tach
        .map(|v| v.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!(
        "{} pwm{:<2}  duty {:>3}  mode {:<8}  rpm {:>5}",
        marker, row.id, duty, mode, tach
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwmon::PwmMode;

    #[test]
    fn test_format_row_full() {
        let row = ChannelRow {
            id: 1,
            duty: Some(152),
            mode: Some(PwmMode::Manual),
            tach: Some(1180),
        };
        assert_eq!(
            format_row(&row, true),
            "> pwm1   duty 152  mode MANUAL    rpm  1180"
        );
    }

    #[test]
    fn test_format_row_absent_values_render_as_question_marks() {
        let row = ChannelRow { id: 5, duty: None, mode: None, tach: None };
        let line = format_row(&row, false);
        assert!(line.starts_with("  pwm5"));
        assert!(line.contains("duty   ?"));
        assert!(line.contains("mode ?"));
        assert!(line.contains("rpm     ?"));
    }

    #[test]
    fn test_format_row_marker_tracks_selection() {
        let row = ChannelRow { id: 2, duty: Some(0), mode: Some(PwmMode::Auto), tach: None };
        assert!(format_row(&row, true).starts_with("> "));
        assert!(format_row(&row, false).starts_with("  "));
    }
}
