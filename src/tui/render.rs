//! Pure rendering of the shell state.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::{EditMode, NodeKind};
use crate::models::mode::SwitchPrompt;

use super::app::{Dialog, Focus, ShellApp};

pub fn draw(app: &mut ShellApp, frame: &mut Frame) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(1)])
        .split(outer[0]);

    draw_explorer(app, frame, panes[0]);
    draw_editor(app, frame, panes[1]);
    draw_status(app, frame, outer[1]);
    draw_dialog(app, frame, outer[0]);
}

fn draw_explorer(app: &mut ShellApp, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Explorer;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("explorer")
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = app.rows();
    let selected = app.workspace().selected();

    let height = inner.height as usize;
    if let Some(index) = selected.and_then(|sel| rows.iter().position(|r| r.id == sel)) {
        if index < app.explorer_scroll {
            app.explorer_scroll = index;
        } else if height > 0 && index >= app.explorer_scroll + height {
            app.explorer_scroll = index + 1 - height;
        }
    }

    let lines: Vec<Line> = rows
        .iter()
        .skip(app.explorer_scroll)
        .take(height)
        .map(|row| {
            let indent = "  ".repeat(row.depth as usize);
            let icon = match row.kind {
                NodeKind::Folder => {
                    if row.is_expanded {
                        "▼ "
                    } else {
                        "▶ "
                    }
                }
                _ => "  ",
            };
            let text = format!("{}{}{}", indent, icon, row.name.to_string_lossy());

            let style = if Some(row.id) == selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else if row.kind == NodeKind::Folder {
                Style::default().fg(Color::Blue)
            } else {
                Style::default()
            };
            Line::from(Span::styled(text, style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_editor(app: &mut ShellApp, frame: &mut Frame, area: Rect) {
    let focused = app.focus == Focus::Editor;
    let (title, editable) = {
        let workspace = app.workspace();
        let name = workspace
            .active_node()
            .and_then(|id| workspace.node_name(id))
            .unwrap_or_else(|| "(no note)".to_string());
        let dirty = if workspace.is_dirty() { " *" } else { "" };
        let mode = match workspace.mode() {
            EditMode::Text => "text",
            EditMode::Markup => "markup",
        };
        (
            format!(" {}{} [{}] ", name, dirty, mode),
            workspace.is_editable(),
        )
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = inner.height as usize;
    app.editor.follow_cursor(height);

    let lines: Vec<Line> = app
        .editor
        .lines()
        .iter()
        .skip(app.editor.scroll)
        .take(height)
        .map(|line| Line::from(line.clone()))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    if focused && editable && matches!(app.dialog, Dialog::None) && height > 0 {
        let (row, _) = app.editor.cursor();
        if row >= app.editor.scroll {
            let x = inner.x
                + app
                    .editor
                    .cursor_display_col()
                    .min(inner.width.saturating_sub(1) as usize) as u16;
            let y = inner.y + (row - app.editor.scroll).min(height - 1) as u16;
            frame.set_cursor_position((x, y));
        }
    }
}

fn draw_status(app: &ShellApp, frame: &mut Frame, area: Rect) {
    let text = match app.status() {
        Some(message) => message,
        None => {
            "tab: focus  ^s: save  ^e: mode  n/f: new  r: rename  d: delete  o: folder  ^q: quit"
                .to_string()
        }
    };
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_dialog(app: &ShellApp, frame: &mut Frame, area: Rect) {
    let (title, body) = match &app.dialog {
        Dialog::None => return,
        Dialog::Input { title, value, .. } => (title.as_str(), format!("{}_", value)),
        Dialog::ConfirmDelete { message } => ("confirm", format!("{} (y/n)", message)),
        Dialog::ConfirmModeSwitch { prompt, .. } => {
            let question = match prompt {
                SwitchPrompt::DiscardFormatting => "discard formatting? (y / esc)",
                SwitchPrompt::InterpretAsMarkup => {
                    "interpret text as markup? (y: as-is, n: escape, esc: cancel)"
                }
            };
            ("mode", question.to_string())
        }
    };

    if area.width < 8 || area.height < 5 {
        return;
    }
    let width = (body.len().min(200) as u16 + 6)
        .max(30)
        .min(area.width.saturating_sub(2));
    let rect = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + area.height / 3,
        width,
        height: 3,
    };

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(body).block(Block::default().borders(Borders::ALL).title(title)),
        rect,
    );
}
