use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use workdeck_core::view::{SidebarGroup, SidebarRow};

use crate::app::{App, CreateField, CreateFormState, Focus, InputMode};
use crate::theme::{self, Theme, status_color};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let groups = app.dashboard.sidebar();
    let block = if app.focus == Focus::Sidebar {
        Theme::block_accent()
    } else {
        Theme::block_dim()
    }
    .title(" Sessions ");

    if groups.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(Line::styled(
                "No sessions yet.",
                Style::new().fg(Theme::TEXT_MUTED),
            )),
            inner,
        );
        return;
    }

    let width = usize::from(area.width.saturating_sub(6));
    let editing = match &app.input {
        InputMode::CreateForm(form) => Some(form),
        _ => None,
    };

    let mut items = Vec::new();
    for group in groups {
        items.push(group_item(group, editing, width));
        items.extend(group.rows.iter().map(|row| row_item(row, width)));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::new()
                .bg(Theme::CURSOR_BG)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">")
        .highlight_spacing(ratatui::widgets::HighlightSpacing::Always);

    let mut state = ListState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn group_item<'a>(
    group: &'a SidebarGroup,
    editing: Option<&CreateFormState>,
    width: usize,
) -> ListItem<'a> {
    let marker = if group.create_form_open { "−" } else { "+" };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            truncate(&group.name, width.saturating_sub(4)),
            Style::new().fg(Theme::ACCENT_PURPLE).bold(),
        ),
        Span::styled(format!(" {marker}"), Style::new().fg(Theme::TEXT_MUTED)),
    ])];

    if group.create_form_open {
        match editing.filter(|form| form.group_path == group.path) {
            Some(form) => lines.extend(form_lines(form, width)),
            None => lines.push(Line::styled(
                "  new session (Enter to edit)",
                Style::new().fg(Theme::TEXT_MUTED).italic(),
            )),
        }
    }
    ListItem::new(lines)
}

fn form_lines(form: &CreateFormState, width: usize) -> Vec<Line<'static>> {
    let field_line = |field: CreateField, label: &str, value: String| {
        let active = form.field == field;
        let label_style = if active {
            Style::new().fg(Theme::ACCENT_YELLOW).bold()
        } else {
            Style::new().fg(Theme::TEXT_SECONDARY)
        };
        let cursor = if active && field != CreateField::Tool {
            "_"
        } else {
            ""
        };
        Line::from(vec![
            Span::styled(format!("  {label:<6}"), label_style),
            Span::styled(
                truncate(&value, width.saturating_sub(9)),
                Style::new().fg(Theme::TEXT_PRIMARY),
            ),
            Span::styled(cursor.to_string(), Style::new().fg(Theme::ACCENT_YELLOW)),
        ])
    };

    let mut lines = vec![
        field_line(CreateField::Title, "title", form.draft.title.clone()),
        field_line(CreateField::Tool, "tool", format!("‹ {} ›", form.draft.tool)),
    ];
    if form.needs_path {
        lines.push(field_line(CreateField::Path, "path", form.draft.path.clone()));
    }
    lines
}

fn row_item(row: &SidebarRow, width: usize) -> ListItem<'static> {
    let title_style = if row.selected {
        Style::new().fg(Theme::SELECTED_MARK).bold()
    } else {
        Style::new().fg(Theme::TEXT_PRIMARY)
    };
    ListItem::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(row.icon.glyph, Style::new().fg(status_color(row.status))),
        Span::raw(" "),
        Span::styled(truncate(&row.title, width.saturating_sub(8)), title_style),
        Span::raw(" "),
        Span::styled(
            theme::tool_icon(row.tool),
            Style::new().fg(theme::tool_color(row.tool)),
        ),
    ]))
}

/// Cut `s` to at most `max_width` display columns, ending with `…`.
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use workdeck_api::SessionStatus;

    use super::*;
    use crate::app::testing::{app_with, running};
    use crate::views::buffer_to_string;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, app, area);
            })
            .expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("日本語テキスト", 7), "日本語…");
    }

    #[test]
    fn groups_rows_and_status_glyphs() {
        let mut stopped = running("b");
        stopped.status = SessionStatus::Stopped;
        let app = app_with(vec![running("a"), stopped]);
        let text = draw(&app);
        assert!(text.contains("Work +"));
        assert!(text.contains("● task a"));
        assert!(text.contains("◻ task b"));
    }

    #[test]
    fn open_create_form_renders_fields() {
        let mut app = app_with(vec![]);
        for msg in app.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE)) {
            app.dispatch(msg);
        }
        let text = draw(&app);
        assert!(text.contains("Work −"));
        assert!(text.contains("title"));
        assert!(text.contains("‹ claude ›"));
        assert!(text.contains("path"));
    }

    #[test]
    fn empty_snapshot_shows_placeholder() {
        let app = App::new(
            workdeck_core::Dashboard::new(Box::new(crate::app::testing::StubBridge), 20),
            "http://deck",
        );
        assert!(draw(&app).contains("No sessions yet."));
    }
}
