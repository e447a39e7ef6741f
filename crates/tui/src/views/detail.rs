use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use workdeck_core::tabs::{ActivityPanel, GitPanel, NotesEditor, TabContent, TerminalPane};
use workdeck_core::view::{DetailHeader, DetailPanel, HeaderAction};

use crate::app::{App, Focus};
use crate::theme::{self, Theme, diff_style, status_color, tint_color};
use crate::views::tab_bar;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = if app.focus == Focus::Detail {
        Theme::block_accent()
    } else {
        Theme::block_dim()
    };
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(detail) = app.dashboard.detail() else {
        frame.render_widget(
            Paragraph::new(Line::styled(
                "Select a session.",
                Style::new().fg(Theme::TEXT_MUTED),
            ))
            .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let [header_area, tabs_area, content_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    render_header(frame, &detail.header, header_area);
    tab_bar::render(frame, &detail.tabs, detail.active_tab(), tabs_area);
    render_content(frame, app, detail, content_area);
}

fn render_header(frame: &mut Frame, header: &DetailHeader, area: Rect) {
    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            header.icon.glyph,
            Style::new().fg(status_color(header.status)),
        ),
        Span::raw(" "),
        Span::styled(header.title.clone(), Style::new().fg(Theme::TEXT_PRIMARY).bold()),
        Span::raw(" "),
        Span::styled(
            theme::tool_icon(header.tool),
            Style::new().fg(theme::tool_color(header.tool)),
        ),
        Span::raw(" "),
        Span::styled(
            format!(" {} ", header.status),
            Style::new()
                .fg(Color::Black)
                .bg(status_color(header.status))
                .bold(),
        ),
        Span::raw("   "),
    ];
    for action in &header.actions {
        let (key, desc) = match action {
            HeaderAction::Stop => ("S ", "stop  "),
            HeaderAction::Restart => ("R ", "restart  "),
            HeaderAction::Delete => ("D ", "delete"),
        };
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(desc, desc_style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::new().bg(tint_color(header.tint))),
        area,
    );
}

fn render_content(frame: &mut Frame, app: &App, detail: &DetailPanel, area: Rect) {
    match &detail.content {
        TabContent::Terminal(pane) => render_terminal(frame, pane, app.terminal_scroll, area),
        TabContent::Git(panel) => render_git(frame, panel, area),
        TabContent::Notes(editor) => render_notes(frame, editor, area),
        TabContent::Activity(panel) => render_activity(frame, panel, area),
    }
}

fn placeholder(frame: &mut Frame, text: &str, area: Rect) {
    frame.render_widget(
        Paragraph::new(Line::styled(
            text.to_string(),
            Style::new().fg(Theme::TEXT_MUTED).italic(),
        ))
        .wrap(Wrap { trim: false }),
        area.inner(Margin::new(1, 1)),
    );
}

fn render_terminal(frame: &mut Frame, pane: &TerminalPane, scroll: i32, area: Rect) {
    let url = match pane {
        TerminalPane::Live { url } => url,
        other => {
            placeholder(frame, &other.placeholder().unwrap_or_default(), area);
            return;
        }
    };
    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("● ", Style::new().fg(Theme::ACCENT_GREEN)),
            Span::styled("Live terminal", Style::new().fg(Theme::TEXT_PRIMARY).bold()),
        ]),
        Line::styled(url.clone(), Style::new().fg(Theme::ACCENT_BLUE).underlined()),
        Line::raw(""),
        Line::from(vec![
            Span::styled("o ", key_style),
            Span::styled("open in browser  ", desc_style),
            Span::styled("PgUp/PgDn ", key_style),
            Span::styled("scroll", desc_style),
        ]),
    ];
    if scroll != 0 {
        lines.push(Line::styled(
            format!("scrolled {} px", -scroll),
            Style::new().fg(Theme::TEXT_SECONDARY),
        ));
    }
    frame.render_widget(Paragraph::new(lines), area.inner(Margin::new(1, 1)));
}

fn render_git(frame: &mut Frame, panel: &GitPanel, area: Rect) {
    if !panel.available {
        placeholder(frame, "No working directory for this session.", area);
        return;
    }
    let [summary_area, status_area, diff_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Percentage(30),
        Constraint::Fill(1),
    ])
    .areas(area.inner(Margin::new(1, 0)));

    let mut summary = vec![if panel.uncommitted {
        Span::styled("uncommitted changes", Style::new().fg(Theme::ACCENT_YELLOW))
    } else {
        Span::styled("clean", Style::new().fg(Theme::ACCENT_GREEN))
    }];
    if let Some(url) = &panel.pr_url {
        summary.push(Span::styled("  PR ", Style::new().fg(Theme::TEXT_SECONDARY)));
        summary.push(Span::styled(
            url.clone(),
            Style::new().fg(Theme::ACCENT_BLUE).underlined(),
        ));
        summary.push(Span::styled("  (o)", Style::new().fg(Theme::TEXT_KEY_DESC)));
    }
    frame.render_widget(Paragraph::new(Line::from(summary)), summary_area);

    frame.render_widget(
        Paragraph::new(panel.status_text().to_string())
            .style(Style::new().fg(Theme::TEXT_CONTENT))
            .block(Theme::block_dim().title(" status ")),
        status_area,
    );

    let diff_lines: Vec<Line> = match panel.diff_lines() {
        Ok(lines) => lines
            .into_iter()
            .map(|line| Line::styled(line.text, diff_style(line.kind)))
            .collect(),
        Err(placeholder) => vec![Line::styled(
            placeholder,
            Style::new().fg(Theme::TEXT_MUTED).italic(),
        )],
    };
    frame.render_widget(
        Paragraph::new(diff_lines).block(Theme::block_dim().title(" diff ")),
        diff_area,
    );
}

fn render_notes(frame: &mut Frame, editor: &NotesEditor, area: Rect) {
    let title = if editor.is_dirty() {
        " notes * "
    } else {
        " notes "
    };
    let block = if editor.is_focused() {
        Theme::block_accent()
    } else {
        Theme::block_dim()
    }
    .title(title)
    .padding(Theme::PADDING_COMPACT);
    let inner = block.inner(area);

    let body = if editor.text().is_empty() && !editor.is_focused() {
        Paragraph::new(Line::styled(
            "No notes. Press e to edit.",
            Style::new().fg(Theme::TEXT_MUTED).italic(),
        ))
    } else {
        Paragraph::new(editor.text().to_string()).style(Style::new().fg(Theme::TEXT_PRIMARY))
    };
    frame.render_widget(body.block(block), area);

    if editor.is_focused() {
        let (line, col) = editor.cursor_position();
        let x = inner.x.saturating_add(u16::try_from(col).unwrap_or(u16::MAX));
        let y = inner.y.saturating_add(u16::try_from(line).unwrap_or(u16::MAX));
        if x < inner.right() && y < inner.bottom() {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

fn render_activity(frame: &mut Frame, panel: &ActivityPanel, area: Rect) {
    if panel.loading {
        placeholder(frame, "loading...", area);
        return;
    }
    if panel.rows.is_empty() {
        placeholder(frame, "No activity.", area);
        return;
    }
    let lines: Vec<Line> = panel
        .rows
        .iter()
        .map(|row| {
            Line::from(vec![
                Span::styled(row.time.clone(), Style::new().fg(Theme::TEXT_MUTED)),
                Span::raw("  "),
                Span::styled(
                    format!("{:<14}", row.event_type),
                    Style::new().fg(Theme::ACCENT_PURPLE),
                ),
                Span::styled(row.detail.clone(), Style::new().fg(Theme::TEXT_CONTENT)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area.inner(Margin::new(1, 1)));
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use workdeck_api::{SessionEvent, SessionStatus};
    use workdeck_core::Msg;
    use workdeck_core::tabs::{DetailTab, GitPart};

    use super::*;
    use crate::app::testing::{app_with, running};
    use crate::views::buffer_to_string;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, app, area);
            })
            .expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    fn selected(session: workdeck_api::Session) -> App {
        let id = session.id.clone();
        let mut app = app_with(vec![session]);
        app.dispatch(Msg::Select(id));
        app
    }

    #[test]
    fn nothing_selected_prompts_for_selection() {
        let app = app_with(vec![running("a")]);
        assert!(draw(&app).contains("Select a session."));
    }

    #[test]
    fn live_terminal_shows_header_actions_and_url() {
        let app = selected(running("a"));
        let text = draw(&app);
        assert!(text.contains("task a"));
        assert!(text.contains(" running "));
        assert!(text.contains("S stop"));
        assert!(text.contains("1:terminal"));
        assert!(text.contains("http://stub/a/"));
    }

    #[test]
    fn stopped_session_hides_stop_and_shows_placeholder() {
        let mut session = running("a");
        session.status = SessionStatus::Stopped;
        let text = draw(&selected(session));
        assert!(!text.contains("S stop"));
        assert!(text.contains("R restart"));
        assert!(text.contains("Session is stopped. Use Restart to resume access."));
    }

    #[test]
    fn git_tab_renders_parts_as_they_arrive() {
        let mut session = running("a");
        session.worktree_path = Some("/wt/a".to_string());
        let mut app = selected(session);
        app.dispatch(Msg::SelectTab(DetailTab::Git));
        assert!(draw(&app).contains("loading..."));

        app.dispatch(Msg::GitLoaded {
            session_id: "a".to_string(),
            part: GitPart::Diff(Ok("+added line\n-removed line".to_string())),
        });
        app.dispatch(Msg::GitLoaded {
            session_id: "a".to_string(),
            part: GitPart::PullRequest(Some("https://git.example/pr/7".to_string())),
        });
        let text = draw(&app);
        assert!(text.contains("+added line"));
        assert!(text.contains("https://git.example/pr/7"));
        assert!(text.contains("loading..."), "status still pending");
    }

    #[test]
    fn activity_rows_render() {
        let mut app = selected(running("a"));
        app.dispatch(Msg::SelectTab(DetailTab::Activity));
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().expect("ts");
        app.dispatch(Msg::ActivityLoaded {
            session_id: "a".to_string(),
            result: Ok(vec![SessionEvent {
                id: 1,
                session_id: "a".to_string(),
                ts,
                event_type: "status".to_string(),
                detail: "running -> waiting".to_string(),
            }]),
        });
        let text = draw(&app);
        assert!(text.contains("status"));
        assert!(text.contains("running -> waiting"));
    }
}
