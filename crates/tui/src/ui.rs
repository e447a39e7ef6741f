use crate::app::{App, Focus, InputMode};
use crate::theme::Theme;
use crate::views::{detail, help, modal, sidebar, usage};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use workdeck_core::{Connection, FlashLevel};

/// Below this width only one of sidebar or detail is shown.
const NARROW_WIDTH: u16 = 80;
const SIDEBAR_WIDTH: u16 = 34;

pub fn render(frame: &mut Frame, app: &App) {
    render_at(frame, app, chrono::Utc::now().timestamp_millis());
}

pub fn render_at(frame: &mut Frame, app: &App, now_ms: i64) {
    let [top_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_top_bar(frame, app, now_ms, top_area);

    if body_area.width < NARROW_WIDTH {
        if app.dashboard.mobile_show_detail() && app.dashboard.detail().is_some() {
            detail::render(frame, app, body_area);
        } else {
            sidebar::render(frame, app, body_area);
        }
    } else {
        let [sidebar_area, detail_area] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
                .areas(body_area);
        sidebar::render(frame, app, sidebar_area);
        detail::render(frame, app, detail_area);
    }

    render_footer(frame, app, footer_area);

    if app.show_help {
        help::render(frame, frame.area());
    }
    if let Some(ref m) = app.modal {
        modal::render(frame, m);
    }
}

fn render_top_bar(frame: &mut Frame, app: &App, now_ms: i64, area: Rect) {
    let (dot, label, color) = match app.dashboard.connection() {
        Connection::Open => ("●", "live".to_string(), Theme::ACCENT_GREEN),
        Connection::Connecting => ("○", "connecting".to_string(), Theme::ACCENT_YELLOW),
        Connection::Reconnecting { retry_in } => (
            "◌",
            format!("reconnecting in {}s", retry_in.as_secs().max(1)),
            Theme::ACCENT_RED,
        ),
    };
    let left = Line::from(vec![
        Span::styled(" workdeck ", Style::new().fg(Theme::ACCENT_BLUE).bold()),
        Span::styled(app.server_url.clone(), Style::new().fg(Theme::TEXT_SECONDARY)),
        Span::raw("  "),
        Span::styled(format!("{dot} {label}"), Style::new().fg(color)),
    ]);
    let left_width = u16::try_from(left.width()).unwrap_or(u16::MAX);
    let [left_area, right_area] =
        Layout::horizontal([Constraint::Length(left_width), Constraint::Fill(1)]).areas(area);
    frame.render_widget(Paragraph::new(left), left_area);
    usage::render(frame, app.dashboard.usage(), now_ms, right_area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);
    let hint = |key: &'static str, desc: &'static str| {
        [
            Span::styled(key, key_style),
            Span::styled(desc, desc_style),
        ]
    };

    let mut spans = vec![Span::raw(" ")];
    match (&app.input, app.focus) {
        (InputMode::EditingNotes, _) => {
            spans.extend(hint("Ctrl+S ", "save  "));
            spans.extend(hint("Esc ", "done"));
        }
        (InputMode::CreateForm(_), _) => {
            spans.extend(hint("Tab ", "field  "));
            spans.extend(hint("←/→ ", "tool  "));
            spans.extend(hint("Enter ", "create  "));
            spans.extend(hint("Esc ", "cancel"));
        }
        (InputMode::Normal, Focus::Sidebar) => {
            spans.extend(hint("j/k ", "navigate  "));
            spans.extend(hint("Enter ", "open  "));
            spans.extend(hint("n ", "new  "));
            spans.extend(hint("? ", "help  "));
            spans.extend(hint("q ", "quit"));
        }
        (InputMode::Normal, Focus::Detail) => {
            spans.extend(hint("Esc ", "back  "));
            spans.extend(hint("1-4 ", "tabs  "));
            spans.extend(hint("S/R/D ", "stop/restart/delete  "));
            spans.extend(hint("? ", "help"));
        }
    }

    if let Some(flash) = app.dashboard.flash() {
        let color = match flash.level {
            FlashLevel::Info => Theme::ACCENT_GREEN,
            FlashLevel::Error => Theme::ACCENT_RED,
        };
        spans.push(Span::styled("  ", Style::new()));
        spans.push(Span::styled(flash.message.clone(), Style::new().fg(color)));
    }
    if let Some(notice) = &app.notice {
        spans.push(Span::styled("  ", Style::new()));
        spans.push(Span::styled(
            notice.clone(),
            Style::new().fg(Theme::ACCENT_YELLOW),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
