use crate::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph};

/// Kinds of modal overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Confirmation dialog.
    Confirm {
        title: String,
        message: String,
        action: ConfirmAction,
    },
}

/// What happens when a Confirm modal is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Stop(String),
    Restart(String),
    Delete(String),
    Logout,
}

/// Render the current modal overlay on top of everything.
pub fn render(frame: &mut Frame, modal: &Modal) {
    let area = frame.area();
    let popup_width = 50u16.min(area.width.saturating_sub(4));
    let popup_height = 7u16.min(area.height.saturating_sub(2));
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);

    let Modal::Confirm {
        title,
        message,
        action,
    } = modal;

    let border = match action {
        ConfirmAction::Delete(_) => Theme::ACCENT_RED,
        _ => Theme::ACCENT_YELLOW,
    };
    let block = Block::bordered()
        .border_type(ratatui::widgets::BorderType::Rounded)
        .title(format!(" {title} "))
        .border_style(Style::new().fg(border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            format!("  {message}"),
            Style::new().fg(Theme::TEXT_PRIMARY),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  y/Enter ", key_style),
            Span::styled("confirm  ", desc_style),
            Span::styled("n/Esc ", key_style),
            Span::styled("cancel", desc_style),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
