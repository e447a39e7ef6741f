use crate::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("?", "Toggle this help"),
            ("L", "Log out"),
            ("q", "Quit"),
        ],
    ),
    (
        "Sidebar",
        &[
            ("j/k", "Navigate up/down"),
            ("g/G", "Jump to first/last"),
            ("Enter", "Open session / new-session form"),
            ("n", "New session in current group"),
            ("Tab", "Focus detail"),
        ],
    ),
    (
        "Detail",
        &[
            ("Esc/h", "Back to list"),
            ("1-4 [ ]", "Switch tabs"),
            ("S R D", "Stop / restart / delete"),
            ("PgUp/PgDn", "Scroll terminal"),
            ("o", "Open terminal or PR in browser"),
            ("r", "Refresh git"),
            ("e", "Edit notes (Ctrl+S save, Esc done)"),
        ],
    ),
];

pub fn render(frame: &mut Frame, area: Rect) {
    let popup_width = 60u16.min(area.width.saturating_sub(4));
    let popup_height = 24u16.min(area.height.saturating_sub(2));
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Theme::block_accent()
        .title(" Keyboard Shortcuts ")
        .padding(Theme::PADDING_COMPACT);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::new().fg(Theme::ACCENT_YELLOW).bold();
    let desc_style = Style::new().fg(Theme::TEXT_CONTENT);
    let header_style = Style::new().fg(Theme::ACCENT_BLUE).bold();

    let mut lines = Vec::new();
    for (title, keys) in SECTIONS {
        lines.push(Line::from(Span::styled(
            format!("── {title} ──"),
            header_style,
        )));
        for (key, desc) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<11}"), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
        lines.push(Line::raw(""));
    }
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::new().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::render;
    use crate::views::buffer_to_string;

    #[test]
    fn lists_detail_actions() {
        let mut terminal = Terminal::new(TestBackend::new(70, 30)).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area);
            })
            .expect("draw");
        let text = buffer_to_string(terminal.backend().buffer());
        assert!(text.contains("Keyboard Shortcuts"));
        assert!(text.contains("Stop / restart / delete"));
        assert!(text.contains("Press any key to close"));
    }
}
