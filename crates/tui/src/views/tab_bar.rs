use crate::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use workdeck_core::tabs::DetailTab;

/// Offered tabs, numbered by position; the active one highlighted.
pub fn render(frame: &mut Frame, tabs: &[DetailTab], active: DetailTab, area: Rect) {
    let mut spans = vec![Span::styled(" ", Style::new())];

    for (idx, tab) in tabs.iter().enumerate() {
        let style = if *tab == active {
            Style::new()
                .fg(Color::Black)
                .bg(Theme::ACCENT_BLUE)
                .bold()
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::new().fg(Theme::TAB_INACTIVE)
        };
        spans.push(Span::styled(format!(" {}:{} ", idx + 1, tab.label()), style));
        spans.push(Span::styled(" ", Style::new()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
