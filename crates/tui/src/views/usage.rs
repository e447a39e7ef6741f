use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use workdeck_core::usage::{UsageGauge, UsageSnapshot};

use crate::theme::{Theme, usage_color};

const BAR_WIDTH: usize = 8;

/// One-line gauge strip; `now_ms` drives the reset countdowns.
pub fn render(frame: &mut Frame, usage: Option<&UsageSnapshot>, now_ms: i64, area: Rect) {
    let line = match usage {
        Some(snapshot) if !snapshot.gauges.is_empty() => {
            let mut spans = Vec::new();
            for gauge in &snapshot.gauges {
                spans.extend(gauge_spans(gauge, now_ms));
                spans.push(Span::raw("  "));
            }
            Line::from(spans)
        }
        _ => Line::styled("usage: n/a", Style::new().fg(Theme::TEXT_MUTED)),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}

fn gauge_spans(gauge: &UsageGauge, now_ms: i64) -> Vec<Span<'static>> {
    let color = usage_color(gauge.level());
    let filled = ((gauge.utilization.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize)
        .min(BAR_WIDTH);
    let mut spans = vec![
        Span::styled(
            format!("{} ", gauge.label),
            Style::new().fg(Theme::TEXT_SECONDARY),
        ),
        Span::styled("█".repeat(filled), Style::new().fg(color)),
        Span::styled(
            "░".repeat(BAR_WIDTH - filled),
            Style::new().fg(Theme::BAR_DIM),
        ),
        Span::styled(format!(" {}", gauge.value_text()), Style::new().fg(color)),
    ];
    let reset = gauge.reset_text(now_ms);
    if !reset.is_empty() {
        spans.push(Span::styled(
            format!(" {reset}"),
            Style::new().fg(Theme::TEXT_MUTED),
        ));
    }
    spans
}
