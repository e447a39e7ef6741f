use chrono::{DateTime, Local, TimeZone, Utc};
use workdeck_api::SessionEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    /// Local `HH:MM`.
    pub time: String,
    pub event_type: String,
    pub detail: String,
}

/// Read-only list of the most recent events; refreshed only on tab re-entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityPanel {
    pub loading: bool,
    pub rows: Vec<ActivityRow>,
}

pub fn format_time<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%H:%M").to_string()
}

impl ActivityPanel {
    pub fn loading() -> Self {
        Self {
            loading: true,
            rows: Vec::new(),
        }
    }

    pub fn apply(&mut self, events: &[SessionEvent], limit: usize) {
        self.apply_in(events, limit, &Local);
    }

    pub fn apply_in<Tz: TimeZone>(&mut self, events: &[SessionEvent], limit: usize, tz: &Tz)
    where
        Tz::Offset: std::fmt::Display,
    {
        self.loading = false;
        self.rows = events
            .iter()
            .take(limit)
            .map(|event| ActivityRow {
                time: format_time(&event.ts, tz),
                event_type: event.event_type.clone(),
                detail: event.detail.clone(),
            })
            .collect();
    }

    /// A failed fetch leaves an empty list.
    pub fn fail(&mut self) {
        self.loading = false;
        self.rows.clear();
    }
}
