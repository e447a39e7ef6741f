//! Usage gauges derived from the latest usage record.

use workdeck_api::UsageRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageLevel {
    Green,
    Yellow,
    Red,
}

pub fn level(utilization: f64) -> UsageLevel {
    if utilization >= 0.8 {
        UsageLevel::Red
    } else if utilization >= 0.6 {
        UsageLevel::Yellow
    } else {
        UsageLevel::Green
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsageGauge {
    pub label: &'static str,
    /// Fraction in [0, 1] (may exceed 1 when over the limit).
    pub utilization: f64,
    pub resets_at_ms: Option<i64>,
    /// Replaces the percentage text (used for the credit gauge).
    pub value_label: Option<String>,
}

impl UsageGauge {
    pub fn level(&self) -> UsageLevel {
        level(self.utilization)
    }

    pub fn value_text(&self) -> String {
        match &self.value_label {
            Some(label) => label.clone(),
            None => format!("{}%", (self.utilization * 100.0).round() as i64),
        }
    }

    pub fn reset_text(&self, now_ms: i64) -> String {
        format_reset(self.resets_at_ms, now_ms)
    }
}

/// Latest usage only; history is not kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UsageSnapshot {
    pub gauges: Vec<UsageGauge>,
}

impl UsageSnapshot {
    pub fn from_record(record: &UsageRecord) -> Self {
        let mut gauges = vec![
            UsageGauge {
                label: "5h",
                utilization: record.five_hour_util / 100.0,
                resets_at_ms: Some(record.five_hour_resets_at).filter(|t| *t > 0),
                value_label: None,
            },
            UsageGauge {
                label: "7d",
                utilization: record.seven_day_util / 100.0,
                resets_at_ms: Some(record.seven_day_resets_at).filter(|t| *t > 0),
                value_label: None,
            },
        ];
        if record.extra_enabled {
            gauges.push(UsageGauge {
                label: "$",
                utilization: record.extra_utilization / 100.0,
                resets_at_ms: None,
                value_label: Some(format!("${:.2}", record.extra_used_credits / 100.0)),
            });
        }
        Self { gauges }
    }
}

/// `→ Nd`, `→ HhMMm` or `→ Mm`; empty when unknown or already past.
pub fn format_reset(resets_at_ms: Option<i64>, now_ms: i64) -> String {
    let Some(at) = resets_at_ms.filter(|t| *t > 0) else {
        return String::new();
    };
    let remaining = at - now_ms;
    if remaining <= 0 {
        return String::new();
    }
    let mins = remaining / 60_000;
    let hours = mins / 60;
    let days = hours / 24;
    if days > 0 {
        format!("→ {days}d")
    } else if hours > 0 {
        format!("→ {hours}h{:02}m", mins % 60)
    } else {
        format!("→ {mins}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: i64 = 60_000;

    #[test]
    fn reset_countdown_formats() {
        let now = 1_000_000;
        assert_eq!(format_reset(Some(now + 3 * 24 * 60 * MIN + 5), now), "→ 3d");
        assert_eq!(format_reset(Some(now + 125 * MIN), now), "→ 2h05m");
        assert_eq!(format_reset(Some(now + 59 * MIN + 30_000), now), "→ 59m");
        assert_eq!(format_reset(Some(now - 1), now), "");
        assert_eq!(format_reset(None, now), "");
    }

    #[test]
    fn levels_at_thresholds() {
        assert_eq!(level(0.59), UsageLevel::Green);
        assert_eq!(level(0.6), UsageLevel::Yellow);
        assert_eq!(level(0.8), UsageLevel::Red);
    }

    #[test]
    fn extra_gauge_only_when_enabled() {
        let mut record = UsageRecord {
            five_hour_util: 42.4,
            seven_day_util: 81.0,
            extra_used_credits: 1234.0,
            extra_utilization: 12.0,
            ..UsageRecord::default()
        };
        let snapshot = UsageSnapshot::from_record(&record);
        assert_eq!(snapshot.gauges.len(), 2);
        assert_eq!(snapshot.gauges[0].value_text(), "42%");
        assert_eq!(snapshot.gauges[1].level(), UsageLevel::Red);
        assert_eq!(snapshot.gauges[0].resets_at_ms, None);

        record.extra_enabled = true;
        let snapshot = UsageSnapshot::from_record(&record);
        assert_eq!(snapshot.gauges[2].value_text(), "$12.34");
        assert_eq!(snapshot.gauges[2].label, "$");
    }
}
