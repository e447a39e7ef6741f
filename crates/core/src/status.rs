//! Status presentation: sidebar glyphs and detail header tint.

use workdeck_api::SessionStatus;

/// Glyph plus a style class name the frontend maps to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusIcon {
    pub glyph: &'static str,
    pub class: &'static str,
}

/// Header emphasis for statuses that deserve attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTint {
    Running,
    Waiting,
    Error,
}

pub fn status_icon(status: SessionStatus) -> StatusIcon {
    let glyph = match status {
        SessionStatus::Running => "●",
        SessionStatus::Waiting => "◐",
        SessionStatus::Stopped => "◻",
        SessionStatus::Error => "✗",
        SessionStatus::Idle | SessionStatus::Unknown => "○",
    };
    StatusIcon {
        glyph,
        class: status.as_str(),
    }
}

pub fn header_tint(status: SessionStatus) -> Option<HeaderTint> {
    match status {
        SessionStatus::Running => Some(HeaderTint::Running),
        SessionStatus::Waiting => Some(HeaderTint::Waiting),
        SessionStatus::Error => Some(HeaderTint::Error),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_renders_like_idle() {
        assert_eq!(
            status_icon(SessionStatus::Unknown),
            status_icon(SessionStatus::Idle)
        );
        assert_eq!(header_tint(SessionStatus::Unknown), None);
    }

    #[test]
    fn glyphs_per_status() {
        assert_eq!(status_icon(SessionStatus::Running).glyph, "●");
        assert_eq!(status_icon(SessionStatus::Waiting).glyph, "◐");
        assert_eq!(status_icon(SessionStatus::Stopped).glyph, "◻");
        assert_eq!(status_icon(SessionStatus::Error).class, "error");
    }

    #[test]
    fn icon_outlives_the_status_value() {
        let statuses = vec![SessionStatus::Running, SessionStatus::Unknown];
        let icons: Vec<StatusIcon> = statuses.into_iter().map(status_icon).collect();
        assert_eq!(icons[0].class, "running");
        assert_eq!(icons[1].class, "idle");
    }

    #[test]
    fn only_active_and_failed_states_tint() {
        assert_eq!(header_tint(SessionStatus::Stopped), None);
        assert_eq!(header_tint(SessionStatus::Idle), None);
        assert_eq!(
            header_tint(SessionStatus::Error),
            Some(HeaderTint::Error)
        );
    }
}
