use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Padding};
use workdeck_api::{SessionStatus, Tool};
use workdeck_core::diff::DiffLineKind;
use workdeck_core::status::HeaderTint;
use workdeck_core::usage::UsageLevel;

pub struct Theme;

impl Theme {
    // ── Border ───────────────────────────────────────────────────────
    pub const BORDER_DIM: Color = Color::DarkGray;
    pub const BORDER_ACCENT: Color = Color::Rgb(100, 180, 240);

    // ── Text hierarchy ───────────────────────────────────────────────
    pub const TEXT_PRIMARY: Color = Color::White;
    pub const TEXT_SECONDARY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_MUTED: Color = Color::Rgb(80, 85, 100);
    pub const TEXT_CONTENT: Color = Color::Rgb(170, 175, 190);

    // ── Key style (for footer hints) ─────────────────────────────────
    pub const TEXT_KEY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_KEY_DESC: Color = Color::DarkGray;

    // ── Accent ───────────────────────────────────────────────────────
    pub const ACCENT_BLUE: Color = Color::Rgb(100, 180, 240);
    pub const ACCENT_GREEN: Color = Color::Rgb(80, 200, 120);
    pub const ACCENT_RED: Color = Color::Rgb(220, 80, 80);
    pub const ACCENT_YELLOW: Color = Color::Rgb(220, 180, 60);
    pub const ACCENT_PURPLE: Color = Color::Rgb(180, 140, 220);
    pub const ACCENT_CYAN: Color = Color::Rgb(80, 200, 200);

    // ── Selection ────────────────────────────────────────────────────
    pub const CURSOR_BG: Color = Color::Rgb(40, 48, 68);
    pub const SELECTED_MARK: Color = Color::Rgb(100, 180, 240);

    // ── Header tint backgrounds ──────────────────────────────────────
    pub const TINT_RUNNING: Color = Color::Rgb(24, 52, 36);
    pub const TINT_WAITING: Color = Color::Rgb(58, 50, 20);
    pub const TINT_ERROR: Color = Color::Rgb(62, 26, 26);

    // ── Gauges ───────────────────────────────────────────────────────
    pub const BAR_DIM: Color = Color::Rgb(70, 75, 90);

    // ── Tab style ────────────────────────────────────────────────────
    pub const TAB_INACTIVE: Color = Color::Rgb(120, 125, 140);

    // ── Padding ──────────────────────────────────────────────────────
    pub const PADDING_COMPACT: Padding = Padding::new(1, 1, 0, 0);

    // ── Block helpers ────────────────────────────────────────────────

    pub fn block_dim() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_DIM))
    }

    pub fn block_accent() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_ACCENT))
    }
}

// ── Status ───────────────────────────────────────────────────────────

pub fn status_color(status: SessionStatus) -> Color {
    match status {
        SessionStatus::Running => Theme::ACCENT_GREEN,
        SessionStatus::Waiting => Theme::ACCENT_YELLOW,
        SessionStatus::Error => Theme::ACCENT_RED,
        SessionStatus::Stopped => Theme::TEXT_MUTED,
        SessionStatus::Idle | SessionStatus::Unknown => Theme::TEXT_SECONDARY,
    }
}

pub fn tint_color(tint: Option<HeaderTint>) -> Color {
    match tint {
        Some(HeaderTint::Running) => Theme::TINT_RUNNING,
        Some(HeaderTint::Waiting) => Theme::TINT_WAITING,
        Some(HeaderTint::Error) => Theme::TINT_ERROR,
        None => Color::Reset,
    }
}

pub fn usage_color(level: UsageLevel) -> Color {
    match level {
        UsageLevel::Green => Theme::ACCENT_GREEN,
        UsageLevel::Yellow => Theme::ACCENT_YELLOW,
        UsageLevel::Red => Theme::ACCENT_RED,
    }
}

pub fn diff_style(kind: DiffLineKind) -> Style {
    match kind {
        DiffLineKind::Header => Style::new().fg(Theme::TEXT_PRIMARY).bold(),
        DiffLineKind::Added => Style::new().fg(Theme::ACCENT_GREEN),
        DiffLineKind::Removed => Style::new().fg(Theme::ACCENT_RED),
        DiffLineKind::Hunk => Style::new().fg(Theme::ACCENT_CYAN),
        DiffLineKind::Context => Style::new().fg(Theme::TEXT_CONTENT),
    }
}

// ── Tool icon / color ────────────────────────────────────────────────

pub fn tool_icon(tool: Tool) -> &'static str {
    match tool {
        Tool::Claude => " CC ",
        Tool::Opencode => " Oc ",
        Tool::Gemini => " Gm ",
        Tool::Codex => " Cx ",
        Tool::Custom => " Cu ",
        Tool::Shell => " Sh ",
    }
}

pub fn tool_color(tool: Tool) -> Color {
    match tool {
        Tool::Claude => Color::Rgb(217, 119, 80),
        Tool::Opencode => Color::Rgb(245, 158, 11),
        Tool::Gemini => Color::Rgb(80, 140, 240),
        Tool::Codex => Color::Rgb(16, 185, 129),
        Tool::Custom => Color::Rgb(168, 85, 247),
        Tool::Shell => Color::Gray,
    }
}
