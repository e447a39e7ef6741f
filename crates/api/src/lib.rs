//! Wire types for the workdeck session server.
//!
//! This crate is the **single source of truth** for request/response shapes
//! exchanged with the server. The server encodes its records with Go-style
//! PascalCase field names and emits `null` for empty lists; the helpers in
//! [`serde_helpers`] normalize those quirks at the boundary so the rest of the
//! workspace never sees them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod push;
mod serde_helpers;

pub use push::{PushEvent, PushMessage};

use serde_helpers::{empty_as_none, null_as_default, terminal_target};

// ─── Shared Enums ────────────────────────────────────────────────────────────

/// Lifecycle state of a session, driven entirely by the server.
///
/// Values the client does not know (`creating`, `deleting`, anything newer)
/// collapse into [`SessionStatus::Unknown`], which renders like `idle`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Waiting,
    Running,
    Stopped,
    Error,
    #[serde(other)]
    Unknown,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle | Self::Unknown => "idle",
            Self::Waiting => "waiting",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Error => "error",
        }
    }

    /// `stopped` and `error` force resource teardown and gate the terminal tab.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Error)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The agent tool a session runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Claude,
    Opencode,
    Gemini,
    Codex,
    Custom,
    #[serde(other)]
    Shell,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Claude,
        Tool::Opencode,
        Tool::Gemini,
        Tool::Codex,
        Tool::Custom,
        Tool::Shell,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Opencode => "opencode",
            Self::Gemini => "gemini",
            Self::Codex => "codex",
            Self::Custom => "custom",
            Self::Shell => "shell",
        }
    }

    /// Next tool in [`Tool::ALL`] order, wrapping around.
    pub fn cycle(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Sessions & Groups ───────────────────────────────────────────────────────

/// A long-lived work session as reported by `GET /api/sessions`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Session {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tool: Tool,
    #[serde(default)]
    pub group_path: String,
    #[serde(default)]
    pub status: SessionStatus,
    /// Whether a terminal bridge target exists. The server sends the tmux
    /// session name (empty when absent); booleans are accepted as well.
    #[serde(default, deserialize_with = "terminal_target")]
    pub tmux_session: bool,
    #[serde(default)]
    pub has_uncommitted: bool,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub project_path: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub worktree_path: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl Session {
    /// A session has a git working directory when either path is known.
    pub fn has_worktree(&self) -> bool {
        self.project_path.is_some() || self.worktree_path.is_some()
    }

    /// Title with the `* ` marker for uncommitted changes.
    pub fn display_title(&self) -> String {
        if self.has_uncommitted {
            format!("* {}", self.title)
        } else {
            self.title.clone()
        }
    }
}

/// A named bucket of sessions.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    pub path: String,
    #[serde(default)]
    pub name: String,
    /// Groups backed by a repository create worktrees server-side, so the
    /// create form does not ask for a working-directory path.
    #[serde(default, rename = "RepoURL", deserialize_with = "empty_as_none")]
    pub repo_url: Option<String>,
}

impl Group {
    /// Synthetic group for a session whose `GroupPath` is not declared.
    pub fn synthetic(path: &str) -> Self {
        Self {
            path: path.to_string(),
            name: path.to_string(),
            repo_url: None,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.path
        } else {
            &self.name
        }
    }
}

/// Body of `GET /api/sessions`. Missing or `null` lists decode as empty.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sessions: Vec<Session>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub groups: Vec<Group>,
}

/// Body of `POST /api/sessions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateSessionRequest {
    pub title: String,
    pub tool: Tool,
    pub group_path: String,
    pub project_path: String,
}

/// Body of `POST /api/sessions/{id}/notes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

// ─── Activity ────────────────────────────────────────────────────────────────

/// One entry of a session's activity log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SessionEvent {
    #[serde(rename = "ID", default)]
    pub id: i64,
    #[serde(rename = "SessionID", default)]
    pub session_id: String,
    pub ts: DateTime<Utc>,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub detail: String,
}

/// Body of `GET /api/sessions/{id}/events`, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionEventsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<SessionEvent>,
}

// ─── Git ─────────────────────────────────────────────────────────────────────

/// Body of `GET /api/sessions/{id}/git/{status,diff}/text`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GitTextResponse {
    #[serde(default)]
    pub output: String,
}

/// Body of `GET /api/sessions/{id}/pr-url`; an empty url means no PR.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PrUrlResponse {
    #[serde(default)]
    pub url: String,
}

// ─── Usage ───────────────────────────────────────────────────────────────────

/// One usage sample. Utilizations are percentages (0–100), reset times are
/// Unix milliseconds (0 = unknown) and credits are in cents.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct UsageRecord {
    pub ts_ms: i64,
    pub five_hour_util: f64,
    pub five_hour_resets_at: i64,
    pub seven_day_util: f64,
    pub seven_day_resets_at: i64,
    pub extra_enabled: bool,
    pub extra_monthly_limit: f64,
    pub extra_used_credits: f64,
    pub extra_utilization: f64,
}

/// Body of `GET /api/usage`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UsageResponse {
    #[serde(default)]
    pub latest: Option<UsageRecord>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<UsageRecord>,
}

// ─── Auth ────────────────────────────────────────────────────────────────────

/// Username + password login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Returned on successful login / refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh token request.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Logout request (revoke refresh token).
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn session_decodes_server_record() {
        let session: Session = serde_json::from_value(json!({
            "ID": "s1",
            "Title": "fix login",
            "ProjectPath": "",
            "GroupPath": "work",
            "SortOrder": 3,
            "Command": "claude",
            "Tool": "claude",
            "Status": "running",
            "TmuxSession": "aw-fix-login",
            "WorktreePath": "/wt/fix-login",
            "RepoURL": "",
            "HasUncommitted": true,
            "Notes": "remember the cache"
        }))
        .expect("decode session");

        assert_eq!(session.id, "s1");
        assert_eq!(session.status, SessionStatus::Running);
        assert!(session.tmux_session);
        assert_eq!(session.project_path, None);
        assert_eq!(session.worktree_path.as_deref(), Some("/wt/fix-login"));
        assert!(session.has_worktree());
        assert_eq!(session.display_title(), "* fix login");
    }

    #[test]
    fn terminal_target_accepts_bool_string_and_null() {
        let from_bool: Session =
            serde_json::from_value(json!({"ID": "a", "TmuxSession": true})).expect("bool");
        let from_empty: Session =
            serde_json::from_value(json!({"ID": "b", "TmuxSession": ""})).expect("empty");
        let from_null: Session =
            serde_json::from_value(json!({"ID": "c", "TmuxSession": null})).expect("null");
        assert!(from_bool.tmux_session);
        assert!(!from_empty.tmux_session);
        assert!(!from_null.tmux_session);
    }

    #[test]
    fn unknown_status_and_tool_fall_back() {
        let session: Session = serde_json::from_value(json!({
            "ID": "s2",
            "Status": "creating",
            "Tool": ""
        }))
        .expect("decode");
        assert_eq!(session.status, SessionStatus::Unknown);
        assert_eq!(session.status.as_str(), "idle");
        assert_eq!(session.tool, Tool::Shell);
    }

    #[test]
    fn sessions_response_tolerates_missing_and_null_lists() {
        let missing: SessionsResponse = serde_json::from_value(json!({})).expect("missing");
        assert!(missing.sessions.is_empty());
        assert!(missing.groups.is_empty());

        let nulls: SessionsResponse =
            serde_json::from_value(json!({"sessions": null, "groups": null})).expect("nulls");
        assert!(nulls.sessions.is_empty());
        assert!(nulls.groups.is_empty());
    }

    #[test]
    fn group_display_name_defaults_to_path() {
        let group: Group =
            serde_json::from_value(json!({"Path": "infra", "Name": "", "RepoURL": ""}))
                .expect("decode group");
        assert_eq!(group.display_name(), "infra");
        assert_eq!(group.repo_url, None);
    }

    #[test]
    fn status_terminal_states() {
        assert!(SessionStatus::Stopped.is_terminal());
        assert!(SessionStatus::Error.is_terminal());
        assert!(!SessionStatus::Running.is_terminal());
        assert!(!SessionStatus::Unknown.is_terminal());
    }

    #[test]
    fn tool_cycle_wraps() {
        assert_eq!(Tool::Claude.cycle(), Tool::Opencode);
        assert_eq!(Tool::Shell.cycle(), Tool::Claude);
    }

    #[test]
    fn usage_response_with_null_latest() {
        let usage: UsageResponse =
            serde_json::from_value(json!({"latest": null, "history": null})).expect("usage");
        assert!(usage.latest.is_none());
        assert!(usage.history.is_empty());
    }
}
