use anyhow::{Context, Result};
use std::fmt::Write as _;
use workdeck_api_client::ApiClient;
use workdeck_core::Mirror;
use workdeck_core::status::status_icon;

use crate::client::ensure_access;

/// Print the current snapshot, grouped the way the dashboard shows it.
pub async fn run_sessions(client: &ApiClient) -> Result<()> {
    ensure_access(client).await?;
    let snapshot = client
        .sessions()
        .await
        .context("Failed to fetch sessions")?;
    print!("{}", format_sessions(&Mirror::from(snapshot)));
    Ok(())
}

pub fn format_sessions(mirror: &Mirror) -> String {
    let grouped = mirror.grouped();
    if grouped.is_empty() {
        return "No sessions.\n".to_string();
    }

    let title_width = mirror
        .sessions()
        .iter()
        .map(|s| s.display_title().chars().count())
        .max()
        .unwrap_or(0)
        .max(5);

    let mut out = String::new();
    for entry in grouped {
        let _ = writeln!(out, "{} ({})", entry.group.display_name(), entry.group.path);
        if entry.sessions.is_empty() {
            let _ = writeln!(out, "  (empty)");
        }
        for session in entry.sessions {
            let _ = writeln!(
                out,
                "  {} {:<title_width$}  {:<8}  {:<8}  {}",
                status_icon(session.status).glyph,
                session.display_title(),
                session.tool.as_str(),
                session.status.as_str(),
                session.id,
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use workdeck_api::{Group, Session, SessionStatus, SessionsResponse, Tool};

    use super::*;

    #[test]
    fn groups_sessions_with_glyph_tool_and_status() {
        let mirror = Mirror::from(SessionsResponse {
            sessions: vec![
                Session {
                    id: "s1".to_string(),
                    title: "fix build".to_string(),
                    tool: Tool::Codex,
                    group_path: "work".to_string(),
                    status: SessionStatus::Running,
                    has_uncommitted: true,
                    ..Session::default()
                },
                Session {
                    id: "s2".to_string(),
                    title: "notes".to_string(),
                    group_path: "misc".to_string(),
                    status: SessionStatus::Stopped,
                    ..Session::default()
                },
            ],
            groups: vec![
                Group {
                    path: "work".to_string(),
                    name: "Work".to_string(),
                    repo_url: None,
                },
                Group {
                    path: "empty".to_string(),
                    name: "Empty".to_string(),
                    repo_url: None,
                },
            ],
        });

        let text = format_sessions(&mirror);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Work (work)");
        assert!(lines[1].starts_with("  ● * fix build"));
        assert!(lines[1].contains("codex"));
        assert!(lines[1].ends_with("s1"));
        assert_eq!(lines[2], "Empty (empty)");
        assert_eq!(lines[3], "  (empty)");
        assert_eq!(lines[4], "misc (misc)");
        assert!(lines[5].contains("◻ notes"));
        assert!(lines[5].contains("stopped"));
    }

    #[test]
    fn empty_snapshot() {
        assert_eq!(format_sessions(&Mirror::default()), "No sessions.\n");
    }
}
