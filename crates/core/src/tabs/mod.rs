//! Detail tab controllers.
//!
//! Each tab is built from `(session, resources)` when it is activated or when
//! the detail panel is rebuilt. Building may acquire a terminal resource and
//! may request fetches; the results are applied later by the dashboard.

mod activity;
mod git;
mod notes;
mod terminal;

pub use activity::{ActivityPanel, ActivityRow, format_time};
pub use git::{GitPanel, GitPart, GitText};
pub use notes::NotesEditor;
pub use terminal::TerminalPane;

use workdeck_api::Session;

use crate::command::Command;
use crate::resources::ResourceCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailTab {
    Terminal,
    Git,
    Notes,
    Activity,
}

impl DetailTab {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Terminal => "terminal",
            Self::Git => "git",
            Self::Notes => "notes",
            Self::Activity => "activity",
        }
    }
}

/// Tabs offered for a session; the terminal tab needs a bridge target.
pub fn tabs_for(session: &Session) -> Vec<DetailTab> {
    let mut tabs = Vec::with_capacity(4);
    if session.tmux_session {
        tabs.push(DetailTab::Terminal);
    }
    tabs.extend([DetailTab::Git, DetailTab::Notes, DetailTab::Activity]);
    tabs
}

pub fn default_for(session: &Session) -> DetailTab {
    if session.tmux_session {
        DetailTab::Terminal
    } else {
        DetailTab::Notes
    }
}

/// Materialized content of the active tab.
#[derive(Debug, Clone, PartialEq)]
pub enum TabContent {
    Terminal(TerminalPane),
    Git(GitPanel),
    Notes(NotesEditor),
    Activity(ActivityPanel),
}

impl TabContent {
    pub fn tab(&self) -> DetailTab {
        match self {
            Self::Terminal(_) => DetailTab::Terminal,
            Self::Git(_) => DetailTab::Git,
            Self::Notes(_) => DetailTab::Notes,
            Self::Activity(_) => DetailTab::Activity,
        }
    }
}

/// Build fresh content for `tab`, returning the fetches it needs.
pub fn build(
    tab: DetailTab,
    session: &Session,
    resources: &mut ResourceCache,
) -> (TabContent, Vec<Command>) {
    match tab {
        DetailTab::Terminal => (
            TabContent::Terminal(TerminalPane::open(session, resources)),
            Vec::new(),
        ),
        DetailTab::Git => {
            let panel = GitPanel::for_session(session);
            let commands = if panel.available {
                vec![Command::FetchGit {
                    session_id: session.id.clone(),
                }]
            } else {
                Vec::new()
            };
            (TabContent::Git(panel), commands)
        }
        DetailTab::Notes => (
            TabContent::Notes(NotesEditor::new(&session.notes)),
            Vec::new(),
        ),
        DetailTab::Activity => (
            TabContent::Activity(ActivityPanel::loading()),
            vec![Command::FetchActivity {
                session_id: session.id.clone(),
            }],
        ),
    }
}

#[cfg(test)]
mod tests {
    use workdeck_api::SessionStatus;

    use super::*;
    use crate::resources::testing::CountingBridge;

    fn session(tmux: bool, status: SessionStatus) -> Session {
        Session {
            id: "s1".to_string(),
            status,
            tmux_session: tmux,
            notes: "hello".to_string(),
            ..Session::default()
        }
    }

    #[test]
    fn tab_sets_depend_on_terminal_target() {
        let with = session(true, SessionStatus::Running);
        let without = session(false, SessionStatus::Running);
        assert_eq!(
            tabs_for(&with),
            vec![
                DetailTab::Terminal,
                DetailTab::Git,
                DetailTab::Notes,
                DetailTab::Activity
            ]
        );
        assert_eq!(tabs_for(&without)[0], DetailTab::Git);
        assert_eq!(default_for(&with), DetailTab::Terminal);
        assert_eq!(default_for(&without), DetailTab::Notes);
    }

    #[test]
    fn terminal_tab_acquires_only_for_live_sessions() {
        let bridge = CountingBridge::default();
        let mut resources = ResourceCache::new(Box::new(bridge.clone()));

        let (content, commands) = build(
            DetailTab::Terminal,
            &session(true, SessionStatus::Stopped),
            &mut resources,
        );
        assert_eq!(
            content,
            TabContent::Terminal(TerminalPane::Inactive(SessionStatus::Stopped))
        );
        assert!(commands.is_empty());
        assert!(resources.is_empty());

        let (content, _) = build(
            DetailTab::Terminal,
            &session(true, SessionStatus::Idle),
            &mut resources,
        );
        assert!(matches!(content, TabContent::Terminal(TerminalPane::Live { .. })));
        assert_eq!(bridge.opened(), 1);
    }

    #[test]
    fn git_tab_without_worktree_fetches_nothing() {
        let mut resources = ResourceCache::new(Box::new(CountingBridge::default()));
        let (content, commands) = build(
            DetailTab::Git,
            &session(false, SessionStatus::Idle),
            &mut resources,
        );
        assert!(commands.is_empty());
        let TabContent::Git(panel) = content else {
            panic!("expected git panel");
        };
        assert!(!panel.available);
    }

    #[test]
    fn activity_tab_requests_events() {
        let mut resources = ResourceCache::new(Box::new(CountingBridge::default()));
        let (_, commands) = build(
            DetailTab::Activity,
            &session(false, SessionStatus::Idle),
            &mut resources,
        );
        assert_eq!(
            commands,
            vec![Command::FetchActivity {
                session_id: "s1".to_string()
            }]
        );
    }
}
