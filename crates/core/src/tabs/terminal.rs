use workdeck_api::{Session, SessionStatus};

use crate::resources::ResourceCache;

/// What the terminal tab shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalPane {
    /// The session has no bridge target.
    NoTarget,
    /// Stopped or errored; no resource is held.
    Inactive(SessionStatus),
    /// A live resource embedded at `url`.
    Live { url: String },
}

impl TerminalPane {
    /// Whether a session in this state should show a live terminal.
    pub fn wants_live(session: &Session) -> bool {
        session.tmux_session && !session.status.is_terminal()
    }

    pub(crate) fn open(session: &Session, resources: &mut ResourceCache) -> Self {
        if !session.tmux_session {
            return Self::NoTarget;
        }
        if session.status.is_terminal() {
            return Self::Inactive(session.status);
        }
        let handle = resources.acquire(&session.id);
        Self::Live {
            url: handle.url().to_string(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live { .. })
    }

    pub fn placeholder(&self) -> Option<String> {
        match self {
            Self::NoTarget => Some("No tmux session.".to_string()),
            Self::Inactive(status) => Some(format!(
                "Session is {status}. Use Restart to resume access."
            )),
            Self::Live { .. } => None,
        }
    }
}
