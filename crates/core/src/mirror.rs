//! Local mirror of server-reported sessions and groups.

use std::borrow::Cow;
use std::collections::HashSet;

use workdeck_api::{Group, Session, SessionStatus, SessionsResponse};

/// Outcome of applying a single-session status notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPatch {
    Patched,
    /// The id is not in the mirror, so the mirror is stale.
    Miss,
}

/// Sessions and groups exactly as the last accepted snapshot reported them,
/// with status fields patched in place by push events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mirror {
    sessions: Vec<Session>,
    groups: Vec<Group>,
}

/// One entry of the derived group list.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedSessions<'a> {
    pub group: Cow<'a, Group>,
    pub sessions: Vec<&'a Session>,
}

impl From<SessionsResponse> for Mirror {
    fn from(snapshot: SessionsResponse) -> Self {
        Self {
            sessions: snapshot.sessions,
            groups: snapshot.groups,
        }
    }
}

impl Mirror {
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.session(id).is_some()
    }

    /// Declared group for `path`, if any.
    pub fn group(&self, path: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.path == path)
    }

    /// Overwrite the status of one session, leaving every other field alone.
    pub fn apply_status(&mut self, id: &str, status: SessionStatus) -> StatusPatch {
        match self.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.status = status;
                StatusPatch::Patched
            }
            None => StatusPatch::Miss,
        }
    }

    /// Declared groups first (first declaration of a path wins), then one
    /// synthetic group per undeclared `GroupPath` in session order.
    pub fn grouped(&self) -> Vec<GroupedSessions<'_>> {
        let mut seen = HashSet::new();
        let mut out: Vec<GroupedSessions<'_>> = Vec::new();

        for group in &self.groups {
            if seen.insert(group.path.as_str()) {
                out.push(GroupedSessions {
                    group: Cow::Borrowed(group),
                    sessions: Vec::new(),
                });
            }
        }
        for session in &self.sessions {
            if seen.insert(session.group_path.as_str()) {
                out.push(GroupedSessions {
                    group: Cow::Owned(Group::synthetic(&session.group_path)),
                    sessions: Vec::new(),
                });
            }
        }
        for session in &self.sessions {
            if let Some(entry) = out
                .iter_mut()
                .find(|entry| entry.group.path == session.group_path)
            {
                entry.sessions.push(session);
            }
        }
        out
    }
}
