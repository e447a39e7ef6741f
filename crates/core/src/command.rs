//! Side effects requested by the engine.
//!
//! The engine never performs I/O itself. Every network call is described
//! here and executed by the frontend, whose results come back as
//! [`Msg`](crate::dashboard::Msg)s.

use workdeck_api::CreateSessionRequest;

/// A user-initiated write. Failures of these are the only ones surfaced to
/// the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create(CreateSessionRequest),
    Stop { session_id: String },
    Restart { session_id: String },
    Delete { session_id: String },
}

impl Mutation {
    pub fn failure_message(&self, error: &str) -> String {
        match self {
            Self::Create(_) => format!("Create failed: {error}"),
            _ => format!("Failed: {error}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `GET /api/sessions`. `token` orders concurrent snapshot requests.
    FetchSnapshot { token: u64 },
    FetchUsage,
    /// Fire-and-forget `DELETE /api/sessions/{id}/ttyd`.
    TeardownTerminal { session_id: String },
    Mutate(Mutation),
    SaveNotes { session_id: String, notes: String },
    /// Status, diff and PR lookup, fetched concurrently.
    FetchGit { session_id: String },
    FetchActivity { session_id: String },
    /// Revoke the refresh credential after tearing down live terminals.
    Logout { teardown: Vec<String> },
}

impl Command {
    pub fn teardown(session_id: impl Into<String>) -> Self {
        Self::TeardownTerminal {
            session_id: session_id.into(),
        }
    }
}
