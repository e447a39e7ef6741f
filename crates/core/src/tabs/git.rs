use workdeck_api::Session;

use crate::diff::{DiffLine, classify_diff};

/// One of the three concurrent git fetches, delivered as it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitPart {
    Status(Result<String, String>),
    Diff(Result<String, String>),
    /// `None` when no PR exists or the lookup failed.
    PullRequest(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GitText {
    #[default]
    Loading,
    Ready(String),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitPanel {
    /// False when the session has no working directory.
    pub available: bool,
    pub uncommitted: bool,
    pub status: GitText,
    pub diff: GitText,
    pub pr_url: Option<String>,
}

impl GitPanel {
    pub fn for_session(session: &Session) -> Self {
        Self {
            available: session.has_worktree(),
            uncommitted: session.has_uncommitted,
            status: GitText::Loading,
            diff: GitText::Loading,
            pr_url: None,
        }
    }

    /// Reset all three parts before a manual refresh.
    pub fn begin_refresh(&mut self) {
        self.status = GitText::Loading;
        self.diff = GitText::Loading;
        self.pr_url = None;
    }

    pub fn apply(&mut self, part: GitPart) {
        let ready = |result: Result<String, String>| match result {
            Ok(text) => GitText::Ready(text),
            Err(_) => GitText::Failed,
        };
        match part {
            GitPart::Status(result) => self.status = ready(result),
            GitPart::Diff(result) => self.diff = ready(result),
            GitPart::PullRequest(url) => self.pr_url = url.filter(|u| !u.is_empty()),
        }
    }

    pub fn status_text(&self) -> &str {
        match &self.status {
            GitText::Loading => "loading...",
            GitText::Ready(text) if text.trim().is_empty() => "(nothing to show)",
            GitText::Ready(text) => text,
            GitText::Failed => "(error fetching status)",
        }
    }

    /// Classified diff lines, or a single placeholder line.
    pub fn diff_lines(&self) -> Result<Vec<DiffLine>, &'static str> {
        match &self.diff {
            GitText::Loading => Err("loading..."),
            GitText::Ready(text) if text.trim().is_empty() => Err("(no diff)"),
            GitText::Ready(text) => Ok(classify_diff(text)),
            GitText::Failed => Err("(error fetching diff)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> GitPanel {
        GitPanel::for_session(&Session {
            worktree_path: Some("/wt/a".to_string()),
            has_uncommitted: true,
            ..Session::default()
        })
    }

    #[test]
    fn parts_resolve_independently() {
        let mut panel = panel();
        assert!(panel.available);
        assert!(panel.uncommitted);
        assert_eq!(panel.status_text(), "loading...");

        panel.apply(GitPart::Diff(Ok("+added".to_string())));
        assert_eq!(panel.status_text(), "loading...");
        assert_eq!(panel.diff_lines().map(|l| l.len()), Ok(1));

        panel.apply(GitPart::Status(Err("500".to_string())));
        assert_eq!(panel.status_text(), "(error fetching status)");
    }

    #[test]
    fn empty_outputs_have_placeholders() {
        let mut panel = panel();
        panel.apply(GitPart::Status(Ok(String::new())));
        panel.apply(GitPart::Diff(Ok("\n".to_string())));
        assert_eq!(panel.status_text(), "(nothing to show)");
        assert_eq!(panel.diff_lines(), Err("(no diff)"));
    }

    #[test]
    fn pr_action_only_for_non_empty_url() {
        let mut panel = panel();
        panel.apply(GitPart::PullRequest(Some(String::new())));
        assert_eq!(panel.pr_url, None);
        panel.apply(GitPart::PullRequest(Some("https://pr/1".to_string())));
        assert_eq!(panel.pr_url.as_deref(), Some("https://pr/1"));

        panel.begin_refresh();
        assert_eq!(panel.pr_url, None);
        assert_eq!(panel.diff, GitText::Loading);
    }
}
