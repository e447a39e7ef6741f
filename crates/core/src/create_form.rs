//! Inline "new session" form validation.

use thiserror::Error;
use workdeck_api::{CreateSessionRequest, Group, Tool};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateFormError {
    #[error("Path is required for this group.")]
    PathRequired,
}

/// Raw field values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateDraft {
    pub title: String,
    pub tool: Tool,
    pub path: String,
}

/// Repository-backed groups create worktrees server-side and need no path.
pub fn needs_path(group: Option<&Group>) -> bool {
    group.is_none_or(|g| g.repo_url.is_none())
}

/// Validate locally; an error means no request is sent.
pub fn build_request(
    group_path: &str,
    group: Option<&Group>,
    draft: &CreateDraft,
) -> Result<CreateSessionRequest, CreateFormError> {
    let needs_path = needs_path(group);
    let path = draft.path.trim();
    if needs_path && path.is_empty() {
        return Err(CreateFormError::PathRequired);
    }
    Ok(CreateSessionRequest {
        title: draft.title.trim().to_string(),
        tool: draft.tool,
        group_path: group_path.to_string(),
        project_path: if needs_path {
            path.to_string()
        } else {
            String::new()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(repo: Option<&str>) -> Group {
        Group {
            path: "work".to_string(),
            name: "Work".to_string(),
            repo_url: repo.map(str::to_string),
        }
    }

    #[test]
    fn plain_group_requires_path() {
        let draft = CreateDraft {
            path: "   ".to_string(),
            ..CreateDraft::default()
        };
        let err = build_request("work", Some(&group(None)), &draft).expect_err("invalid");
        assert_eq!(err.to_string(), "Path is required for this group.");
        // Synthetic groups are never repository-backed.
        assert!(build_request("other", None, &draft).is_err());
    }

    #[test]
    fn repo_group_ignores_path_field() {
        let draft = CreateDraft {
            title: "  fix login ".to_string(),
            tool: Tool::Codex,
            path: "/ignored".to_string(),
        };
        let req = build_request("work", Some(&group(Some("git@x:y.git"))), &draft).expect("valid");
        assert_eq!(
            req,
            CreateSessionRequest {
                title: "fix login".to_string(),
                tool: Tool::Codex,
                group_path: "work".to_string(),
                project_path: String::new(),
            }
        );
    }

    #[test]
    fn path_is_trimmed() {
        let draft = CreateDraft {
            path: " /src/app ".to_string(),
            ..CreateDraft::default()
        };
        let req = build_request("work", Some(&group(None)), &draft).expect("valid");
        assert_eq!(req.project_path, "/src/app");
        assert_eq!(req.title, "");
    }
}
