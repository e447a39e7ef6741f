//! Rendering-independent view model.
//!
//! The sidebar is cheap and always re-derived. The detail panel is retained
//! between passes and either rebuilt or patched by the reconciler.

use std::collections::HashSet;

use workdeck_api::{Session, SessionStatus, Tool};

use crate::create_form;
use crate::mirror::Mirror;
use crate::status::{HeaderTint, StatusIcon, header_tint, status_icon};
use crate::tabs::{DetailTab, TabContent};

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarRow {
    pub session_id: String,
    pub title: String,
    pub tool: Tool,
    pub status: SessionStatus,
    pub icon: StatusIcon,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarGroup {
    pub path: String,
    pub name: String,
    pub create_form_open: bool,
    /// The create form asks for a working-directory path.
    pub needs_path: bool,
    pub rows: Vec<SidebarRow>,
}

pub fn build_sidebar(
    mirror: &Mirror,
    selected: Option<&str>,
    open_forms: &HashSet<String>,
) -> Vec<SidebarGroup> {
    mirror
        .grouped()
        .into_iter()
        .map(|entry| SidebarGroup {
            path: entry.group.path.clone(),
            name: entry.group.display_name().to_string(),
            create_form_open: open_forms.contains(&entry.group.path),
            needs_path: create_form::needs_path(mirror.group(&entry.group.path)),
            rows: entry
                .sessions
                .into_iter()
                .map(|session| SidebarRow {
                    session_id: session.id.clone(),
                    title: session.display_title(),
                    tool: session.tool,
                    status: session.status,
                    icon: status_icon(session.status),
                    selected: selected == Some(session.id.as_str()),
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Stop,
    Restart,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailHeader {
    pub title: String,
    pub tool: Tool,
    pub status: SessionStatus,
    pub icon: StatusIcon,
    pub tint: Option<HeaderTint>,
    pub actions: Vec<HeaderAction>,
}

impl DetailHeader {
    pub fn for_session(session: &Session) -> Self {
        let mut header = Self {
            title: session.display_title(),
            tool: session.tool,
            status: session.status,
            icon: status_icon(session.status),
            tint: None,
            actions: Vec::new(),
        };
        header.patch_status(session.status);
        header
    }

    /// Update badge, tint and status-dependent actions in place.
    pub fn patch_status(&mut self, status: SessionStatus) {
        self.status = status;
        self.icon = status_icon(status);
        self.tint = header_tint(status);
        self.actions.clear();
        if status != SessionStatus::Stopped {
            self.actions.push(HeaderAction::Stop);
        }
        self.actions
            .extend([HeaderAction::Restart, HeaderAction::Delete]);
    }
}

/// The materialized detail panel for the rendered session.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub session_id: String,
    pub header: DetailHeader,
    pub tabs: Vec<DetailTab>,
    pub content: TabContent,
    /// Bumped on every full rebuild.
    pub generation: u64,
}

impl DetailPanel {
    pub fn active_tab(&self) -> DetailTab {
        self.content.tab()
    }
}
