//! Reconciliation pass: aligns the view model and the resource cache with
//! the mirror and the current selection.
//!
//! Runs after every mirror mutation and every selection change. A changed
//! selection rebuilds the detail panel; anything else only patches the
//! header, so focus, editor contents and live terminals survive status ticks.

use crate::command::Command;
use crate::dashboard::Dashboard;
use crate::tabs::{self, DetailTab, TabContent};
use crate::view::{DetailHeader, DetailPanel, build_sidebar};

impl Dashboard {
    pub(crate) fn reconcile(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();

        if let Some(id) = self.selected.as_deref()
            && !self.mirror.contains(id)
        {
            self.selected = None;
            self.mobile_show_detail = false;
        }

        // A pending Stop resolves once the session is gone or reports a
        // terminal status.
        self.stopping.retain(|id| {
            self.mirror
                .session(id)
                .is_some_and(|s| !s.status.is_terminal())
        });

        // Deleted, stopped or errored sessions must not keep a live terminal.
        for id in self.resources.session_ids() {
            let keep = self
                .mirror
                .session(&id)
                .is_some_and(|s| !s.status.is_terminal());
            if !keep {
                self.release(&id, &mut commands);
            }
        }

        self.rebuild_sidebar();

        if self.selected != self.rendered {
            // Release before moving `rendered` forward.
            if let Some(previous) = self.rendered.take()
                && self.selected.as_ref() != Some(&previous)
            {
                self.release(&previous, &mut commands);
            }
            self.rendered = self.selected.clone();
            commands.extend(self.rebuild_detail());
        } else {
            commands.extend(self.patch_detail());
        }
        commands
    }

    pub(crate) fn rebuild_sidebar(&mut self) {
        self.sidebar = build_sidebar(
            &self.mirror,
            self.selected.as_deref(),
            &self.open_create_forms,
        );
    }

    /// Throw away the detail panel and build it again from the mirror.
    pub(crate) fn rebuild_detail(&mut self) -> Vec<Command> {
        let Some(session) = self
            .rendered
            .as_deref()
            .and_then(|id| self.mirror.session(id))
            .cloned()
        else {
            self.detail = None;
            return Vec::new();
        };

        let available = tabs::tabs_for(&session);
        let tab = self
            .tab_state
            .get(&session.id)
            .copied()
            .filter(|tab| available.contains(tab))
            .unwrap_or_else(|| tabs::default_for(&session));
        self.tab_state.insert(session.id.clone(), tab);

        let view = self.terminal_view(&session);
        let (content, commands) = tabs::build(tab, &view, &mut self.resources);
        self.detail_generation += 1;
        self.detail = Some(DetailPanel {
            session_id: session.id.clone(),
            header: DetailHeader::for_session(&session),
            tabs: available,
            content,
            generation: self.detail_generation,
        });
        commands
    }

    /// Same session still rendered: touch the header only, plus the terminal
    /// pane when its liveness no longer matches the session.
    pub(crate) fn patch_detail(&mut self) -> Vec<Command> {
        let Some(detail) = self.detail.as_ref() else {
            return Vec::new();
        };
        let Some(session) = self.mirror.session(&detail.session_id) else {
            return Vec::new();
        };
        if tabs::tabs_for(session) != detail.tabs {
            return self.rebuild_detail();
        }
        let view = self.terminal_view(session);
        let stale_terminal = match &detail.content {
            TabContent::Terminal(pane) => self.terminal_pane_stale(pane, &view),
            _ => false,
        };
        let session = session.clone();

        let Some(detail) = self.detail.as_mut() else {
            return Vec::new();
        };
        detail.header.title = session.display_title();
        detail.header.patch_status(session.status);
        if !stale_terminal {
            return Vec::new();
        }
        let (content, commands) = tabs::build(DetailTab::Terminal, &view, &mut self.resources);
        detail.content = content;
        commands
    }
}
