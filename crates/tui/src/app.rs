use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tracing::warn;
use workdeck_api::Tool;
use workdeck_core::create_form::CreateDraft;
use workdeck_core::tabs::{DetailTab, TabContent};
use workdeck_core::view::HeaderAction;
use workdeck_core::{Command, Dashboard, Msg, ScrollDirection};

use crate::bridge::open_in_browser;
use crate::views::modal::{ConfirmAction, Modal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Detail,
}

/// One selectable line of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarItem {
    Group(String),
    Session(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateField {
    Title,
    Tool,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFormState {
    pub group_path: String,
    pub draft: CreateDraft,
    pub field: CreateField,
    pub needs_path: bool,
}

impl CreateFormState {
    fn fields(&self) -> &'static [CreateField] {
        if self.needs_path {
            &[CreateField::Title, CreateField::Tool, CreateField::Path]
        } else {
            &[CreateField::Title, CreateField::Tool]
        }
    }

    fn step_field(&mut self, forward: bool) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        let next = if forward {
            (idx + 1) % fields.len()
        } else {
            (idx + fields.len() - 1) % fields.len()
        };
        self.field = fields[next];
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingNotes,
    CreateForm(CreateFormState),
}

/// Frontend state around the engine: focus, cursor, modes and overlays.
pub struct App {
    pub dashboard: Dashboard,
    pub server_url: String,
    pub focus: Focus,
    pub cursor: usize,
    pub input: InputMode,
    pub modal: Option<Modal>,
    pub show_help: bool,
    pub should_quit: bool,
    /// Local notice (e.g. browser launch failure), cleared on the next key.
    pub notice: Option<String>,
    /// Wheel delta applied to the terminal viewport of the current panel.
    pub terminal_scroll: i32,
    scroll_generation: u64,
}

impl App {
    pub fn new(dashboard: Dashboard, server_url: impl Into<String>) -> Self {
        Self {
            dashboard,
            server_url: server_url.into(),
            focus: Focus::Sidebar,
            cursor: 0,
            input: InputMode::Normal,
            modal: None,
            show_help: false,
            should_quit: false,
            notice: None,
            terminal_scroll: 0,
            scroll_generation: 0,
        }
    }

    pub fn sidebar_items(&self) -> Vec<SidebarItem> {
        let mut items = Vec::new();
        for group in self.dashboard.sidebar() {
            items.push(SidebarItem::Group(group.path.clone()));
            items.extend(
                group
                    .rows
                    .iter()
                    .map(|row| SidebarItem::Session(row.session_id.clone())),
            );
        }
        items
    }

    fn current_item(&self) -> Option<SidebarItem> {
        self.sidebar_items().into_iter().nth(self.cursor)
    }

    /// Group owning the item under the cursor.
    fn current_group(&self) -> Option<String> {
        let mut group = None;
        for (idx, item) in self.sidebar_items().into_iter().enumerate() {
            if let SidebarItem::Group(path) = item {
                group = Some(path);
            }
            if idx == self.cursor {
                break;
            }
        }
        group
    }

    /// Feed one message to the engine and keep frontend state consistent.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Command> {
        let commands = self.dashboard.update(msg);
        self.sync();
        commands
    }

    fn sync(&mut self) {
        let len = self.sidebar_items().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));

        match &self.input {
            InputMode::CreateForm(form)
                if !self.dashboard.is_create_form_open(&form.group_path) =>
            {
                self.input = InputMode::Normal;
            }
            InputMode::EditingNotes if self.dashboard.notes_editor_mut().is_none() => {
                self.input = InputMode::Normal;
            }
            _ => {}
        }

        let generation = self.dashboard.detail().map(|d| d.generation);
        match generation {
            None => self.focus = Focus::Sidebar,
            Some(generation) if generation != self.scroll_generation => {
                self.scroll_generation = generation;
                self.terminal_scroll = 0;
            }
            Some(_) => {}
        }
        if let Some(handle) = self.dashboard.terminal_handle_mut() {
            for gesture in handle.take_gestures() {
                self.terminal_scroll = (self.terminal_scroll + gesture.delta_y).min(0);
            }
        }
    }

    // ── Keys ─────────────────────────────────────────────────────────

    /// Translate a key press into engine messages. Purely local effects
    /// (cursor, modes, overlays, notes typing) are applied directly.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Msg> {
        let mut msgs = Vec::new();
        self.notice = None;
        if self.dashboard.flash().is_some() {
            msgs.push(Msg::DismissFlash);
        }

        if self.modal.is_some() {
            msgs.extend(self.handle_modal_key(key.code));
            return msgs;
        }
        if self.show_help {
            self.show_help = false;
            return msgs;
        }
        match self.input {
            InputMode::EditingNotes => {
                msgs.extend(self.handle_notes_key(key));
                return msgs;
            }
            InputMode::CreateForm(_) => {
                msgs.extend(self.handle_create_key(key));
                return msgs;
            }
            InputMode::Normal => {}
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('L') => {
                self.modal = Some(Modal::Confirm {
                    title: "Logout".to_string(),
                    message: "Log out of this server?".to_string(),
                    action: ConfirmAction::Logout,
                });
            }
            _ => match self.focus {
                Focus::Sidebar => msgs.extend(self.handle_sidebar_key(key.code)),
                Focus::Detail => msgs.extend(self.handle_detail_key(key)),
            },
        }
        msgs
    }

    /// Wheel over the dashboard scrolls the live terminal of the detail panel.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Msg> {
        if self.focus != Focus::Detail || self.modal.is_some() {
            return Vec::new();
        }
        let on_terminal = self
            .dashboard
            .detail()
            .is_some_and(|d| d.active_tab() == DetailTab::Terminal);
        match mouse.kind {
            MouseEventKind::ScrollUp if on_terminal => {
                vec![Msg::ScrollTerminal(ScrollDirection::Up)]
            }
            MouseEventKind::ScrollDown if on_terminal => {
                vec![Msg::ScrollTerminal(ScrollDirection::Down)]
            }
            _ => Vec::new(),
        }
    }

    fn handle_modal_key(&mut self, code: KeyCode) -> Vec<Msg> {
        match code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let Some(Modal::Confirm { action, .. }) = self.modal.take() else {
                    return Vec::new();
                };
                vec![match action {
                    ConfirmAction::Stop(id) => Msg::Stop(id),
                    ConfirmAction::Restart(id) => Msg::Restart(id),
                    ConfirmAction::Delete(id) => {
                        self.focus = Focus::Sidebar;
                        Msg::Delete(id)
                    }
                    ConfirmAction::Logout => Msg::Logout,
                }]
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.modal = None;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_sidebar_key(&mut self, code: KeyCode) -> Vec<Msg> {
        let len = self.sidebar_items().len();
        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Char('g') | KeyCode::Home => self.cursor = 0,
            KeyCode::Char('G') | KeyCode::End => self.cursor = len.saturating_sub(1),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => match self.current_item() {
                Some(SidebarItem::Session(id)) => {
                    self.focus = Focus::Detail;
                    return vec![Msg::Select(id)];
                }
                Some(SidebarItem::Group(path)) => return self.open_create_form(path),
                None => {}
            },
            KeyCode::Char('n') => {
                if let Some(path) = self.current_group() {
                    return self.open_create_form(path);
                }
            }
            KeyCode::Tab => {
                if self.dashboard.detail().is_some() {
                    self.focus = Focus::Detail;
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn open_create_form(&mut self, group_path: String) -> Vec<Msg> {
        let needs_path = self
            .dashboard
            .sidebar()
            .iter()
            .find(|g| g.path == group_path)
            .is_none_or(|g| g.needs_path);
        let msgs = if self.dashboard.is_create_form_open(&group_path) {
            Vec::new()
        } else {
            vec![Msg::ToggleCreateForm(group_path.clone())]
        };
        self.input = InputMode::CreateForm(CreateFormState {
            group_path,
            draft: CreateDraft::default(),
            field: CreateField::Title,
            needs_path,
        });
        msgs
    }

    fn handle_create_key(&mut self, key: KeyEvent) -> Vec<Msg> {
        let InputMode::CreateForm(form) = &mut self.input else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Esc => {
                let group_path = form.group_path.clone();
                self.input = InputMode::Normal;
                return vec![Msg::ToggleCreateForm(group_path)];
            }
            KeyCode::Enter => {
                return vec![Msg::SubmitCreate {
                    group_path: form.group_path.clone(),
                    draft: form.draft.clone(),
                }];
            }
            KeyCode::Tab | KeyCode::Down => form.step_field(true),
            KeyCode::BackTab | KeyCode::Up => form.step_field(false),
            code => match (form.field, code) {
                (CreateField::Tool, KeyCode::Right | KeyCode::Char(' ')) => {
                    form.draft.tool = form.draft.tool.cycle();
                }
                (CreateField::Tool, KeyCode::Left) => {
                    form.draft.tool = previous_tool(form.draft.tool);
                }
                (CreateField::Title, KeyCode::Char(c)) => form.draft.title.push(c),
                (CreateField::Title, KeyCode::Backspace) => {
                    form.draft.title.pop();
                }
                (CreateField::Path, KeyCode::Char(c)) => form.draft.path.push(c),
                (CreateField::Path, KeyCode::Backspace) => {
                    form.draft.path.pop();
                }
                _ => {}
            },
        }
        Vec::new()
    }

    fn handle_notes_key(&mut self, key: KeyEvent) -> Vec<Msg> {
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Msg::SaveNotes];
        }
        let Some(editor) = self.dashboard.notes_editor_mut() else {
            self.input = InputMode::Normal;
            return Vec::new();
        };
        match key.code {
            KeyCode::Esc => {
                editor.set_focused(false);
                self.input = InputMode::Normal;
            }
            KeyCode::Enter => editor.insert('\n'),
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Delete => editor.delete(),
            KeyCode::Left => editor.move_left(),
            KeyCode::Right => editor.move_right(),
            KeyCode::Home => editor.move_home(),
            KeyCode::End => editor.move_end(),
            KeyCode::Char(c) => editor.insert(c),
            _ => {}
        }
        Vec::new()
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Vec<Msg> {
        let Some(detail) = self.dashboard.detail() else {
            self.focus = Focus::Sidebar;
            return Vec::new();
        };
        let session_id = detail.session_id.clone();
        let tabs = detail.tabs.clone();
        let active = detail.active_tab();
        let actions = detail.header.actions.clone();
        let title = detail.header.title.clone();
        let tab_idx = tabs.iter().position(|t| *t == active).unwrap_or(0);

        let confirm = |verb: &str, action: ConfirmAction| Modal::Confirm {
            title: verb.to_string(),
            message: format!("{verb} \"{title}\"?"),
            action,
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => {
                self.focus = Focus::Sidebar;
                return vec![Msg::BackToList];
            }
            KeyCode::Tab | KeyCode::Char(']') => {
                return vec![Msg::SelectTab(tabs[(tab_idx + 1) % tabs.len()])];
            }
            KeyCode::BackTab | KeyCode::Char('[') => {
                return vec![Msg::SelectTab(
                    tabs[(tab_idx + tabs.len() - 1) % tabs.len()],
                )];
            }
            KeyCode::Char(c @ '1'..='4') => {
                let idx = usize::from(c as u8 - b'1');
                if let Some(tab) = tabs.get(idx) {
                    return vec![Msg::SelectTab(*tab)];
                }
            }
            KeyCode::Char('S') if actions.contains(&HeaderAction::Stop) => {
                self.modal = Some(confirm("Stop", ConfirmAction::Stop(session_id)));
            }
            KeyCode::Char('R') => {
                self.modal = Some(confirm("Restart", ConfirmAction::Restart(session_id)));
            }
            KeyCode::Char('D') => {
                self.modal = Some(confirm("Delete", ConfirmAction::Delete(session_id)));
            }
            code => return self.handle_tab_key(active, code, key.modifiers),
        }
        Vec::new()
    }

    fn handle_tab_key(
        &mut self,
        active: DetailTab,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> Vec<Msg> {
        match (active, code) {
            (DetailTab::Terminal, KeyCode::PageUp | KeyCode::Char('u')) => {
                vec![Msg::ScrollTerminal(ScrollDirection::Up)]
            }
            (DetailTab::Terminal, KeyCode::PageDown | KeyCode::Char('d')) => {
                vec![Msg::ScrollTerminal(ScrollDirection::Down)]
            }
            (DetailTab::Terminal, KeyCode::Char('o')) => {
                if let Some(url) = self.dashboard.terminal_handle_mut().map(|h| h.url().to_string())
                {
                    self.open_url(&url);
                }
                Vec::new()
            }
            (DetailTab::Git, KeyCode::Char('r')) => vec![Msg::RefreshGit],
            (DetailTab::Git, KeyCode::Char('o')) => {
                let pr_url = match self.dashboard.detail().map(|d| &d.content) {
                    Some(TabContent::Git(panel)) => panel.pr_url.clone(),
                    _ => None,
                };
                if let Some(url) = pr_url {
                    self.open_url(&url);
                }
                Vec::new()
            }
            (DetailTab::Notes, KeyCode::Char('s')) if modifiers.contains(KeyModifiers::CONTROL) => {
                vec![Msg::SaveNotes]
            }
            (DetailTab::Notes, KeyCode::Char('e') | KeyCode::Enter) => {
                if let Some(editor) = self.dashboard.notes_editor_mut() {
                    editor.set_focused(true);
                    self.input = InputMode::EditingNotes;
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn open_url(&mut self, url: &str) {
        if let Err(e) = open_in_browser(url) {
            warn!("failed to open {url}: {e:#}");
            self.notice = Some(format!("Could not open browser: {e}"));
        }
    }
}

fn previous_tool(tool: Tool) -> Tool {
    let idx = Tool::ALL.iter().position(|t| *t == tool).unwrap_or(0);
    Tool::ALL[(idx + Tool::ALL.len() - 1) % Tool::ALL.len()]
}

#[cfg(test)]
pub(crate) mod testing {
    use workdeck_api::{Group, Session, SessionStatus, SessionsResponse};
    use workdeck_core::{Dashboard, Msg, TerminalBridge, TerminalHandle};

    use super::App;

    pub(crate) struct StubBridge;

    impl TerminalBridge for StubBridge {
        fn open(&self, session_id: &str) -> TerminalHandle {
            TerminalHandle::new(session_id, format!("http://stub/{session_id}/"))
        }
    }

    pub(crate) fn app_with(sessions: Vec<Session>) -> App {
        let mut app = App::new(Dashboard::new(Box::new(StubBridge), 20), "http://deck");
        app.dispatch(Msg::SnapshotLoaded {
            token: 1,
            snapshot: SessionsResponse {
                sessions,
                groups: vec![Group {
                    path: "work".into(),
                    name: "Work".into(),
                    repo_url: None,
                }],
            },
        });
        app
    }

    pub(crate) fn running(id: &str) -> Session {
        Session {
            id: id.into(),
            title: format!("task {id}"),
            group_path: "work".into(),
            status: SessionStatus::Running,
            tmux_session: true,
            ..Session::default()
        }
    }
}
