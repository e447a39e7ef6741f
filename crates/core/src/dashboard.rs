//! Single-owner application state.
//!
//! Every input is a [`Msg`]. [`Dashboard::update`] mutates state and returns
//! the [`Command`]s the frontend must execute; results come back as further
//! messages on the same queue, so all state changes happen in one place and
//! in arrival order.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tracing::{debug, warn};
use workdeck_api::{
    PushEvent, Session, SessionEvent, SessionStatus, SessionsResponse, UsageResponse,
};

use crate::command::{Command, Mutation};
use crate::create_form::{self, CreateDraft};
use crate::mirror::{Mirror, StatusPatch};
use crate::resources::{ResourceCache, ScrollDirection, TerminalBridge, TerminalHandle};
use crate::tabs::{DetailTab, GitPart, NotesEditor, TabContent, TerminalPane};
use crate::usage::UsageSnapshot;
use crate::view::{DetailPanel, SidebarGroup};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    // ── Server state ─────────────────────────────────────────────────
    SnapshotLoaded {
        token: u64,
        snapshot: SessionsResponse,
    },
    UsageLoaded(UsageResponse),
    UsagePoll,

    // ── Push channel ─────────────────────────────────────────────────
    PushChannelOpened,
    Push(PushEvent),
    PushChannelLost {
        retry_in: Duration,
    },
    /// Credentials are gone and cannot be refreshed.
    Unauthenticated,

    // ── User input ───────────────────────────────────────────────────
    Select(String),
    BackToList,
    SelectTab(DetailTab),
    ToggleCreateForm(String),
    SubmitCreate {
        group_path: String,
        draft: CreateDraft,
    },
    Stop(String),
    Restart(String),
    Delete(String),
    SaveNotes,
    RefreshGit,
    ScrollTerminal(ScrollDirection),
    DismissFlash,
    Logout,

    // ── Command results ──────────────────────────────────────────────
    MutationDone {
        mutation: Mutation,
        result: Result<(), String>,
    },
    NotesSaved {
        session_id: String,
        notes: String,
        result: Result<(), String>,
    },
    GitLoaded {
        session_id: String,
        part: GitPart,
    },
    ActivityLoaded {
        session_id: String,
        result: Result<Vec<SessionEvent>, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Info,
    Error,
}

/// One-line message shown until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    Connecting,
    Open,
    Reconnecting { retry_in: Duration },
}

#[derive(Debug)]
pub struct Dashboard {
    pub(crate) mirror: Mirror,
    pub(crate) selected: Option<String>,
    pub(crate) rendered: Option<String>,
    pub(crate) tab_state: HashMap<String, DetailTab>,
    pub(crate) open_create_forms: HashSet<String>,
    pub(crate) mobile_show_detail: bool,
    pub(crate) resources: ResourceCache,
    pub(crate) sidebar: Vec<SidebarGroup>,
    pub(crate) detail: Option<DetailPanel>,
    pub(crate) detail_generation: u64,
    /// Sessions with a Stop in flight; their terminal stays closed until the
    /// server reports the outcome.
    pub(crate) stopping: HashSet<String>,
    usage: Option<UsageSnapshot>,
    flash: Option<Flash>,
    connection: Connection,
    signed_out: bool,
    snapshot_seq: u64,
    snapshot_applied: u64,
    activity_limit: usize,
}

impl Dashboard {
    pub fn new(bridge: Box<dyn TerminalBridge>, activity_limit: usize) -> Self {
        Self {
            mirror: Mirror::default(),
            selected: None,
            rendered: None,
            tab_state: HashMap::new(),
            open_create_forms: HashSet::new(),
            mobile_show_detail: false,
            resources: ResourceCache::new(bridge),
            sidebar: Vec::new(),
            detail: None,
            detail_generation: 0,
            stopping: HashSet::new(),
            usage: None,
            flash: None,
            connection: Connection::Connecting,
            signed_out: false,
            snapshot_seq: 0,
            snapshot_applied: 0,
            activity_limit,
        }
    }

    /// Initial fetches once credentials are in place.
    pub fn boot(&mut self) -> Vec<Command> {
        vec![self.request_snapshot(), Command::FetchUsage]
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn rendered(&self) -> Option<&str> {
        self.rendered.as_deref()
    }

    pub fn sidebar(&self) -> &[SidebarGroup] {
        &self.sidebar
    }

    pub fn detail(&self) -> Option<&DetailPanel> {
        self.detail.as_ref()
    }

    pub fn resources(&self) -> &ResourceCache {
        &self.resources
    }

    pub fn usage(&self) -> Option<&UsageSnapshot> {
        self.usage.as_ref()
    }

    pub fn flash(&self) -> Option<&Flash> {
        self.flash.as_ref()
    }

    pub fn connection(&self) -> Connection {
        self.connection
    }

    pub fn is_signed_out(&self) -> bool {
        self.signed_out
    }

    pub fn mobile_show_detail(&self) -> bool {
        self.mobile_show_detail
    }

    pub fn is_create_form_open(&self, group_path: &str) -> bool {
        self.open_create_forms.contains(group_path)
    }

    /// The notes editor, when the notes tab is showing.
    pub fn notes_editor_mut(&mut self) -> Option<&mut NotesEditor> {
        match self.detail.as_mut().map(|d| &mut d.content) {
            Some(TabContent::Notes(editor)) => Some(editor),
            _ => None,
        }
    }

    /// The live terminal of the rendered session, if any.
    pub fn terminal_handle_mut(&mut self) -> Option<&mut TerminalHandle> {
        let id = self.rendered.as_deref()?;
        self.resources.get_mut(id)
    }

    // ── Update ───────────────────────────────────────────────────────

    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::SnapshotLoaded { token, snapshot } => {
                if token <= self.snapshot_applied {
                    debug!(
                        token,
                        applied = self.snapshot_applied,
                        "discarding stale snapshot"
                    );
                    return Vec::new();
                }
                self.snapshot_applied = token;
                self.mirror = Mirror::from(snapshot);
                self.reconcile()
            }
            Msg::UsageLoaded(response) => {
                self.usage = response.latest.as_ref().map(UsageSnapshot::from_record);
                Vec::new()
            }
            Msg::UsagePoll => vec![Command::FetchUsage],

            Msg::PushChannelOpened => {
                self.connection = Connection::Open;
                Vec::new()
            }
            Msg::Push(event) => self.apply_push(event),
            Msg::PushChannelLost { retry_in } => {
                self.connection = Connection::Reconnecting { retry_in };
                Vec::new()
            }
            Msg::Unauthenticated => {
                self.signed_out = true;
                Vec::new()
            }

            Msg::Select(session_id) => {
                if !self.mirror.contains(&session_id) {
                    debug!(%session_id, "ignoring selection of unknown session");
                    return Vec::new();
                }
                self.selected = Some(session_id);
                self.mobile_show_detail = true;
                self.reconcile()
            }
            Msg::BackToList => {
                self.mobile_show_detail = false;
                Vec::new()
            }
            Msg::SelectTab(tab) => self.select_tab(tab),
            Msg::ToggleCreateForm(group_path) => {
                if !self.open_create_forms.remove(&group_path) {
                    self.open_create_forms.insert(group_path);
                }
                self.rebuild_sidebar();
                Vec::new()
            }
            Msg::SubmitCreate { group_path, draft } => {
                match create_form::build_request(
                    &group_path,
                    self.mirror.group(&group_path),
                    &draft,
                ) {
                    Ok(req) => vec![Command::Mutate(Mutation::Create(req))],
                    Err(e) => {
                        self.set_flash(FlashLevel::Error, e.to_string());
                        Vec::new()
                    }
                }
            }
            Msg::Stop(session_id) => {
                let mut commands = Vec::new();
                self.stopping.insert(session_id.clone());
                self.release(&session_id, &mut commands);
                if self.rendered.as_deref() == Some(session_id.as_str()) {
                    commands.extend(self.patch_detail());
                }
                commands.push(Command::Mutate(Mutation::Stop { session_id }));
                commands
            }
            Msg::Restart(session_id) => {
                self.stopping.remove(&session_id);
                vec![Command::Mutate(Mutation::Restart { session_id })]
            }
            Msg::Delete(session_id) => {
                let mut commands = Vec::new();
                self.release(&session_id, &mut commands);
                if self.selected.as_deref() == Some(session_id.as_str()) {
                    self.selected = None;
                    self.rendered = None;
                    self.detail = None;
                    self.mobile_show_detail = false;
                    self.rebuild_sidebar();
                }
                commands.push(Command::Mutate(Mutation::Delete { session_id }));
                commands
            }
            Msg::SaveNotes => {
                let Some(detail) = self.detail.as_ref() else {
                    return Vec::new();
                };
                let TabContent::Notes(editor) = &detail.content else {
                    return Vec::new();
                };
                vec![Command::SaveNotes {
                    session_id: detail.session_id.clone(),
                    notes: editor.text().to_string(),
                }]
            }
            Msg::RefreshGit => {
                let Some(detail) = self.detail.as_mut() else {
                    return Vec::new();
                };
                match &mut detail.content {
                    TabContent::Git(panel) if panel.available => {
                        panel.begin_refresh();
                        vec![Command::FetchGit {
                            session_id: detail.session_id.clone(),
                        }]
                    }
                    _ => Vec::new(),
                }
            }
            Msg::ScrollTerminal(direction) => {
                let live = self
                    .detail
                    .as_ref()
                    .is_some_and(|d| matches!(d.content, TabContent::Terminal(ref p) if p.is_live()));
                if live && let Some(handle) = self.terminal_handle_mut() {
                    handle.dispatch_scroll(direction);
                }
                Vec::new()
            }
            Msg::DismissFlash => {
                self.flash = None;
                Vec::new()
            }
            Msg::Logout => {
                let teardown = self.resources.session_ids();
                for id in &teardown {
                    self.resources.release(id);
                }
                self.stopping.clear();
                self.selected = None;
                self.rendered = None;
                self.detail = None;
                vec![Command::Logout { teardown }]
            }

            Msg::MutationDone { mutation, result } => {
                match result {
                    Ok(()) => {
                        if let Mutation::Create(req) = &mutation {
                            self.open_create_forms.remove(&req.group_path);
                            self.rebuild_sidebar();
                        }
                    }
                    Err(e) => {
                        if let Mutation::Stop { session_id } = &mutation {
                            self.stopping.remove(session_id);
                        }
                        let message = mutation.failure_message(&e);
                        warn!("{message}");
                        self.set_flash(FlashLevel::Error, message);
                    }
                }
                vec![self.request_snapshot()]
            }
            Msg::NotesSaved {
                session_id,
                notes,
                result,
            } => match result {
                Ok(()) => {
                    if self.detail.as_ref().map(|d| d.session_id.as_str())
                        == Some(session_id.as_str())
                        && let Some(editor) = self.notes_editor_mut()
                    {
                        editor.mark_saved(&notes);
                    }
                    self.set_flash(FlashLevel::Info, "Notes saved".to_string());
                    vec![self.request_snapshot()]
                }
                Err(e) => {
                    warn!(%session_id, "failed to save notes: {e}");
                    Vec::new()
                }
            },
            Msg::GitLoaded { session_id, part } => {
                match self.detail.as_mut() {
                    Some(DetailPanel {
                        session_id: shown,
                        content: TabContent::Git(panel),
                        ..
                    }) if *shown == session_id => panel.apply(part),
                    _ => debug!(%session_id, "dropping git result for hidden panel"),
                }
                Vec::new()
            }
            Msg::ActivityLoaded { session_id, result } => {
                let limit = self.activity_limit;
                match self.detail.as_mut() {
                    Some(DetailPanel {
                        session_id: shown,
                        content: TabContent::Activity(panel),
                        ..
                    }) if *shown == session_id => match result {
                        Ok(events) => panel.apply(&events, limit),
                        Err(e) => {
                            debug!(%session_id, "activity fetch failed: {e}");
                            panel.fail();
                        }
                    },
                    _ => debug!(%session_id, "dropping activity result for hidden panel"),
                }
                Vec::new()
            }
        }
    }

    fn apply_push(&mut self, event: PushEvent) -> Vec<Command> {
        match event {
            PushEvent::Resync => vec![self.request_snapshot()],
            PushEvent::StatusChanged { session_id, status } => {
                match self.mirror.apply_status(&session_id, status) {
                    StatusPatch::Patched => self.reconcile(),
                    StatusPatch::Miss => {
                        debug!(%session_id, "status for unknown session, refetching");
                        vec![self.request_snapshot()]
                    }
                }
            }
            PushEvent::Unrecognized(kind) => {
                debug!(%kind, "unrecognized push event, refetching");
                vec![self.request_snapshot()]
            }
        }
    }

    fn select_tab(&mut self, tab: DetailTab) -> Vec<Command> {
        let Some(detail) = self.detail.as_ref() else {
            return Vec::new();
        };
        if !detail.tabs.contains(&tab) {
            return Vec::new();
        }
        self.tab_state.insert(detail.session_id.clone(), tab);
        self.rebuild_detail()
    }

    pub(crate) fn request_snapshot(&mut self) -> Command {
        self.snapshot_seq += 1;
        Command::FetchSnapshot {
            token: self.snapshot_seq,
        }
    }

    /// Drop the cache entry and schedule remote teardown if one was live.
    pub(crate) fn release(&mut self, session_id: &str, commands: &mut Vec<Command>) {
        if self.resources.release(session_id).is_some() {
            commands.push(Command::teardown(session_id));
        }
    }

    fn set_flash(&mut self, level: FlashLevel, message: String) {
        self.flash = Some(Flash { level, message });
    }

    /// The session as its terminal pane sees it: a Stop in flight counts as
    /// stopped.
    pub(crate) fn terminal_view(&self, session: &Session) -> Session {
        let mut session = session.clone();
        if self.stopping.contains(&session.id) && !session.status.is_terminal() {
            session.status = SessionStatus::Stopped;
        }
        session
    }

    /// Whether the terminal pane no longer matches its session.
    pub(crate) fn terminal_pane_stale(&self, pane: &TerminalPane, session: &Session) -> bool {
        match pane {
            TerminalPane::Live { .. } => {
                !TerminalPane::wants_live(session) || !self.resources.contains(&session.id)
            }
            TerminalPane::Inactive(status) => {
                TerminalPane::wants_live(session) || *status != session.status
            }
            TerminalPane::NoTarget => session.tmux_session,
        }
    }
}
