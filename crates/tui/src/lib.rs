//! Terminal frontend for the workdeck dashboard engine.

mod app;
mod async_ops;
mod bridge;
mod theme;
mod ui;
mod views;

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use app::App;
use async_ops::Executor;
use crossterm::{
    ExecutableCommand,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::info;
use workdeck_api_client::{ApiClient, ApiError, ReconnectBackoff};
use workdeck_core::{Dashboard, DashboardConfig, Msg};

pub use bridge::{ClientBridge, open_in_browser};

/// Why the dashboard loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    /// Credentials were lost or the user logged out.
    SignedOut,
}

/// Launch the dashboard against `client`'s server.
pub fn run(config: &DashboardConfig, client: ApiClient) -> Result<Exit> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let client = Arc::new(client);

    // ── Mint an access credential before showing anything ──────────
    if client.credentials().access_token().is_none() {
        match runtime.block_on(client.refresh()) {
            Ok(()) => {}
            Err(ApiError::Unauthenticated) => {
                bail!("not signed in; run `workdeck login` first")
            }
            Err(e) => return Err(e).context("failed to reach server"),
        }
    }

    let mouse_capture_enabled = env_flag_enabled("WORKDECK_MOUSE_CAPTURE");
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    if mouse_capture_enabled {
        stdout().execute(EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let executor = Executor::new(client.clone(), tx, runtime.handle().clone());
    let dashboard = Dashboard::new(
        Box::new(ClientBridge::new(client.clone())),
        config.dashboard.activity_limit,
    );
    let mut app = App::new(dashboard, client.base_url());

    executor.spawn_all(app.dashboard.boot());
    executor.spawn_push_channel(ReconnectBackoff::new(
        config.dashboard.reconnect_floor(),
        config.dashboard.reconnect_ceiling(),
    ));
    executor.spawn_usage_poll(config.dashboard.usage_poll_interval());

    // Main loop
    let result = event_loop(&mut terminal, &mut app, &executor, rx, mouse_capture_enabled);

    // Restore terminal
    disable_raw_mode()?;
    if mouse_capture_enabled {
        stdout().execute(DisableMouseCapture)?;
    }
    stdout().execute(LeaveAlternateScreen)?;

    // Outstanding tasks (push channel, polls) are cancelled here.
    runtime.shutdown_timeout(Duration::from_millis(200));
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    executor: &Executor,
    mut rx: mpsc::UnboundedReceiver<Msg>,
    mouse_capture_enabled: bool,
) -> Result<Exit> {
    loop {
        // ── Apply async results before drawing ──────────────────────
        while let Ok(msg) = rx.try_recv() {
            let commands = app.dispatch(msg);
            executor.spawn_all(commands);
        }

        if app.dashboard.is_signed_out() {
            info!("signed out, leaving dashboard");
            return Ok(Exit::SignedOut);
        }
        if app.should_quit {
            return Ok(Exit::Quit);
        }

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            let msgs = match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    app.handle_key(key)
                }
                Event::Mouse(mouse) if mouse_capture_enabled => app.handle_mouse(mouse),
                _ => Vec::new(),
            };
            for msg in msgs {
                let commands = app.dispatch(msg);
                executor.spawn_all(commands);
            }
        }
    }
}

fn env_flag_enabled(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
        })
        .unwrap_or(false)
}
