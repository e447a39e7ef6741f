use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use workdeck_api_client::ApiClient;
use workdeck_core::{TerminalBridge, TerminalHandle};

/// Terminal handles pointing at the server's embedded terminal endpoint.
pub struct ClientBridge {
    client: Arc<ApiClient>,
}

impl ClientBridge {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl TerminalBridge for ClientBridge {
    fn open(&self, session_id: &str) -> TerminalHandle {
        TerminalHandle::new(session_id, self.client.terminal_url(session_id))
    }
}

struct OpenCommand {
    program: PathBuf,
    prefix_args: Vec<OsString>,
}

fn open_command_for_os(target_os: &str) -> Result<OpenCommand> {
    match target_os {
        "macos" => Ok(OpenCommand {
            program: PathBuf::from("open"),
            prefix_args: Vec::new(),
        }),
        "linux" | "freebsd" | "openbsd" => Ok(OpenCommand {
            program: PathBuf::from("xdg-open"),
            prefix_args: Vec::new(),
        }),
        "windows" => Ok(OpenCommand {
            program: PathBuf::from("cmd"),
            prefix_args: vec![
                OsString::from("/C"),
                OsString::from("start"),
                OsString::from(""),
            ],
        }),
        other => bail!("opening URLs is unsupported on `{other}`"),
    }
}

/// Hand a URL to the platform opener without waiting for it.
pub fn open_in_browser(url: &str) -> Result<()> {
    let command = open_command_for_os(std::env::consts::OS)?;
    std::process::Command::new(&command.program)
        .args(&command.prefix_args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("launch {}", command.program.display()))?;
    Ok(())
}
