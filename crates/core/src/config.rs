//! Shared dashboard configuration types.
//!
//! The CLI reads and writes `config.toml` using these types; the TUI and the
//! engine only consume them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration (persisted as `config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_server_url")]
    pub url: String,
    /// Accept self-signed certificates (the server can generate its own).
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            accept_invalid_certs: false,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSettings {
    #[serde(default = "default_usage_poll")]
    pub usage_poll_secs: u64,
    #[serde(default = "default_reconnect_floor")]
    pub reconnect_floor_ms: u64,
    #[serde(default = "default_reconnect_ceiling")]
    pub reconnect_ceiling_ms: u64,
    /// Most recent activity entries shown per session.
    #[serde(default = "default_activity_limit")]
    pub activity_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            usage_poll_secs: default_usage_poll(),
            reconnect_floor_ms: default_reconnect_floor(),
            reconnect_ceiling_ms: default_reconnect_ceiling(),
            activity_limit: default_activity_limit(),
        }
    }
}

impl DashboardSettings {
    pub fn usage_poll_interval(&self) -> Duration {
        Duration::from_secs(self.usage_poll_secs.max(1))
    }

    /// Never below 100ms; a zero floor would never grow.
    pub fn reconnect_floor(&self) -> Duration {
        Duration::from_millis(self.reconnect_floor_ms.max(MIN_RECONNECT_FLOOR_MS))
    }

    pub fn reconnect_ceiling(&self) -> Duration {
        Duration::from_millis(self.reconnect_ceiling_ms)
    }
}

const MIN_RECONNECT_FLOOR_MS: u64 = 100;

// ── Serde default functions ─────────────────────────────────────────────

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_request_timeout() -> u64 {
    15
}
fn default_usage_poll() -> u64 {
    300
}
fn default_reconnect_floor() -> u64 {
    1_000
}
fn default_reconnect_ceiling() -> u64 {
    30_000
}
fn default_activity_limit() -> usize {
    20
}
