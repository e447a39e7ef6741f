use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use workdeck_core::DashboardConfig;

pub const CONFIG_FILE_NAME: &str = "config.toml";
const REFRESH_TOKEN_FILE_NAME: &str = "refresh_token";
pub const LOG_FILE_NAME: &str = "workdeck.log";

/// Get the config directory path (`$WORKDECK_CONFIG_DIR` or ~/.config/workdeck/)
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("WORKDECK_CONFIG_DIR")
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("workdeck"))
}

pub fn refresh_token_path(dir: &Path) -> PathBuf {
    dir.join(REFRESH_TOKEN_FILE_NAME)
}

/// Load config from `dir`, returning defaults if the file does not exist.
pub fn load_config(dir: &Path) -> Result<DashboardConfig> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(DashboardConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config at {}", path.display()))
}

pub fn save_config(dir: &Path, config: &DashboardConfig) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create config dir at {}", dir.display()))?;
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    let path = dir.join(CONFIG_FILE_NAME);
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config at {}", path.display()))?;
    Ok(())
}

/// Print current config.
pub fn show_config(dir: &Path) -> Result<()> {
    let config = load_config(dir)?;
    println!("Config file: {}", dir.join(CONFIG_FILE_NAME).display());
    println!();
    println!("[server]");
    println!("  url                  = {}", config.server.url);
    println!("  accept_invalid_certs = {}", config.server.accept_invalid_certs);
    println!("  request_timeout_secs = {}", config.server.request_timeout_secs);
    println!();
    println!("[dashboard]");
    println!("  usage_poll_secs      = {}", config.dashboard.usage_poll_secs);
    println!("  reconnect_floor_ms   = {}", config.dashboard.reconnect_floor_ms);
    println!("  reconnect_ceiling_ms = {}", config.dashboard.reconnect_ceiling_ms);
    println!("  activity_limit       = {}", config.dashboard.activity_limit);
    println!();
    let signed_in = refresh_token_path(dir).exists();
    println!(
        "Credentials: {}",
        if signed_in { "stored" } else { "(not signed in)" }
    );
    Ok(())
}

/// Apply the provided values on top of the stored config.
pub fn update_config(
    dir: &Path,
    server_url: Option<String>,
    accept_invalid_certs: Option<bool>,
) -> Result<DashboardConfig> {
    let mut config = load_config(dir)?;
    if let Some(url) = server_url {
        config.server.url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(accept) = accept_invalid_certs {
        config.server.accept_invalid_certs = accept;
    }
    save_config(dir, &config)?;
    Ok(config)
}

/// Update config with provided values and print the result.
pub fn set_config(
    dir: &Path,
    server_url: Option<String>,
    accept_invalid_certs: Option<bool>,
) -> Result<()> {
    update_config(dir, server_url, accept_invalid_certs)?;
    println!("Configuration updated.");
    show_config(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(dir.path()).expect("load");
        assert_eq!(config.server.url, "http://localhost:8080");
        assert_eq!(config.dashboard.activity_limit, 20);
    }

    #[test]
    fn update_preserves_untouched_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("workdeck");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(
            nested.join(CONFIG_FILE_NAME),
            "[dashboard]\nusage_poll_secs = 60\n",
        )
        .expect("seed");

        let config = update_config(&nested, Some("https://deck.lan:8443/ ".to_string()), Some(true))
            .expect("update");
        assert_eq!(config.server.url, "https://deck.lan:8443");

        let reloaded = load_config(&nested).expect("reload");
        assert_eq!(reloaded.server.url, "https://deck.lan:8443");
        assert!(reloaded.server.accept_invalid_certs);
        assert_eq!(reloaded.dashboard.usage_poll_secs, 60);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[server\n").expect("seed");
        let err = load_config(dir.path()).expect_err("must fail");
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }
}
