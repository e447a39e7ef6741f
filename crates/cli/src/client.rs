use anyhow::{Context, Result, bail};
use std::path::Path;
use std::sync::Arc;
use workdeck_api_client::{ApiClient, ApiError, ClientOptions, PersistentCredentials};
use workdeck_core::DashboardConfig;

use crate::config::refresh_token_path;

/// Build a client whose refresh credential is persisted under `dir`.
pub fn connect(dir: &Path, config: &DashboardConfig) -> Result<ApiClient> {
    let path = refresh_token_path(dir);
    let credentials = PersistentCredentials::open(&path)
        .with_context(|| format!("Failed to read credentials at {}", path.display()))?;
    let options = ClientOptions {
        timeout: config.server.request_timeout(),
        accept_invalid_certs: config.server.accept_invalid_certs,
    };
    ApiClient::new(&config.server.url, &options, Arc::new(credentials))
        .context("Failed to build HTTP client")
}

/// Mint an access credential from the stored refresh credential.
pub async fn ensure_access(client: &ApiClient) -> Result<()> {
    if client.credentials().access_token().is_some() {
        return Ok(());
    }
    match client.refresh().await {
        Ok(()) => Ok(()),
        Err(ApiError::Unauthenticated) => bail!("not signed in; run `workdeck login` first"),
        Err(e) => Err(e).context("Failed to reach server"),
    }
}
