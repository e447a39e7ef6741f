use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, info, warn};

use workdeck_api::*;

use crate::credentials::CredentialStore;
use crate::error::{ApiError, Result};

/// Transport settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    /// Accept self-signed server certificates.
    pub accept_invalid_certs: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            accept_invalid_certs: false,
        }
    }
}

/// Authenticated HTTP client for the workdeck server.
///
/// Every authenticated call goes through [`ApiClient::send`], which attaches
/// the access credential, and on a 401 refreshes once and retries once. A
/// second 401 is returned to the caller as-is.
pub struct ApiClient {
    client: reqwest::Client,
    /// Push-channel client: no overall request timeout, the stream is
    /// expected to stay open indefinitely.
    stream_client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
    refresh_guard: tokio::sync::Mutex<()>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        options: &ClientOptions,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()?;
        let stream_client = reqwest::Client::builder()
            .connect_timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()?;
        Ok(Self {
            client,
            stream_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            refresh_guard: tokio::sync::Mutex::new(()),
        })
    }

    /// Create from an existing `reqwest::Client` (e.g. shared in tests).
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            stream_client: client.clone(),
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            refresh_guard: tokio::sync::Mutex::new(()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    pub(crate) fn stream_client(&self) -> &reqwest::Client {
        &self.stream_client
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn session_url(&self, id: &str, rest: &str) -> String {
        self.url(&format!("/sessions/{}{rest}", urlencoding::encode(id)))
    }

    /// URL of the embedded terminal view for a session. The embedded view
    /// cannot carry headers, so the access credential rides in the query.
    pub fn terminal_url(&self, id: &str) -> String {
        let base = format!("{}/terminal/{}/", self.base_url, urlencoding::encode(id));
        match self.credentials.access_token() {
            Some(token) => format!("{base}?token={}", urlencoding::encode(&token)),
            None => base,
        }
    }

    /// URL of the push channel for the given access credential.
    pub fn events_url(&self, token: &str) -> String {
        format!("{}/events?token={}", self.base_url, urlencoding::encode(token))
    }

    // ── Gateway ───────────────────────────────────────────────────────────

    /// Send an authenticated request.
    ///
    /// `build` receives a fresh builder for the method and URL and may add
    /// headers or a body; it runs again for the retry so nothing the caller
    /// set is lost. Without an access credential the call is never issued.
    pub async fn send<F>(&self, method: Method, url: &str, build: F) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let Some(token) = self.credentials.access_token() else {
            return Err(ApiError::Unauthenticated);
        };

        let resp = build(self.client.request(method.clone(), url))
            .bearer_auth(&token)
            .send()
            .await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return Ok(resp);
        }

        debug!("{method} {url} returned 401, refreshing credentials");
        let token = self.refresh_after_rejection(&token).await?;
        let retried = build(self.client.request(method, url))
            .bearer_auth(&token)
            .send()
            .await?;
        Ok(retried)
    }

    async fn get(&self, url: &str) -> Result<Response> {
        self.send(Method::GET, url, |req| req).await
    }

    async fn post(&self, url: &str) -> Result<Response> {
        self.send(Method::POST, url, |req| req).await
    }

    async fn post_json<T: serde::Serialize>(&self, url: &str, body: &T) -> Result<Response> {
        self.send(Method::POST, url, |req| req.json(body)).await
    }

    async fn delete(&self, url: &str) -> Result<Response> {
        self.send(Method::DELETE, url, |req| req).await
    }

    // ── Auth ──────────────────────────────────────────────────────────────

    /// Exchange username and password for a credential pair and store it.
    pub async fn login(&self, req: &LoginRequest) -> Result<()> {
        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(req)
            .send()
            .await?;
        let tokens: TokenPair = parse_response(resp).await?;
        self.credentials
            .set_tokens(&tokens.access_token, &tokens.refresh_token)?;
        info!("logged in as {}", req.username);
        Ok(())
    }

    /// Exchange the refresh credential for a new pair.
    ///
    /// A rejected refresh clears both credentials and yields
    /// [`ApiError::Unauthenticated`]. A transport failure leaves them alone.
    pub async fn refresh(&self) -> Result<()> {
        let _guard = self.refresh_guard.lock().await;
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> Result<()> {
        let Some(refresh_token) = self.credentials.refresh_token() else {
            self.credentials.clear();
            return Err(ApiError::Unauthenticated);
        };

        let resp = self
            .client
            .post(self.url("/auth/refresh"))
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        if !resp.status().is_success() {
            warn!("credential refresh rejected ({})", resp.status());
            self.credentials.clear();
            return Err(ApiError::Unauthenticated);
        }

        let tokens: TokenPair = match resp.json().await {
            Ok(tokens) => tokens,
            Err(e) => {
                self.credentials.clear();
                return Err(ApiError::Decode(e));
            }
        };
        self.credentials
            .set_tokens(&tokens.access_token, &tokens.refresh_token)?;
        debug!("credentials refreshed");
        Ok(())
    }

    /// Refresh after a 401 on `rejected`. Concurrent callers queue on the
    /// guard; whoever finds the access credential already rotated reuses it.
    async fn refresh_after_rejection(&self, rejected: &str) -> Result<String> {
        let _guard = self.refresh_guard.lock().await;
        if let Some(current) = self.credentials.access_token() {
            if current != rejected {
                return Ok(current);
            }
        }
        self.refresh_locked().await?;
        self.credentials
            .access_token()
            .ok_or(ApiError::Unauthenticated)
    }

    /// Revoke the refresh credential server-side (best effort) and clear
    /// local credentials unconditionally.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.credentials.refresh_token() {
            let result = self
                .client
                .post(self.url("/auth/logout"))
                .json(&LogoutRequest { refresh_token })
                .send()
                .await;
            if let Err(e) = result {
                debug!("logout request failed: {e}");
            }
        }
        self.credentials.clear();
    }

    // ── Sessions ──────────────────────────────────────────────────────────

    pub async fn sessions(&self) -> Result<SessionsResponse> {
        let resp = self.get(&self.url("/sessions")).await?;
        parse_response(resp).await
    }

    pub async fn create_session(&self, req: &CreateSessionRequest) -> Result<()> {
        let resp = self.post_json(&self.url("/sessions"), req).await?;
        expect_success(resp).await
    }

    pub async fn stop_session(&self, id: &str) -> Result<()> {
        let resp = self.post(&self.session_url(id, "/stop")).await?;
        expect_success(resp).await
    }

    pub async fn restart_session(&self, id: &str) -> Result<()> {
        let resp = self.post(&self.session_url(id, "/restart")).await?;
        expect_success(resp).await
    }

    pub async fn delete_session(&self, id: &str) -> Result<()> {
        let resp = self.delete(&self.session_url(id, "")).await?;
        expect_success(resp).await
    }

    pub async fn save_notes(&self, id: &str, notes: &str) -> Result<()> {
        let body = NotesRequest {
            notes: notes.to_string(),
        };
        let resp = self.post_json(&self.session_url(id, "/notes"), &body).await?;
        expect_success(resp).await
    }

    pub async fn session_events(&self, id: &str) -> Result<SessionEventsResponse> {
        let resp = self.get(&self.session_url(id, "/events")).await?;
        parse_response(resp).await
    }

    /// Ask the server to tear down the terminal bridge for a session.
    pub async fn kill_terminal(&self, id: &str) -> Result<()> {
        let resp = self.delete(&self.session_url(id, "/ttyd")).await?;
        expect_success(resp).await
    }

    // ── Git ───────────────────────────────────────────────────────────────

    pub async fn git_status_text(&self, id: &str) -> Result<GitTextResponse> {
        let resp = self.get(&self.session_url(id, "/git/status/text")).await?;
        parse_response(resp).await
    }

    pub async fn git_diff_text(&self, id: &str) -> Result<GitTextResponse> {
        let resp = self.get(&self.session_url(id, "/git/diff/text")).await?;
        parse_response(resp).await
    }

    pub async fn pr_url(&self, id: &str) -> Result<PrUrlResponse> {
        let resp = self.get(&self.session_url(id, "/pr-url")).await?;
        parse_response(resp).await
    }

    // ── Usage ─────────────────────────────────────────────────────────────

    pub async fn usage(&self) -> Result<UsageResponse> {
        let resp = self.get(&self.url("/usage")).await?;
        parse_response(resp).await
    }
}

/// Parse an HTTP response: return the deserialized body on 2xx,
/// or an error containing the status and body text.
async fn parse_response<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T> {
    let resp = check_status(resp).await?;
    resp.json().await.map_err(ApiError::Decode)
}

async fn expect_success(resp: Response) -> Result<()> {
    check_status(resp).await.map(|_| ())
}

async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status { status, body });
    }
    Ok(resp)
}
