//! Push channel client.
//!
//! `connecting → open → (message)* → (error → reauth → backoff-wait → connecting)`.
//! Events are emitted strictly in arrival order. The loop ends when the
//! credentials cannot be refreshed or when the consumer stops listening.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use reqwest::header::ACCEPT;
use tracing::{debug, info, warn};
use workdeck_api::PushEvent;

use crate::backoff::ReconnectBackoff;
use crate::client::ApiClient;
use crate::error::{ApiError, Result};

/// What the push channel reports to its consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    Opened,
    Event(PushEvent),
    /// Transport failed; a reconnect is scheduled after `retry_in`.
    Disconnected { retry_in: Duration },
    /// Credentials could not be refreshed; the loop has stopped.
    Unauthenticated,
}

/// Incremental decoder for `text/event-stream` bodies.
///
/// Only `data:` fields matter here; comments (keepalives) and other fields
/// are skipped. A blank line ends an event.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
}

impl SseDecoder {
    /// Feed a chunk; returns the data payloads of every completed event.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut completed = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
            line.pop();
            if matches!(line.last(), Some(b'\r')) {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if line.is_empty() {
                if !self.data.is_empty() {
                    completed.push(self.data.join("\n"));
                    self.data.clear();
                }
                continue;
            }
            if line.starts_with(':') {
                continue;
            }
            if let Some(payload) = line.strip_prefix("data:") {
                let payload = payload.strip_prefix(' ').unwrap_or(payload);
                self.data.push(payload.to_string());
            }
        }
        completed
    }
}

enum PumpOutcome {
    /// The connection ended or failed; go through reauth + backoff.
    Dropped,
    /// The consumer went away.
    Stop,
}

/// Push channel client owning its reconnect backoff.
pub struct EventStream {
    client: Arc<ApiClient>,
    backoff: ReconnectBackoff,
}

impl EventStream {
    pub fn new(client: Arc<ApiClient>, backoff: ReconnectBackoff) -> Self {
        Self { client, backoff }
    }

    /// Run until credentials are irrecoverable or `emit` returns `false`.
    pub async fn run<F>(mut self, mut emit: F)
    where
        F: FnMut(StreamSignal) -> bool + Send,
    {
        loop {
            let Some(token) = self.client.credentials().access_token() else {
                emit(StreamSignal::Unauthenticated);
                return;
            };

            match self.connect(&token).await {
                Ok(response) => {
                    info!("push channel open");
                    self.backoff.reset();
                    if !emit(StreamSignal::Opened) {
                        return;
                    }
                    if let PumpOutcome::Stop = pump(response, &mut emit).await {
                        return;
                    }
                }
                Err(e) => warn!("push channel connect failed: {e}"),
            }

            match self.client.refresh().await {
                Ok(()) => {}
                Err(ApiError::Unauthenticated) => {
                    emit(StreamSignal::Unauthenticated);
                    return;
                }
                // Server unreachable is not a credential problem; keep trying.
                Err(e) => warn!("credential refresh failed before reconnect: {e}"),
            }

            let retry_in = self.backoff.next_delay();
            warn!("push channel reconnecting in {}ms", retry_in.as_millis());
            if !emit(StreamSignal::Disconnected { retry_in }) {
                return;
            }
            tokio::time::sleep(retry_in).await;
        }
    }

    async fn connect(&self, token: &str) -> Result<reqwest::Response> {
        let resp = self
            .client
            .stream_client()
            .get(self.client.events_url(token))
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }
        Ok(resp)
    }
}

async fn pump<F>(response: reqwest::Response, emit: &mut F) -> PumpOutcome
where
    F: FnMut(StreamSignal) -> bool + Send,
{
    let mut decoder = SseDecoder::default();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                debug!("push channel read failed: {e}");
                return PumpOutcome::Dropped;
            }
        };
        for data in decoder.push(&chunk) {
            if !emit(StreamSignal::Event(PushEvent::parse(&data))) {
                return PumpOutcome::Stop;
            }
        }
    }
    debug!("push channel closed by server");
    PumpOutcome::Dropped
}

#[cfg(test)]
mod tests {
    use super::SseDecoder;

    #[test]
    fn decodes_events_split_across_chunks() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b"data: {\"type\":\"snap").is_empty());
        let events = decoder.push(b"shot\"}\n\ndata: {\"type\":\"refresh\"}\n\n");
        assert_eq!(
            events,
            vec![
                r#"{"type":"snapshot"}"#.to_string(),
                r#"{"type":"refresh"}"#.to_string()
            ]
        );
    }

    #[test]
    fn skips_keepalive_comments_and_handles_crlf() {
        let mut decoder = SseDecoder::default();
        let events = decoder.push(b": keepalive\r\n\r\ndata:{\"type\":\"refresh\"}\r\n\r\n");
        assert_eq!(events, vec![r#"{"type":"refresh"}"#.to_string()]);
    }

    #[test]
    fn joins_multiline_data() {
        let mut decoder = SseDecoder::default();
        let events = decoder.push(b"event: message\ndata: a\ndata: b\n\n");
        assert_eq!(events, vec!["a\nb".to_string()]);
    }
}
