use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use workdeck_api_client::{ApiClient, ApiError, EventStream, ReconnectBackoff, StreamSignal};
use workdeck_core::tabs::GitPart;
use workdeck_core::{Command, Msg, Mutation};

/// Runs engine commands on the tokio runtime and feeds results back into the
/// single message queue.
#[derive(Clone)]
pub struct Executor {
    client: Arc<ApiClient>,
    tx: UnboundedSender<Msg>,
    handle: tokio::runtime::Handle,
}

impl Executor {
    pub fn new(
        client: Arc<ApiClient>,
        tx: UnboundedSender<Msg>,
        handle: tokio::runtime::Handle,
    ) -> Self {
        Self { client, tx, handle }
    }

    pub fn spawn_all(&self, commands: Vec<Command>) {
        for cmd in commands {
            let client = self.client.clone();
            let tx = self.tx.clone();
            self.handle.spawn(async move {
                execute(cmd, &client, &tx).await;
            });
        }
    }

    /// Attach the push channel; signals arrive as messages in order.
    pub fn spawn_push_channel(&self, backoff: ReconnectBackoff) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            EventStream::new(client, backoff)
                .run(move |signal| tx.send(signal_to_msg(signal)).is_ok())
                .await;
        });
    }

    /// Ask for a usage refresh every `period`.
    pub fn spawn_usage_poll(&self, period: std::time::Duration) {
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick fires immediately; boot already fetched usage.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(Msg::UsagePoll).is_err() {
                    break;
                }
            }
        });
    }
}

fn signal_to_msg(signal: StreamSignal) -> Msg {
    match signal {
        StreamSignal::Opened => Msg::PushChannelOpened,
        StreamSignal::Event(event) => Msg::Push(event),
        StreamSignal::Disconnected { retry_in } => Msg::PushChannelLost { retry_in },
        StreamSignal::Unauthenticated => Msg::Unauthenticated,
    }
}

fn send(tx: &UnboundedSender<Msg>, msg: Msg) {
    if tx.send(msg).is_err() {
        debug!("dashboard gone, dropping result");
    }
}

/// Passive fetches fail silently; only lost credentials are reported.
fn passive_failure(tx: &UnboundedSender<Msg>, what: &str, err: &ApiError) {
    if err.is_unauthenticated() {
        send(tx, Msg::Unauthenticated);
    } else {
        warn!("{what} fetch failed: {err}");
    }
}

/// Map a result to the message payload form, reporting lost credentials.
fn summarize<T>(tx: &UnboundedSender<Msg>, result: Result<T, ApiError>) -> Result<T, String> {
    result.map_err(|e| {
        if e.is_unauthenticated() {
            send(tx, Msg::Unauthenticated);
        }
        e.summary()
    })
}

pub async fn execute(cmd: Command, client: &ApiClient, tx: &UnboundedSender<Msg>) {
    match cmd {
        // ── Server state ──────────────────────────────────────────────
        Command::FetchSnapshot { token } => match client.sessions().await {
            Ok(snapshot) => send(tx, Msg::SnapshotLoaded { token, snapshot }),
            Err(e) => passive_failure(tx, "snapshot", &e),
        },
        Command::FetchUsage => match client.usage().await {
            Ok(usage) => send(tx, Msg::UsageLoaded(usage)),
            Err(e) => passive_failure(tx, "usage", &e),
        },

        // ── Resources ─────────────────────────────────────────────────
        Command::TeardownTerminal { session_id } => {
            if let Err(e) = client.kill_terminal(&session_id).await {
                debug!(%session_id, "terminal teardown failed: {e}");
            }
        }

        // ── Mutations ─────────────────────────────────────────────────
        Command::Mutate(mutation) => {
            let result = match &mutation {
                Mutation::Create(req) => client.create_session(req).await,
                Mutation::Stop { session_id } => client.stop_session(session_id).await,
                Mutation::Restart { session_id } => client.restart_session(session_id).await,
                Mutation::Delete { session_id } => client.delete_session(session_id).await,
            };
            let result = summarize(tx, result);
            send(tx, Msg::MutationDone { mutation, result });
        }
        Command::SaveNotes { session_id, notes } => {
            let result = summarize(tx, client.save_notes(&session_id, &notes).await);
            send(
                tx,
                Msg::NotesSaved {
                    session_id,
                    notes,
                    result,
                },
            );
        }

        // ── Tabs ──────────────────────────────────────────────────────
        Command::FetchGit { session_id } => {
            let id = session_id.as_str();
            let status = async {
                let result = client.git_status_text(id).await.map(|r| r.output);
                GitPart::Status(summarize(tx, result))
            };
            let diff = async {
                let result = client.git_diff_text(id).await.map(|r| r.output);
                GitPart::Diff(summarize(tx, result))
            };
            let pr = async {
                let result = client.pr_url(id).await.map(|r| r.url);
                GitPart::PullRequest(summarize(tx, result).ok())
            };
            let deliver = |part: GitPart| {
                send(
                    tx,
                    Msg::GitLoaded {
                        session_id: session_id.clone(),
                        part,
                    },
                )
            };
            // Each part renders as soon as it resolves.
            tokio::join!(
                async { deliver(status.await) },
                async { deliver(diff.await) },
                async { deliver(pr.await) },
            );
        }
        Command::FetchActivity { session_id } => {
            let result = summarize(
                tx,
                client.session_events(&session_id).await.map(|r| r.events),
            );
            send(tx, Msg::ActivityLoaded { session_id, result });
        }

        Command::Logout { teardown } => {
            for session_id in teardown {
                if let Err(e) = client.kill_terminal(&session_id).await {
                    debug!(%session_id, "terminal teardown failed: {e}");
                }
            }
            client.logout().await;
            send(tx, Msg::Unauthenticated);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use workdeck_api::{PushEvent, SessionStatus};
    use workdeck_api_client::{ClientOptions, MemoryCredentials, Tokens};

    use super::*;

    /// Client pointed at a port nothing listens on.
    fn offline_client(tokens: Tokens) -> ApiClient {
        ApiClient::new(
            "http://127.0.0.1:9",
            &ClientOptions::default(),
            Arc::new(MemoryCredentials::new(tokens)),
        )
        .expect("client")
    }

    fn signed_in() -> Tokens {
        Tokens {
            access: Some("a".into()),
            refresh: Some("r".into()),
        }
    }

    #[test]
    fn stream_signals_map_to_messages() {
        assert_eq!(signal_to_msg(StreamSignal::Opened), Msg::PushChannelOpened);
        assert_eq!(
            signal_to_msg(StreamSignal::Disconnected {
                retry_in: Duration::from_secs(2)
            }),
            Msg::PushChannelLost {
                retry_in: Duration::from_secs(2)
            }
        );
        let event = PushEvent::StatusChanged {
            session_id: "s1".into(),
            status: SessionStatus::Error,
        };
        assert_eq!(
            signal_to_msg(StreamSignal::Event(event.clone())),
            Msg::Push(event)
        );
    }

    #[tokio::test]
    async fn missing_credentials_report_unauthenticated() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        execute(
            Command::FetchSnapshot { token: 1 },
            &offline_client(Tokens::default()),
            &tx,
        )
        .await;
        assert_eq!(rx.try_recv().ok(), Some(Msg::Unauthenticated));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn passive_fetch_failure_sends_nothing() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        execute(Command::FetchUsage, &offline_client(signed_in()), &tx).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn failed_mutation_reports_summary() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mutation = Mutation::Stop {
            session_id: "s1".into(),
        };
        execute(
            Command::Mutate(mutation.clone()),
            &offline_client(signed_in()),
            &tx,
        )
        .await;

        let Some(Msg::MutationDone {
            mutation: done,
            result: Err(message),
        }) = rx.try_recv().ok()
        else {
            panic!("expected failed mutation");
        };
        assert_eq!(done, mutation);
        assert!(message.contains("request failed"), "{message}");
    }

    #[tokio::test]
    async fn teardown_failures_are_swallowed() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Msg>();
        execute(
            Command::TeardownTerminal {
                session_id: "s1".into(),
            },
            &offline_client(signed_in()),
            &tx,
        )
        .await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn git_parts_arrive_individually() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        execute(
            Command::FetchGit {
                session_id: "s1".into(),
            },
            &offline_client(signed_in()),
            &tx,
        )
        .await;

        let mut parts = Vec::new();
        while let Ok(Msg::GitLoaded { session_id, part }) = rx.try_recv() {
            assert_eq!(session_id, "s1");
            parts.push(part);
        }
        assert_eq!(parts.len(), 3);
        assert!(parts.contains(&GitPart::PullRequest(None)));
    }

    #[tokio::test]
    async fn logout_clears_credentials_and_signs_out() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let client = offline_client(signed_in());
        execute(
            Command::Logout {
                teardown: vec!["s1".into()],
            },
            &client,
            &tx,
        )
        .await;
        assert_eq!(client.credentials().access_token(), None);
        assert_eq!(rx.try_recv().ok(), Some(Msg::Unauthenticated));
    }
}
