//! WebSocket connection with state management and typed fan-out.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use stacks_shared::UpdateEnvelope;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;

use super::ReconnectPolicy;
use crate::credentials::CredentialStore;

const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Connection state for the realtime channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Connected,
    Authenticating,
    Authenticated,
}

impl ChannelState {
    pub fn is_live(&self) -> bool {
        matches!(self, ChannelState::Authenticated)
    }
}

// Returns false once its receiver is gone; dispatch prunes those.
type Subscriber = Box<dyn Fn(&UpdateEnvelope) -> bool + Send + Sync>;

/// A managed connection to the server's realtime endpoint.
///
/// `connect` is an idempotent reconnect: any existing connection is torn
/// down first. On any transport-level error — including a failed keep-alive
/// ping — the channel cancels its own tasks and marks itself
/// `Disconnected` instead of attempting in-place repair.
pub struct LiveChannel {
    url: Option<String>,
    creds: CredentialStore,
    ping_interval: Duration,
    state: Arc<Mutex<ChannelState>>,
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl LiveChannel {
    pub fn new(config: &crate::config::ApiConfig, creds: CredentialStore) -> Self {
        Self::with_url(Some(config.ws_url()), creds)
    }

    /// Explicit endpoint, or `None` for an unconfigured channel (every
    /// `connect` then no-ops with a logged error).
    pub fn with_url(url: Option<String>, creds: CredentialStore) -> Self {
        Self {
            url,
            creds,
            ping_interval: PING_INTERVAL,
            state: Arc::new(Mutex::new(ChannelState::Disconnected)),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> ChannelState {
        *self.state.lock().unwrap()
    }

    fn set_state(&self, state: ChannelState) {
        *self.state.lock().unwrap() = state;
    }

    /// Subscribe to envelopes whose payload decodes as `T`. Frames carrying
    /// other payload types are silently skipped for this subscriber; a
    /// decode failure in one subscriber never affects another. Dropping the
    /// receiver ends the subscription; it is pruned on the next frame.
    pub fn subscribe<T: DeserializeOwned + Send + 'static>(&self) -> UnboundedReceiver<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap()
            .push(Box::new(move |envelope: &UpdateEnvelope| {
                if let Some(payload) = envelope.payload::<T>() {
                    if tx.send(payload).is_err() {
                        return false;
                    }
                }
                !tx.is_closed()
            }));
        rx
    }

    /// Open the connection. Requires a session token and a configured
    /// endpoint; missing either is a logged no-op, not a crash.
    pub async fn connect(&self) {
        let Some(url) = self.url.clone() else {
            tracing::error!("realtime endpoint not configured, skipping connect");
            return;
        };
        let token = match self.creds.token() {
            Ok(Some(token)) if !token.is_empty() => token,
            _ => {
                tracing::error!("no session token, skipping realtime connect");
                return;
            }
        };

        // Idempotent reconnect: whatever is running gets torn down first.
        self.disconnect();
        self.set_state(ChannelState::Connecting);

        let mut request = match url.as_str().into_client_request() {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(error = %e, %url, "invalid realtime endpoint");
                self.set_state(ChannelState::Disconnected);
                return;
            }
        };
        let bearer = match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, "session token is not header-safe");
                self.set_state(ChannelState::Disconnected);
                return;
            }
        };
        request.headers_mut().insert(AUTHORIZATION, bearer);

        let stream = match connect_async(request).await {
            Ok((stream, _response)) => stream,
            Err(e) => {
                tracing::error!(error = %e, "realtime connect failed");
                self.set_state(ChannelState::Disconnected);
                return;
            }
        };
        self.set_state(ChannelState::Connected);
        // The credential rode the upgrade request itself; all that remains
        // before Authenticated is arming the listeners.
        self.set_state(ChannelState::Authenticating);

        let (mut write, mut read) = stream.split();
        let (close_tx, mut close_rx) = mpsc::unbounded_channel::<&'static str>();

        // The read loop is armed before anything else happens on the
        // connection, so no frame is dropped between connect and first
        // receive. Text and binary frames are both treated as UTF-8.
        let subscribers = self.subscribers.clone();
        let close_for_read = close_tx.clone();
        let read_task = tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => dispatch(&subscribers, text.as_str()),
                    Ok(Message::Binary(bytes)) => {
                        if let Ok(text) = std::str::from_utf8(&bytes) {
                            dispatch(&subscribers, text);
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "realtime read failed");
                        break;
                    }
                }
            }
            let _ = close_for_read.send("read loop ended");
        });

        let ping_interval = self.ping_interval;
        let ping_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(ping_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await; // the first tick is immediate
            loop {
                ticker.tick().await;
                if let Err(e) = write.send(Message::Ping(Vec::new().into())).await {
                    tracing::error!(error = %e, "keep-alive ping failed");
                    break;
                }
            }
            let _ = close_tx.send("keep-alive failed");
        });

        // Authenticated is set before the supervisor is armed; from here on
        // the supervisor owns the transition back to Disconnected. The close
        // channel buffers, so a read loop that already ended is not lost.
        self.set_state(ChannelState::Authenticated);

        let state = self.state.clone();
        let read_abort = read_task.abort_handle();
        let ping_abort = ping_task.abort_handle();
        let supervisor = tokio::spawn(async move {
            let reason = close_rx.recv().await.unwrap_or("channel dropped");
            read_abort.abort();
            ping_abort.abort();
            *state.lock().unwrap() = ChannelState::Disconnected;
            tracing::info!(reason, "realtime channel closed");
        });

        *self.tasks.lock().unwrap() = vec![
            read_task.abort_handle(),
            ping_task.abort_handle(),
            supervisor.abort_handle(),
        ];
        tracing::info!(%url, "realtime channel connected");
    }

    /// Cancel the keep-alive, cancel the transport, clear auth state.
    /// Fully idempotent.
    pub fn disconnect(&self) {
        for handle in self.tasks.lock().unwrap().drain(..) {
            handle.abort();
        }
        self.set_state(ChannelState::Disconnected);
    }

    /// Caller-driven reconnect loop: try until authenticated or the policy's
    /// attempt budget runs out.
    pub async fn reconnect_with(&self, policy: &ReconnectPolicy) {
        let mut attempt = 0u32;
        loop {
            self.connect().await;
            if self.state().is_live() {
                return;
            }
            if !policy.should_retry(attempt) {
                tracing::warn!(attempt, "giving up on realtime reconnect");
                return;
            }
            tokio::time::sleep(policy.delay_for_attempt(attempt)).await;
            attempt += 1;
        }
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        for handle in self.tasks.lock().unwrap().drain(..) {
            handle.abort();
        }
    }
}

/// Parse one raw frame and hand it to every subscriber, pruning
/// subscriptions whose receiver has gone away. Non-envelope frames are
/// skipped.
fn dispatch(subscribers: &Mutex<Vec<Subscriber>>, text: &str) {
    let Some(envelope) = UpdateEnvelope::parse(text) else {
        tracing::debug!("skipping non-envelope frame");
        return;
    };
    subscribers
        .lock()
        .unwrap()
        .retain(|subscriber| subscriber(&envelope));
}
