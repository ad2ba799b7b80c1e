//! Server-Sent Events sessions
//!
//! A `GET /sse` connection opens a session. Responses to `POST /sse` requests
//! naming that session are also pushed down its stream as `message` events.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::types::JsonRpcResponse;

/// Messages buffered per session before pushes are dropped
const SESSION_BUFFER: usize = 64;

/// Live SSE sessions, keyed by session id
#[derive(Default)]
pub struct SseSessions {
    sessions: RwLock<HashMap<Uuid, mpsc::Sender<JsonRpcResponse>>>,
}

impl SseSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return its id and message receiver
    pub async fn open(&self) -> (Uuid, mpsc::Receiver<JsonRpcResponse>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(SESSION_BUFFER);
        self.sessions.write().await.insert(id, tx);
        tracing::debug!(session_id = %id, "SSE session opened");
        (id, rx)
    }

    pub async fn close(&self, id: &Uuid) {
        if self.sessions.write().await.remove(id).is_some() {
            tracing::debug!(session_id = %id, "SSE session closed");
        }
    }

    /// Push a response to a session. Returns false if the session is gone.
    pub async fn push(&self, id: &Uuid, response: JsonRpcResponse) -> bool {
        let sender = self.sessions.read().await.get(id).cloned();
        match sender {
            Some(sender) => match sender.try_send(response) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(session_id = %id, "SSE session buffer full, dropping message");
                    false
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    self.close(id).await;
                    false
                }
            },
            None => false,
        }
    }

    pub async fn contains(&self, id: &Uuid) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Removes the session once its stream is dropped (peer disconnected)
struct SessionGuard {
    sessions: Arc<SseSessions>,
    id: Uuid,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let sessions = self.sessions.clone();
        let id = self.id;
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move { sessions.close(&id).await });
        }
    }
}

/// Open a session and build its event stream.
///
/// The first event is `endpoint`, whose data is the URL to POST requests to.
pub async fn session_stream(
    sessions: Arc<SseSessions>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (id, mut rx) = sessions.open().await;
    let guard = SessionGuard { sessions, id };

    let stream = async_stream::stream! {
        let _guard = guard;
        yield Ok(Event::default()
            .event("endpoint")
            .data(format!("/sse?sessionId={}", id)));

        while let Some(response) = rx.recv().await {
            match serde_json::to_string(&response) {
                Ok(text) => yield Ok(Event::default().event("message").data(text)),
                Err(e) => tracing::warn!(session_id = %id, error = %e, "Failed to encode SSE message"),
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
