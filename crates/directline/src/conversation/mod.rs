//! Streaming conversation sessions.
//!
//! A [`Conversation`] owns the WebSocket bound to one Direct Line
//! conversation. Stream operations take `&mut self`: the connection is an
//! exclusive resource, and exclusive borrows are what keep concurrent reads
//! from stealing each other's frames. Separate conversations are separate
//! values and run independently.

mod exchange;
mod upload;

use std::fmt;

use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use crate::client::DirectLineClient;
use crate::error::DirectLineError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// State of a conversation's streaming connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Open,
    /// The transport is gone. Stream operations fail with
    /// [`DirectLineError::ConnectionClosed`] until [`Conversation::reconnect`]
    /// succeeds.
    Closed,
}

enum StreamState {
    Open(WsStream),
    Closed,
}

/// One conversation bound to one streaming connection.
pub struct Conversation {
    client: DirectLineClient,
    conversation_id: String,
    user_id: String,
    stream_url: String,
    stream: StreamState,
    last_watermark: Option<String>,
}

// Stream URLs embed a conversation token; Debug leaves them out.
impl fmt::Debug for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversation")
            .field("conversation_id", &self.conversation_id)
            .field("user_id", &self.user_id)
            .field("last_watermark", &self.last_watermark)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Conversation {
    /// Open the streaming connection for a freshly created or resumed
    /// conversation. No retry; on failure the caller starts over.
    pub(crate) async fn connect(
        client: DirectLineClient,
        conversation_id: String,
        stream_url: String,
        user_id: String,
    ) -> Result<Self, DirectLineError> {
        let (stream, _response) = connect_async(stream_url.as_str())
            .await
            .map_err(|e| DirectLineError::Connect(e.to_string()))?;

        debug!(conversation = %conversation_id, "streaming connection open");

        Ok(Self {
            client,
            conversation_id,
            user_id,
            stream_url,
            stream: StreamState::Open(stream),
            last_watermark: None,
        })
    }

    /// Service-assigned conversation identifier.
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Participant identifier stamped on generated activities.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Streaming URL this session last connected to.
    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }

    /// Latest delivery cursor seen on the stream. [`reconnect`](Self::reconnect)
    /// resumes delivery from here.
    pub fn watermark(&self) -> Option<&str> {
        self.last_watermark.as_deref()
    }

    pub fn state(&self) -> ConnectionState {
        match self.stream {
            StreamState::Open(_) => ConnectionState::Open,
            StreamState::Closed => ConnectionState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Drop the streaming connection. Idempotent. This is a transport
    /// operation only; it does not end the conversation (see
    /// [`close`](Self::close)) and the REST side keeps working.
    pub async fn disconnect(&mut self) {
        if let StreamState::Open(ref mut stream) = self.stream {
            // Best effort; the peer may already be gone.
            let _ = stream.close(None).await;
            info!(conversation = %self.conversation_id, "streaming connection closed");
        }
        self.stream = StreamState::Closed;
    }

    /// Re-open the streaming channel after a disconnect or transport
    /// failure. Stream URLs are one-time, so this asks the service for a
    /// fresh endpoint, resuming delivery at the last watermark seen.
    /// Nothing calls this implicitly.
    pub async fn reconnect(&mut self) -> Result<(), DirectLineError> {
        let endpoint = self
            .client
            .reconnect_endpoint(&self.conversation_id, self.last_watermark.as_deref())
            .await?;

        if let StreamState::Open(ref mut stream) = self.stream {
            let _ = stream.close(None).await;
        }
        self.stream = StreamState::Closed;

        let (stream, _response) = connect_async(endpoint.stream_url.as_str())
            .await
            .map_err(|e| DirectLineError::Connect(e.to_string()))?;
        self.stream_url = endpoint.stream_url;
        self.stream = StreamState::Open(stream);

        info!(conversation = %self.conversation_id, "streaming connection reopened");
        Ok(())
    }

    /// Map a transport error onto the session. Any transport failure marks
    /// the stream `Closed`, clean close or not; recovery is an explicit
    /// [`reconnect`](Self::reconnect).
    fn stream_failure(&mut self, err: tungstenite::Error) -> DirectLineError {
        match err {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                self.stream = StreamState::Closed;
                DirectLineError::ConnectionClosed
            }
            other => {
                self.stream = StreamState::Closed;
                DirectLineError::Stream(other.to_string())
            }
        }
    }
}

impl fmt::Display for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Conversation ID: {}", self.conversation_id)
    }
}
