//! Activity exchange over the streaming connection.
//!
//! `send_activity` and `receive_frame` are the primitives: one outbound
//! frame, one blocking read. Everything else composes them. The stream
//! carries no correlation identifiers, so nothing here can match a reply to
//! the frame that provoked it; `post_activity` documents the consequences.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use super::{Conversation, StreamState};
use crate::activity::{Activity, ActivitySet};
use crate::error::DirectLineError;

impl Conversation {
    /// Serialize one activity and write it as a single text frame.
    pub async fn send_activity(&mut self, activity: &Activity) -> Result<(), DirectLineError> {
        let json =
            serde_json::to_string(activity).map_err(|e| DirectLineError::Parse(e.to_string()))?;

        debug!(
            conversation = %self.conversation_id,
            activity_type = %activity.activity_type,
            "sending activity"
        );

        let sent = match self.stream {
            StreamState::Open(ref mut stream) => stream.send(Message::Text(json.into())).await,
            StreamState::Closed => return Err(DirectLineError::ConnectionClosed),
        };
        sent.map_err(|e| self.stream_failure(e))
    }

    /// One blocking read: the next text frame, raw. Blocks until the
    /// service delivers one; [`receive_frame_timeout`](Self::receive_frame_timeout)
    /// is the bounded variant. Transport control frames are not deliveries
    /// and are skipped.
    pub async fn receive_frame(&mut self) -> Result<String, DirectLineError> {
        loop {
            let frame = match self.stream {
                StreamState::Open(ref mut stream) => stream.next().await,
                StreamState::Closed => return Err(DirectLineError::ConnectionClosed),
            };
            match frame {
                Some(Ok(Message::Text(text))) => return Ok(text.to_string()),
                Some(Ok(Message::Close(_))) | None => {
                    self.stream = StreamState::Closed;
                    return Err(DirectLineError::ConnectionClosed);
                }
                // Ping/pong and binary frames; tungstenite answers pings
                // itself.
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(self.stream_failure(e)),
            }
        }
    }

    /// [`receive_frame`](Self::receive_frame) bounded by `timeout`. On
    /// elapse the session stays open; frames are only consumed once fully
    /// received, so no data is lost to an abandoned read.
    pub async fn receive_frame_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<String, DirectLineError> {
        match tokio::time::timeout(timeout, self.receive_frame()).await {
            Ok(result) => result,
            Err(_) => Err(DirectLineError::Timeout),
        }
    }

    /// One read parsed as an activity batch. Empty keepalive frames come
    /// back as the empty set. The batch's watermark, when present, becomes
    /// the cursor [`reconnect`](Self::reconnect) resumes from.
    pub async fn receive_activities(&mut self) -> Result<ActivitySet, DirectLineError> {
        let frame = self.receive_frame().await?;
        if frame.trim().is_empty() {
            return Ok(ActivitySet::default());
        }

        let set: ActivitySet = serde_json::from_str(&frame)
            .map_err(|e| DirectLineError::Parse(format!("activity set: {e}")))?;
        if let Some(ref watermark) = set.watermark {
            self.last_watermark = Some(watermark.clone());
        }

        debug!(
            conversation = %self.conversation_id,
            activities = set.len(),
            "received activity set"
        );
        Ok(set)
    }

    /// The most recent activity of one streaming read, or `None` when that
    /// read was an empty batch or keepalive. Earlier activities of the same
    /// batch are dropped; use [`receive_activities`](Self::receive_activities)
    /// to see the whole delivery.
    pub async fn latest_activity(&mut self) -> Result<Option<Activity>, DirectLineError> {
        Ok(self.receive_activities().await?.into_latest())
    }

    /// Send an activity, then return the next inbound frame raw as its
    /// acknowledgment.
    ///
    /// The stream has no correlation identifiers: if the bot interleaves an
    /// unrelated delivery, that frame is what comes back. Callers that need
    /// to tell the two apart should compose
    /// [`send_activity`](Self::send_activity) and
    /// [`receive_frame`](Self::receive_frame) themselves.
    pub async fn post_activity(&mut self, activity: &Activity) -> Result<String, DirectLineError> {
        self.send_activity(activity).await?;
        self.receive_frame().await
    }

    /// Post the `endOfConversation` activity for this participant. The
    /// streaming connection stays open; ending the conversation and dropping
    /// the transport are separate steps, and only
    /// [`disconnect`](Self::disconnect) does the latter.
    pub async fn close(&mut self) -> Result<String, DirectLineError> {
        let activity = Activity::end_of_conversation(self.user_id.clone());
        self.post_activity(&activity).await
    }
}
