//! Activity wire types for the Direct Line streaming protocol.
//!
//! Activities travel as JSON text frames. Optional fields are omitted from
//! the wire when unset, so a serialized activity carries exactly the fields
//! that were provided and nothing else.

use serde::{Deserialize, Serialize};

/// Activity `type` values this client produces. The service defines more;
/// inbound activities keep whatever type the bot sent.
pub mod activity_types {
    pub const MESSAGE: &str = "message";
    pub const END_OF_CONVERSATION: &str = "endOfConversation";
}

/// Locale stamped on generated image-by-URL messages.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Text format stamped on generated image-by-URL messages.
pub const TEXT_FORMAT_PLAIN: &str = "plain";

/// A conversation participant, as it appears in an activity's `from` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAccount {
    pub id: String,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// One activity exchanged with the bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub activity_type: String,
    pub from: ChannelAccount,
    /// Service-assigned identifier; present on inbound activities only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(rename = "textFormat", skip_serializing_if = "Option::is_none")]
    pub text_format: Option<String>,
}

impl Activity {
    /// A plain `message` activity from the given participant.
    pub fn message(from: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            activity_type: activity_types::MESSAGE.to_string(),
            from: ChannelAccount::new(from),
            id: None,
            text: Some(text.into()),
            locale: None,
            text_format: None,
        }
    }

    /// The `endOfConversation` activity that ends a conversation.
    pub fn end_of_conversation(from: impl Into<String>) -> Self {
        Self {
            activity_type: activity_types::END_OF_CONVERSATION.to_string(),
            from: ChannelAccount::new(from),
            id: None,
            text: None,
            locale: None,
            text_format: None,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_text_format(mut self, format: impl Into<String>) -> Self {
        self.text_format = Some(format.into());
        self
    }

    /// Whether this is the bot's conversation-termination signal.
    pub fn is_end_of_conversation(&self) -> bool {
        self.activity_type == activity_types::END_OF_CONVERSATION
    }
}

/// One streaming delivery: a batch of activities plus the service's
/// delivery cursor.
///
/// The service occasionally sends empty keepalive frames; those parse to
/// the default (empty) set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActivitySet {
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub watermark: Option<String>,
}

impl ActivitySet {
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Most recent activity of the batch, if any.
    pub fn latest(&self) -> Option<&Activity> {
        self.activities.last()
    }

    /// Consume the set, keeping only the most recent activity.
    pub fn into_latest(self) -> Option<Activity> {
        self.activities.into_iter().last()
    }
}
