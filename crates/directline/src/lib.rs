//! Client for the Direct Line 3.0 conversational bot service.
//!
//! Direct Line exposes two channels and this crate speaks both:
//! - REST for conversation bootstrap, token generation, and media upload
//! - a per-conversation WebSocket for low-latency activity exchange
//!
//! [`DirectLineClient`] authenticates with the Direct Line secret and opens
//! conversations; each [`Conversation`] owns its streaming connection and
//! carries the activity operations (send a message, read the bot's replies,
//! upload an image, end the conversation).
//!
//! ```no_run
//! use directline::{Activity, DirectLineClient, DirectLineConfig};
//!
//! # async fn demo() -> directline::Result<()> {
//! let client = DirectLineClient::new(DirectLineConfig::from_env()?);
//! let mut conversation = client.start_conversation().await?;
//!
//! let user = conversation.user_id().to_string();
//! conversation.send_activity(&Activity::message(user, "hi")).await?;
//! if let Some(reply) = conversation.latest_activity().await? {
//!     println!("{}", reply.text.unwrap_or_default());
//! }
//!
//! conversation.close().await?;
//! conversation.disconnect().await;
//! # Ok(())
//! # }
//! ```

pub mod activity;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;

#[cfg(test)]
mod testutil;

pub use activity::{Activity, ActivitySet, ChannelAccount};
pub use client::DirectLineClient;
pub use config::{DirectLineConfig, DEFAULT_USER_ID, DIRECT_LINE_BASE_URL};
pub use conversation::{ConnectionState, Conversation};
pub use error::DirectLineError;

pub type Result<T> = std::result::Result<T, DirectLineError>;
