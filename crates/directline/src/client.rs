//! REST half of the Direct Line client: conversation bootstrap, token
//! generation, and the shared request plumbing that media upload rides on.

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::DirectLineConfig;
use crate::conversation::Conversation;
use crate::error::DirectLineError;

/// Response to conversation creation and reconnection calls.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConversationEndpoint {
    pub(crate) conversation_id: String,
    /// One-time WebSocket URL; stale after a single connect.
    pub(crate) stream_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Response to a media upload.
#[derive(Debug, Deserialize)]
pub(crate) struct ResourceResponse {
    pub(crate) id: String,
}

/// Direct Line REST client. Cheap to clone; every [`Conversation`] carries a
/// clone for its non-streaming operations.
#[derive(Clone)]
pub struct DirectLineClient {
    config: DirectLineConfig,
    http: reqwest::Client,
}

impl DirectLineClient {
    pub fn new(config: DirectLineConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { config, http }
    }

    pub fn config(&self) -> &DirectLineConfig {
        &self.config
    }

    /// Open a new conversation and bind a streaming session to it.
    pub async fn start_conversation(&self) -> Result<Conversation, DirectLineError> {
        let value = self
            .request(Method::POST, "conversations", None, HeaderMap::new())
            .await?;
        let endpoint: ConversationEndpoint = serde_json::from_value(value)
            .map_err(|e| DirectLineError::Parse(format!("conversation response: {e}")))?;

        info!(conversation = %endpoint.conversation_id, "conversation started");

        Conversation::connect(
            self.clone(),
            endpoint.conversation_id,
            endpoint.stream_url,
            self.config.user_id.clone(),
        )
        .await
    }

    /// Resume an existing conversation with a fresh streaming connection.
    ///
    /// Stream URLs are one-time, so resuming always asks the service for a
    /// new one. Pass the last watermark seen to pick up delivery where the
    /// previous session left off, or `None` for new activities only.
    pub async fn resume_conversation(
        &self,
        conversation_id: &str,
        watermark: Option<&str>,
    ) -> Result<Conversation, DirectLineError> {
        let endpoint = self.reconnect_endpoint(conversation_id, watermark).await?;

        info!(conversation = %endpoint.conversation_id, "conversation resumed");

        Conversation::connect(
            self.clone(),
            endpoint.conversation_id,
            endpoint.stream_url,
            self.config.user_id.clone(),
        )
        .await
    }

    /// Generate a token scoped to a single conversation from the configured
    /// secret. The token is returned, not applied; build a new config with
    /// it to use it.
    pub async fn generate_token(&self) -> Result<String, DirectLineError> {
        let value = self
            .request(Method::POST, "tokens/generate", None, HeaderMap::new())
            .await?;
        let response: TokenResponse = serde_json::from_value(value)
            .map_err(|e| DirectLineError::Parse(format!("token response: {e}")))?;
        Ok(response.token)
    }

    /// Ask the service for a fresh streaming endpoint on an existing
    /// conversation.
    pub(crate) async fn reconnect_endpoint(
        &self,
        conversation_id: &str,
        watermark: Option<&str>,
    ) -> Result<ConversationEndpoint, DirectLineError> {
        let path = match watermark {
            Some(watermark) => format!("conversations/{conversation_id}?watermark={watermark}"),
            None => format!("conversations/{conversation_id}"),
        };
        let value = self.request(Method::GET, &path, None, HeaderMap::new()).await?;
        serde_json::from_value(value)
            .map_err(|e| DirectLineError::Parse(format!("conversation response: {e}")))
    }

    /// Execute one REST call against the service.
    ///
    /// `path` is joined onto the configured base URL. The configured secret
    /// goes out as a Bearer credential; `extra_headers` are merged on top
    /// and win on collision. Non-success statuses become
    /// [`DirectLineError::Api`], success bodies are parsed as JSON.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        extra_headers: HeaderMap,
    ) -> Result<serde_json::Value, DirectLineError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);

        debug!(method = %method, url = %url, "Direct Line request");

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(&self.config.secret)
            .headers(extra_headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DirectLineError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = text.chars().take(200).collect::<String>();
            return Err(DirectLineError::Api { status, message });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| DirectLineError::Parse(e.to_string()))
    }
}
