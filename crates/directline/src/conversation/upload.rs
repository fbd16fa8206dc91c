//! Media upload into a conversation.

use std::path::Path;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Method;
use tracing::debug;

use super::Conversation;
use crate::activity::{Activity, DEFAULT_LOCALE, TEXT_FORMAT_PLAIN};
use crate::client::ResourceResponse;
use crate::error::DirectLineError;

impl Conversation {
    /// Post an image by URL. The service renders a URL-bearing plain-text
    /// message as an image attachment, so this rides the streaming channel
    /// via [`post_activity`](Self::post_activity); the returned string is
    /// the raw acknowledgment frame.
    pub async fn upload_image_url(&mut self, url: &str) -> Result<String, DirectLineError> {
        let activity = Activity::message(self.user_id.clone(), url)
            .with_locale(DEFAULT_LOCALE)
            .with_text_format(TEXT_FORMAT_PLAIN);
        self.post_activity(&activity).await
    }

    /// Upload a local image file over REST, scoped to this conversation and
    /// participant. Returns the service-assigned resource id.
    ///
    /// The MIME type is `image/<extension>` with the extension taken
    /// verbatim from the file name, so `photo.PNG` goes up as `image/PNG`.
    pub async fn upload_image_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<String, DirectLineError> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let mime_type = format!("image/{extension}");

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DirectLineError::File {
                path: path.to_path_buf(),
                source: e,
            })?;

        let header = |value: &str| {
            HeaderValue::from_str(value).map_err(|e| DirectLineError::File {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
            })
        };
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, header(&mime_type)?);
        headers.insert(
            CONTENT_DISPOSITION,
            header(&format!("name=\"file\"; filename={}", path.display()))?,
        );

        debug!(
            conversation = %self.conversation_id,
            mime = %mime_type,
            bytes = bytes.len(),
            "uploading image file"
        );

        let request_path = format!(
            "conversations/{}/upload?userId={}",
            self.conversation_id, self.user_id
        );
        let value = self
            .client
            .request(Method::POST, &request_path, Some(bytes), headers)
            .await?;
        let resource: ResourceResponse = serde_json::from_value(value)
            .map_err(|e| DirectLineError::Parse(format!("upload response: {e}")))?;
        Ok(resource.id)
    }
}
