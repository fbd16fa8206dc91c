//! Direct Line client configuration.

use std::fmt;
use std::time::Duration;

use crate::error::DirectLineError;

/// REST base of the hosted Direct Line 3.0 service.
pub const DIRECT_LINE_BASE_URL: &str = "https://directline.botframework.com/v3/directline";

/// Participant identifier used when none is configured.
pub const DEFAULT_USER_ID: &str = "user1";

/// Direct Line client configuration.
#[derive(Clone)]
pub struct DirectLineConfig {
    /// Direct Line secret (or a token obtained from one), sent as a
    /// Bearer credential on every REST call.
    pub secret: String,
    /// REST base URL; relative request paths are joined onto this.
    pub base_url: String,
    /// Participant identifier stamped on outgoing activities.
    pub user_id: String,
    /// TCP/TLS connect timeout for REST calls.
    pub connect_timeout: Duration,
    /// Overall timeout for a single REST call.
    pub request_timeout: Duration,
}

impl fmt::Debug for DirectLineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectLineConfig")
            .field("secret", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("user_id", &self.user_id)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl DirectLineConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            base_url: DIRECT_LINE_BASE_URL.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Create config from the `DIRECT_LINE_SECRET` environment variable.
    pub fn from_env() -> Result<Self, DirectLineError> {
        match std::env::var("DIRECT_LINE_SECRET") {
            Ok(secret) if !secret.is_empty() => Ok(Self::new(secret)),
            _ => Err(DirectLineError::Config(
                "DIRECT_LINE_SECRET not set".into(),
            )),
        }
    }

    /// Point the client at a different service endpoint, e.g. a regional
    /// deployment or a local stub.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
