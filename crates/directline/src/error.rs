use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DirectLineError {
    /// The service answered a REST call with a non-success status.
    #[error("API error: {status}: {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("connect error: {0}")]
    Connect(String),

    /// The streaming connection is gone; stream operations on this
    /// conversation will keep failing until a reconnect.
    #[error("connection closed")]
    ConnectionClosed,

    #[error("stream error: {0}")]
    Stream(String),

    #[error("file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out")]
    Timeout,

    #[error("config error: {0}")]
    Config(String),
}
