use thiserror::Error;

/// Errors returned by the store's REST client.
#[derive(Debug, Error)]
pub enum RestError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured project URL could not be turned into a REST base URL.
    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A credential contains characters that are not valid in an HTTP header.
    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),

    /// The store answered with a status other than the expected one. `body`
    /// is the raw response text, which carries the store's error message.
    #[error("unexpected HTTP status {status} from {context}: {body}")]
    UnexpectedStatus {
        status: u16,
        context: String,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RestError {
    /// Raw response text for a rejected request, or the error's display
    /// string for everything else.
    #[must_use]
    pub fn response_text(&self) -> String {
        match self {
            RestError::UnexpectedStatus { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}
