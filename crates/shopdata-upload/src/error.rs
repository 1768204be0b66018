use thiserror::Error;

/// Errors returned by the catalog API client.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// The response body could not be deserialized.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Product creation succeeded but the response carried no usable id.
    #[error("product created at {url} but the response has no id: {body}")]
    MissingProductId { url: String, body: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// The bearer token cannot be sent as an HTTP header value.
    #[error("bearer token contains characters not allowed in an HTTP header")]
    InvalidBearerToken,
}
