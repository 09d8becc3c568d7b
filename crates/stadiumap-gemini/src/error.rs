use thiserror::Error;

/// Errors returned by the Gemini client.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("Gemini API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// No API key was configured, so no request was sent.
    #[error("Gemini API key is not configured")]
    MissingApiKey,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The response envelope or the model's JSON answer did not match the
    /// expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model produced no text where an answer was required.
    #[error("empty response from Gemini for {0}")]
    EmptyResponse(String),
}
