/// Errors from the persistence gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Missing or malformed gateway configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Whether the backend answered with the given status.
    pub fn is_status(&self, status: u16) -> bool {
        matches!(self, Self::Api { status: s, .. } if *s == status)
    }
}
