use thiserror::Error;

/// Top-level error type for the `thinqlink-api` crate.
///
/// Covers every failure mode of the ThinQ cloud surface: session state,
/// transport, and structured API errors. `thinqlink-core` maps these into
/// its own taxonomy (a command failure aborts one set request; a query
/// failure skips one refresh cycle).
#[derive(Debug, Error)]
pub enum Error {
    // ── Session ─────────────────────────────────────────────────────
    /// No session has been installed on the client. Calls short-circuit
    /// before any request is issued.
    #[error("Not logged in -- no ThinQ session installed")]
    NotLoggedIn,

    /// The cloud rejected the session token (expired or revoked).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// Structured error from the ThinQ envelope (`resultCode != "0000"`).
    #[error("ThinQ API error {code}: {message}")]
    Api { code: String, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the session is unusable
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::NotLoggedIn)
    }

    /// Returns `true` if this is a transient error worth waiting out.
    ///
    /// The sync engine never retries inside a cycle -- the next scheduled
    /// tick is the retry mechanism -- but consumers use this to pick a log
    /// level.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Extract the vendor result code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}
