/// Result type alias for webfs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for webfs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token authority rejected a token as expired, cancelled or unknown
    #[error("invalid token: {message}")]
    InvalidToken { message: String },

    /// Login or handshake with the remote endpoint failed
    #[error("authentication failed for '{principal}': {message}")]
    AuthenticationFailure { principal: String, message: String },

    /// Connectivity, timeout or malformed-response errors
    #[error("transport error for '{endpoint}': {message}")]
    Transport {
        endpoint: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Missing or invalid client setup
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The server answered a data-plane operation with a remote exception
    #[error("{op} failed with {exception} (HTTP {status}): {message}")]
    Remote {
        op: String,
        status: u16,
        exception: String,
        message: String,
    },

    /// A token string could not be encoded or decoded
    #[error("token encoding error: {message}")]
    TokenEncoding { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// The client was used after `close`
    #[error("client is closed")]
    Closed,
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

impl From<bincode::Error> for Error {
    fn from(error: bincode::Error) -> Self {
        Error::TokenEncoding {
            message: error.to_string(),
        }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(error: base64::DecodeError) -> Self {
        Error::TokenEncoding {
            message: error.to_string(),
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create an invalid token error
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Error::InvalidToken {
            message: message.into(),
        }
    }

    /// Create an authentication failure
    #[must_use]
    pub fn authentication(principal: impl Into<String>, message: impl Into<String>) -> Self {
        Error::AuthenticationFailure {
            principal: principal.into(),
            message: message.into(),
        }
    }

    /// Create a transport error
    #[must_use]
    pub fn transport(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error with a source error
    #[must_use]
    pub fn transport_with_source(
        endpoint: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Transport {
            endpoint: endpoint.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a remote exception error
    #[must_use]
    pub fn remote(
        op: impl Into<String>,
        status: u16,
        exception: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Remote {
            op: op.into(),
            status,
            exception: exception.into(),
            message: message.into(),
        }
    }

    /// Create a token encoding error
    #[must_use]
    pub fn token_encoding(message: impl Into<String>) -> Self {
        Error::TokenEncoding {
            message: message.into(),
        }
    }

    /// Whether the authority rejected the token
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, Error::InvalidToken { .. })
    }

    /// Whether this is a connectivity or malformed-response failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::Json { .. })
    }
}

// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Turn any failure into a transport error against `endpoint`
    fn transport_context(self, endpoint: &str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn transport_context(self, endpoint: &str) -> Result<T> {
        self.map_err(|e| Error::transport_with_source(endpoint, e.to_string(), e))
    }
}
