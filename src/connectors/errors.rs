use std::fmt;

/// Errors raised while talking to a backing service
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorError {
    /// Service unreachable, refused the connection or timed out
    ServiceUnavailable(String),
    /// Service answered with something other than what was asked for
    InvalidResponse(String),
    /// Local I/O failure (filesystem)
    Io(String),
    /// Requested entry does not exist
    NotFound(String),
    /// Internal error in connector
    Internal(String),
}

impl fmt::Display for ConnectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ConnectorError {}

impl From<sqlx::Error> for ConnectorError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(io) => Self::ServiceUnavailable(io.to_string()),
            timeout @ sqlx::Error::PoolTimedOut => Self::ServiceUnavailable(timeout.to_string()),
            sqlx::Error::Tls(tls) => Self::ServiceUnavailable(tls.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<redis::RedisError> for ConnectorError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_timeout() || err.is_connection_refusal() || err.is_connection_dropped() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_io_error() {
            Self::ServiceUnavailable(format!("Connection failed: {}", err))
        } else {
            Self::InvalidResponse(err.to_string())
        }
    }
}

impl From<std::io::Error> for ConnectorError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}
