//! Unified Error Type System
//!
//! Centralized error types for the entire client.
//! Provides error classification for the transport's retry decision and
//! for the router's fallback diagnostics.
//!
//! ## Error Kinds
//!
//! - **Network**: Connectivity issues and timeouts (retried once)
//! - **Http**: Non-2xx status from a remote service (surfaced immediately)
//! - **Parse**: Unexpected payload shape (degrades to empty results upstream)
//! - **Agent**: Analysis service failure, carried as data into fallback routing
//! - **Config**: Invalid configuration (fail fast)

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Kinds
// =============================================================================

/// Coarse error classification used for retry and reporting decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport-level failure: connect, DNS, abort, timeout
    Network,
    /// Remote service answered with a non-2xx status
    Http,
    /// Response body could not be decoded or had an unexpected shape
    Parse,
    /// Invalid configuration
    Config,
    /// Local I/O failure
    Io,
    /// Analysis service reported failure
    Agent,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "NETWORK"),
            Self::Http => write!(f, "HTTP"),
            Self::Parse => write!(f, "PARSE"),
            Self::Config => write!(f, "CONFIG"),
            Self::Io => write!(f, "IO"),
            Self::Agent => write!(f, "AGENT"),
        }
    }
}

impl ErrorKind {
    /// Only network-class failures are worth a second attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum PaddockError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Network error calling {url}: {message}")]
    Network { url: String, message: String },

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    #[error("HTTP {status} from {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Unexpected response from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("Agent service error: {0}")]
    Agent(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PaddockError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl PaddockError {
    /// Create a network error
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create an HTTP status error
    pub fn http(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Create a payload shape error
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => ErrorKind::Network,
            Self::Http { .. } => ErrorKind::Http,
            Self::Json(_) | Self::Parse { .. } => ErrorKind::Parse,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Agent(_) => ErrorKind::Agent,
        }
    }

    /// Check if this error may succeed on a second attempt
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// HTTP status code, if the error came from a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
