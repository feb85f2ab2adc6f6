//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! The extraction engine itself never fails; everything here belongs to the
//! I/O layers around it (source hosts, catalog, configuration).
//!
//! ## Error Categories
//!
//! - **RateLimit**: Host rate limiting (wait and retry)
//! - **Auth**: Authentication failures (fail fast)
//! - **NotFound**: Missing repository or file (skip)
//! - **Network**: Connectivity issues (retry with backoff)
//! - **Transient**: Temporary server issues (retry)

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Error categories for retry decisions in the sync layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited - wait then retry
    RateLimit,
    /// Authentication failed - fail fast, don't retry
    Auth,
    /// Resource missing on the remote side
    NotFound,
    /// Network/connectivity issues - retry with backoff
    Network,
    /// Temporary server issues - retry
    Transient,
    /// Invalid request - don't retry, fix request
    BadRequest,
    /// Unknown error - not retried
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Network => write!(f, "NETWORK"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimit | Self::Network | Self::Transient)
    }
}

// =============================================================================
// Remote Error
// =============================================================================

/// Error returned by a remote service (source host or catalog)
#[derive(Debug, Clone)]
pub struct RemoteError {
    /// Error category for retry decisions
    pub category: ErrorCategory,
    /// Service that produced the error ("github", "port", ...)
    pub service: String,
    /// Detailed error message
    pub message: String,
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "[{}:{}] HTTP {}: {}",
                self.service, self.category, status, self.message
            ),
            None => write!(f, "[{}:{}] {}", self.service, self.category, self.message),
        }
    }
}

impl std::error::Error for RemoteError {}

impl RemoteError {
    pub fn new(
        category: ErrorCategory,
        service: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            service: service.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Attach the HTTP status that produced this error
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps transport failures and HTTP statuses onto error categories
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an HTTP status code returned by a remote service
    pub fn classify_http_status(status: u16, message: &str, service: &str) -> RemoteError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            404 => ErrorCategory::NotFound,
            400 | 409 | 422 => ErrorCategory::BadRequest,
            500 | 502 | 503 | 504 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        RemoteError::new(category, service, message).with_status(status)
    }

    /// Classify a transport-level reqwest failure
    pub fn classify_reqwest(err: &reqwest::Error, service: &str) -> RemoteError {
        if let Some(status) = err.status() {
            return Self::classify_http_status(status.as_u16(), &err.to_string(), service);
        }

        let category = if err.is_timeout() || err.is_connect() || err.is_request() {
            ErrorCategory::Network
        } else if err.is_decode() || err.is_body() {
            ErrorCategory::BadRequest
        } else {
            ErrorCategory::Unknown
        };
        RemoteError::new(category, service, err.to_string())
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum GradleMetaError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Remote Errors
    // -------------------------------------------------------------------------
    /// Structured source-host or catalog error
    #[error("Remote error: {0}")]
    Remote(RemoteError),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("No Gradle build file found in {repository}")]
    BuildFileNotFound { repository: String },

    #[error("Sync failed for {repository}: {reason}")]
    Sync { repository: String, reason: String },
}

impl From<RemoteError> for GradleMetaError {
    fn from(err: RemoteError) -> Self {
        GradleMetaError::Remote(err)
    }
}

pub type Result<T> = std::result::Result<T, GradleMetaError>;

impl GradleMetaError {
    /// Create a remote error with category
    pub fn remote(
        category: ErrorCategory,
        service: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Remote(RemoteError::new(category, service, message))
    }

    /// Check if this error is worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Remote(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Error category, when the error came from a remote service
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Remote(e) => Some(e.category),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
