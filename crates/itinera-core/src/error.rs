//! Error types for the itinera library.

use std::path::PathBuf;

use jiff::civil::Date;
use thiserror::Error;

/// Comprehensive error type for all itinerary operations.
///
/// Variants fall into three groups: request construction (`Validation`,
/// `Configuration`), provider failures (`Authentication` through `Network`),
/// and domain/infrastructure failures raised after a response arrives or
/// around persistence.
#[derive(Error, Debug)]
pub enum ItineraError {
    /// Missing or placeholder credentials, bad client settings
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Malformed request detected before any network I/O
    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// Provider rejected the credentials (HTTP 401)
    #[error("Authentication with the model provider failed: {message}")]
    Authentication { message: String },

    /// Provider throttled the request (HTTP 429)
    #[error("Model provider rate limit reached: {message}")]
    RateLimited { message: String },

    /// Provider-side fault (HTTP 500, 502, 503)
    #[error("Model provider server error ({status}): {message}")]
    ServerFault { status: u16, message: String },

    /// Any other non-success status
    #[error("Model provider returned unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Provider rejected the payload semantics (HTTP 400)
    #[error("Model provider rejected the request: {message}")]
    InvalidRequest { message: String },

    /// Request exceeded the client timeout
    #[error("Model provider request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Connection-level failure other than a timeout
    #[error("Network error talking to model provider: {message}")]
    Network { message: String },

    /// Structured output missing or lacking the expected shape
    #[error("Unexpected model response shape: {reason}")]
    ResponseShape { reason: String },

    /// Monthly generation allowance used up
    #[error("Monthly generation limit reached ({used}/{limit}), resets on {reset_date}")]
    QuotaExceeded {
        used: u32,
        limit: u32,
        reset_date: Date,
    },

    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Travel plan not found for the given ID
    #[error("Travel plan with ID {id} not found")]
    PlanNotFound { id: u64 },

    /// Generation attempt not found for the given ID
    #[error("Generation attempt with ID {id} not found")]
    AttemptNotFound { id: u64 },

    /// Attempt status change not allowed by the state machine
    #[error("Generation attempt {id} cannot move from {from} to {to}")]
    InvalidTransition { id: u64, from: String, to: String },

    /// Job exceeded its wall-clock ceiling
    #[error("Generation job timed out after {seconds}s")]
    JobTimeout { seconds: u64 },

    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },

    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> ItineraError {
        ItineraError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating validation errors.
pub struct ValidationBuilder {
    field: String,
}

impl ValidationBuilder {
    /// Create a new validation error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> ItineraError {
        ItineraError::Validation {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl ItineraError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for validation errors.
    pub fn validation(field: impl Into<String>) -> ValidationBuilder {
        ValidationBuilder::new(field)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a response-shape error.
    pub fn response_shape(reason: impl Into<String>) -> Self {
        Self::ResponseShape {
            reason: reason.into(),
        }
    }

    /// Whether the model client's retry wrapper may try the call again.
    ///
    /// Only provider throttling and the retryable 5xx family qualify.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::ServerFault { .. })
    }

    /// Whether a whole generation job may be attempted again.
    ///
    /// Wider than [`is_transient`](Self::is_transient): connection failures
    /// and timeouts are worth another job run even though the client itself
    /// does not retry them.
    pub fn is_recoverable(&self) -> bool {
        self.is_transient() || matches!(self, Self::Timeout { .. } | Self::Network { .. })
    }

    /// Short machine-friendly name of the failure kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Validation { .. } => "validation",
            Self::Authentication { .. } => "authentication",
            Self::RateLimited { .. } => "rate_limited",
            Self::ServerFault { .. } => "server_fault",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Timeout { .. } => "timeout",
            Self::Network { .. } => "network",
            Self::ResponseShape { .. } => "response_shape",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::Database { .. } => "database",
            Self::PlanNotFound { .. } => "plan_not_found",
            Self::AttemptNotFound { .. } => "attempt_not_found",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::JobTimeout { .. } => "job_timeout",
            Self::Serialization { .. } => "serialization",
            Self::FileSystem { .. } => "file_system",
            Self::XdgDirectory(_) => "xdg_directory",
        }
    }

    /// Message suitable for end users.
    ///
    /// Quota exhaustion gets an actionable message; every other generation
    /// failure collapses into a generic retry suggestion, with details left to
    /// the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::QuotaExceeded {
                used,
                limit,
                reset_date,
            } => format!(
                "You have used {used} of {limit} itinerary generations this month. \
                 Your allowance resets on {reset_date}."
            ),
            Self::PlanNotFound { id } => format!("Travel plan {id} does not exist."),
            _ => "We could not generate your itinerary right now. Please try again in a few minutes."
                .to_string(),
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ItineraError::database(message).with_source(e))
    }
}

/// Result type alias for itinerary operations
pub type Result<T> = std::result::Result<T, ItineraError>;
