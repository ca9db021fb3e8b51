//! Error handling for termalign.
//!
//! This module provides:
//! - [`AlignError`]: The main error enum for all termalign operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestions and context
//! - Suggestion helpers for context-aware error recovery hints

mod codes;
mod suggestions;

use std::io;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;
pub use suggestions::suggest_for_error;

/// Main error type for termalign operations.
#[derive(Error, Debug)]
pub enum AlignError {
    #[error("Failed to load term source {source_name}: {reason}")]
    SourceLoad { source_name: String, reason: String },

    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Similarity index is empty: {0}")]
    EmptyIndex(String),

    #[error("Embedding provider timed out after {}ms", .elapsed.as_millis())]
    ProviderTimeout { elapsed: Duration },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Similarity undefined: {0}")]
    UndefinedSimilarity(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AlignError {
    /// Build a source load error for the given source location.
    pub fn source_load(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceLoad {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::SourceLoad { .. } => ErrorCode::SourceLoadFailed,
            Self::ModelUnavailable(_) => ErrorCode::ModelUnavailable,
            Self::EmptyIndex(_) => ErrorCode::IndexEmpty,
            Self::ProviderTimeout { .. } => ErrorCode::ProviderTimeout,
            Self::Embedding(_) => ErrorCode::EmbeddingInvalid,
            Self::UndefinedSimilarity(_) => ErrorCode::SimilarityUndefined,
            Self::InvalidQuery(_) => ErrorCode::SearchQueryInvalid,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) | Self::Yaml(_) => ErrorCode::SerializationError,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::SourceLoad {
                source_name,
                reason,
            } => Some(serde_json::json!({ "source": source_name, "reason": reason })),
            Self::ProviderTimeout { elapsed } => Some(serde_json::json!({
                "timeout_ms": u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
            })),
            Self::ModelUnavailable(reason) => Some(serde_json::json!({ "reason": reason })),
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_align_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
///
/// Emitted in robot mode so callers can branch on the code instead of
/// parsing the message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "SOURCE_LOAD_FAILED")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "source", "config", "provider")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message,
        }
    }

    /// Create a structured error from an [`AlignError`].
    #[must_use]
    pub fn from_align_error(err: &AlignError) -> Self {
        let code = err.code();
        let context = err.context();
        let suggestion = suggest_for_error(code, context.as_ref());

        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion,
            context,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }

    /// Add context to this error.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        // Regenerate suggestion with new context
        self.suggestion = suggest_for_error(self.code, self.context.as_ref());
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<&AlignError> for StructuredError {
    fn from(err: &AlignError) -> Self {
        Self::from_align_error(err)
    }
}

/// Result type alias using [`AlignError`].
pub type Result<T> = std::result::Result<T, AlignError>;
