//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Term source errors
//! - 2xx: Index errors
//! - 3xx: Config errors
//! - 4xx: Search errors
//! - 5xx: Embedding provider errors
//! - 6xx: Storage errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for robot mode output.
///
/// Each variant maps to a numeric code (e.g., `SourceLoadFailed` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Source errors (1xx)
    // ========================================
    /// E101: A term source could not be located, parsed or validated
    SourceLoadFailed,

    // ========================================
    // Index errors (2xx)
    // ========================================
    /// E201: No terms have been indexed (query before load, or empty corpus)
    IndexEmpty,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Search errors (4xx)
    // ========================================
    /// E401: Search arguments are out of range
    SearchQueryInvalid,
    /// E402: Cosine similarity undefined for a zero vector
    SimilarityUndefined,

    // ========================================
    // Provider errors (5xx)
    // ========================================
    /// E501: Embedding backend failed to initialize
    ModelUnavailable,
    /// E502: Embedding call exceeded its time bound
    ProviderTimeout,
    /// E503: Embedding backend returned malformed output
    EmbeddingInvalid,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E605: Serialization/deserialization failed
    SerializationError,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E906: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `SourceLoadFailed` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::SourceLoadFailed => 101,

            Self::IndexEmpty => 201,

            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,

            Self::SearchQueryInvalid => 401,
            Self::SimilarityUndefined => 402,

            Self::ModelUnavailable => 501,
            Self::ProviderTimeout => 502,
            Self::EmbeddingInvalid => 503,

            Self::SerializationError => 605,

            Self::IoError => 906,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::SourceLoadFailed => "Check that every required term file exists and holds either a `terms` object or a bare array of term records",
            Self::IndexEmpty => "Load at least one term source before searching. Run `termalign stats` to see what was loaded",
            Self::ConfigInvalid => "Check TOML syntax in termalign.toml and the TERMALIGN_* environment variables",
            Self::ConfigMissingRequired => "Set the missing value in termalign.toml or via its TERMALIGN_* environment variable",
            Self::SearchQueryInvalid => "Use a minimum similarity between 0.0 and 1.0",
            Self::SimilarityUndefined => "The embedding backend produced an all-zero vector. Try a different backend or input text",
            Self::ModelUnavailable => "Check the embedding backend settings. Use `embedding.backend = \"hash\"` to run without a model",
            Self::ProviderTimeout => "The embedding backend is slow or unreachable. Raise `embedding.timeout_ms` or check the endpoint",
            Self::EmbeddingInvalid => "The embedding backend returned unexpected output. Check that the model and dimension settings match",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::SourceLoadFailed
            | Self::IndexEmpty
            | Self::ConfigInvalid
            | Self::ConfigMissingRequired
            | Self::SearchQueryInvalid
            | Self::ModelUnavailable
            | Self::ProviderTimeout
            | Self::IoError => true,

            Self::SimilarityUndefined | Self::EmbeddingInvalid | Self::SerializationError => {
                false
            }
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "source",
            2 => "index",
            3 => "config",
            4 => "search",
            5 => "provider",
            6 => "storage",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::SourceLoadFailed,
            Self::IndexEmpty,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::SearchQueryInvalid,
            Self::SimilarityUndefined,
            Self::ModelUnavailable,
            Self::ProviderTimeout,
            Self::EmbeddingInvalid,
            Self::SerializationError,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
