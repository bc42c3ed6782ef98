//! Error types for POLYGLOT operations

use thiserror::Error;

/// Validation errors.
///
/// These are caller bugs, never transient conditions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid argument {argument}: {reason}")]
    InvalidArgument { argument: String, reason: String },

    #[error("Invalid locale {value:?}: {reason}")]
    InvalidLocale { value: String, reason: String },

    #[error("Locale mismatch: requested {requested:?}, factory produced {produced:?}")]
    LocaleMismatch { requested: String, produced: String },
}

impl ValidationError {
    /// Shorthand for a missing required argument.
    pub fn missing(argument: &str) -> Self {
        Self::InvalidArgument {
            argument: argument.to_string(),
            reason: format!("{} is absent", argument),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Errors reported by localization-context factories.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FactoryError {
    #[error("Failed to construct context for {namespace:?} in locale {locale:?}: {reason}")]
    ConstructionFailed {
        namespace: String,
        locale: String,
        reason: String,
    },
}

/// Master error type for all POLYGLOT errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolyglotError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Factory error: {0}")]
    Factory(#[from] FactoryError),
}

/// Result type alias for POLYGLOT operations.
pub type PolyglotResult<T> = Result<T, PolyglotError>;

// =============================================================================
// TESTS
// =============================================================================
