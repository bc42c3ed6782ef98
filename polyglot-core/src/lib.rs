//! POLYGLOT Core - Locale and Context Types
//!
//! Shared types for the localization-context cache: the [`Locale`]
//! identifier, the [`LocalizedContext`] and [`ContextFactory`] seams, the
//! error hierarchy, and [`CacheConfig`]. All other crates depend on this.

pub mod config;
pub mod context;
pub mod error;
pub mod locale;

pub use config::CacheConfig;
pub use context::{ContextFactory, LocalizedContext};
pub use error::{ConfigError, FactoryError, PolyglotError, PolyglotResult, ValidationError};
pub use locale::Locale;
