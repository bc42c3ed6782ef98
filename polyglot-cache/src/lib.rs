//! POLYGLOT Cache - Localization Context Cache
//!
//! An in-memory, thread-safe cache mapping a (namespace, locale) pair to a
//! shared localization context, so expensive contexts are built once and
//! reused.
//!
//! # Semantics
//!
//! - One value per (namespace, locale); the last `put` wins.
//! - Locales match exactly. There is no fallback from `en_US` to `en`.
//! - No eviction, no expiry. Entries leave only through `remove`,
//!   `invalidate_namespace` or `clear`.
//! - `visit` and `snapshot` work on a copy taken at call time, so a visitor
//!   never observes later writes and never blocks writers.
//!
//! # Example
//!
//! ```ignore
//! let cache: ContextCache<Catalog> = ContextCache::new();
//!
//! // Absent locales are rejected up front.
//! assert!(cache.get("org.example.app", None).is_err());
//!
//! let en = Locale::parse("en_US")?;
//! let catalog = cache.get_or_create("org.example.app", &en, &loader)?;
//! ```

pub mod cache;
pub mod key;
pub mod stats;

pub use cache::ContextCache;
pub use key::ContextKey;
pub use stats::CacheStats;

pub use polyglot_core::{
    CacheConfig, ContextFactory, Locale, LocalizedContext, PolyglotError, PolyglotResult,
    ValidationError,
};
