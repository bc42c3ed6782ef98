//! POLYGLOT Test Utilities
//!
//! Centralized test infrastructure for the POLYGLOT workspace:
//! - Proptest generators for locales and namespaces
//! - Mock localization contexts and factories
//! - Test fixtures for common locales
//! - Custom assertions for POLYGLOT error variants
//! - Tracing setup for tests

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Once;
use std::time::Duration;

// Re-export core types for convenience
pub use polyglot_core::{
    CacheConfig, ConfigError, ContextFactory, FactoryError, Locale, LocalizedContext,
    PolyglotError, PolyglotResult, ValidationError,
};

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ============================================================================
// TRACING
// ============================================================================

/// Install a fmt subscriber for tests, once per process.
///
/// Honors `RUST_LOG`; defaults to `polyglot_cache=debug`. Output goes through
/// the test writer so it is captured per test.
pub fn init_test_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("polyglot_cache=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// MOCK CONTEXTS
// ============================================================================

/// Mock localization context.
///
/// Carries a unique id so tests can tell instances apart, and a refresh
/// counter so visitor broadcasts can be observed.
#[derive(Debug)]
pub struct MockContext {
    id: Uuid,
    namespace: String,
    locale: Locale,
    refreshes: AtomicU64,
}

impl MockContext {
    pub fn new(namespace: impl Into<String>, locale: Locale) -> Self {
        Self {
            id: Uuid::now_v7(),
            namespace: namespace.into(),
            locale,
            refreshes: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Simulate reloading the context's resources.
    pub fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl LocalizedContext for MockContext {
    fn locale(&self) -> &Locale {
        &self.locale
    }
}

#[derive(Debug, Clone, Default)]
enum FactoryMode {
    #[default]
    Build,
    Fail(String),
    Produce(Locale),
}

/// Mock context factory that counts how often it is asked to build.
#[derive(Debug, Default)]
pub struct MockContextFactory {
    mode: FactoryMode,
    delay: Option<Duration>,
    created: AtomicUsize,
}

impl MockContextFactory {
    /// A factory that builds a context for the requested locale.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory that always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            mode: FactoryMode::Fail(reason.into()),
            ..Self::default()
        }
    }

    /// A factory that ignores the requested locale and builds for `locale`.
    pub fn producing(locale: Locale) -> Self {
        Self {
            mode: FactoryMode::Produce(locale),
            ..Self::default()
        }
    }

    /// Sleep for `delay` inside every build, to widen race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times `create` has been called.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ContextFactory<MockContext> for MockContextFactory {
    fn create(&self, namespace: &str, locale: &Locale) -> PolyglotResult<MockContext> {
        self.created.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        match &self.mode {
            FactoryMode::Build => Ok(MockContext::new(namespace, locale.clone())),
            FactoryMode::Produce(other) => Ok(MockContext::new(namespace, other.clone())),
            FactoryMode::Fail(reason) => Err(FactoryError::ConstructionFailed {
                namespace: namespace.to_string(),
                locale: locale.to_string(),
                reason: reason.clone(),
            }
            .into()),
        }
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating POLYGLOT inputs.

    use super::*;
    use proptest::prelude::*;

    /// Generate a lowercase language subtag.
    pub fn arb_language() -> impl Strategy<Value = String> {
        "[a-z]{2,3}"
    }

    /// Generate a country subtag, sometimes empty.
    pub fn arb_country() -> impl Strategy<Value = String> {
        prop_oneof![
            2 => Just(String::new()),
            3 => "[A-Z]{2}",
            1 => "[0-9]{3}",
        ]
    }

    /// Generate a variant subtag, usually empty.
    pub fn arb_variant() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => Just(String::new()),
            1 => "[A-Za-z0-9]{1,8}",
        ]
    }

    /// Generate a valid locale, including the occasional root or
    /// country-only locale.
    pub fn arb_locale() -> impl Strategy<Value = Locale> {
        let language = prop_oneof![9 => arb_language(), 1 => Just(String::new())];
        (language, arb_country(), arb_variant()).prop_filter_map(
            "variant needs a language or country",
            |(language, country, variant)| Locale::new(&language, &country, &variant).ok(),
        )
    }

    /// Generate a namespace: dotted package names, the empty namespace, and
    /// names containing the key separator.
    pub fn arb_namespace() -> impl Strategy<Value = String> {
        prop_oneof![
            6 => "[a-z][a-z0-9]{0,6}(\\.[a-z][a-z0-9]{0,6}){0,3}",
            1 => Just(String::new()),
            1 => "[a-z]{1,4}/[a-z]{1,4}",
        ]
    }

    /// Generate a (namespace, locale) pair.
    pub fn arb_entry_key() -> impl Strategy<Value = (String, Locale)> {
        (arb_namespace(), arb_locale())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built locales for common testing scenarios.

    use super::*;

    fn fixture(language: &str, country: &str) -> Locale {
        Locale::with_country(language, country).expect("fixture locale is valid")
    }

    pub fn en() -> Locale {
        fixture("en", "")
    }

    pub fn en_us() -> Locale {
        fixture("en", "US")
    }

    pub fn en_gb() -> Locale {
        fixture("en", "GB")
    }

    pub fn en_us_posix() -> Locale {
        Locale::new("en", "US", "POSIX").expect("fixture locale is valid")
    }

    pub fn de_de() -> Locale {
        fixture("de", "DE")
    }

    pub fn fr_fr() -> Locale {
        fixture("fr", "FR")
    }

    pub fn ja_jp() -> Locale {
        fixture("ja", "JP")
    }

    /// Every fixture locale, all distinct.
    pub fn all_locales() -> Vec<Locale> {
        vec![en(), en_us(), en_gb(), en_us_posix(), de_de(), fr_fr(), ja_jp()]
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertion functions for POLYGLOT-specific validation.

    use super::*;

    /// Assert that a PolyglotResult is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &PolyglotResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a PolyglotResult is Err.
    #[track_caller]
    pub fn assert_err<T: std::fmt::Debug>(result: &PolyglotResult<T>) {
        assert!(result.is_err(), "Expected Err, got Ok: {:?}", result);
    }

    /// Assert that a PolyglotResult is an InvalidArgument error for `argument`.
    #[track_caller]
    pub fn assert_invalid_argument<T: std::fmt::Debug>(
        result: &PolyglotResult<T>,
        argument: &str,
    ) {
        match result {
            Err(PolyglotError::Validation(ValidationError::InvalidArgument {
                argument: actual,
                ..
            })) => assert_eq!(actual, argument, "InvalidArgument for the wrong argument"),
            other => panic!("Expected InvalidArgument({}), got: {:?}", argument, other),
        }
    }

    /// Assert that a PolyglotResult is a LocaleMismatch error.
    #[track_caller]
    pub fn assert_locale_mismatch<T: std::fmt::Debug>(result: &PolyglotResult<T>) {
        match result {
            Err(PolyglotError::Validation(ValidationError::LocaleMismatch { .. })) => {}
            other => panic!("Expected LocaleMismatch error, got: {:?}", other),
        }
    }

    /// Assert that a PolyglotResult is a Config error.
    #[track_caller]
    pub fn assert_config_error<T: std::fmt::Debug>(result: &PolyglotResult<T>) {
        match result {
            Err(PolyglotError::Config(_)) => {}
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    /// Assert that a PolyglotResult is a Factory error.
    #[track_caller]
    pub fn assert_factory_error<T: std::fmt::Debug>(result: &PolyglotResult<T>) {
        match result {
            Err(PolyglotError::Factory(_)) => {}
            other => panic!("Expected Factory error, got: {:?}", other),
        }
    }
}
