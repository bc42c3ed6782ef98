//! Localization-context traits.
//!
//! The cache never builds or inspects the values it stores. These traits are
//! the two seams to the outside: values say which locale they were built for,
//! and factories build them on demand.

use crate::error::PolyglotResult;
use crate::locale::Locale;

/// Marker trait for values that can be cached per namespace and locale.
///
/// # Implementation Requirements
///
/// - `locale()` must return the locale the value was built for, and must
///   keep returning the same locale for the lifetime of the value
/// - Implementations must be `Send + Sync + 'static` so they can be shared
///   across threads behind an `Arc`
pub trait LocalizedContext: Send + Sync + 'static {
    /// The locale this context was built for.
    fn locale(&self) -> &Locale;
}

/// Factory for localization contexts.
///
/// This is the expensive part (bundle loading, plural rules, formatters)
/// that the cache exists to avoid repeating.
pub trait ContextFactory<V: LocalizedContext> {
    /// Build a context for `namespace` in `locale`.
    fn create(&self, namespace: &str, locale: &Locale) -> PolyglotResult<V>;
}

impl<V, F> ContextFactory<V> for F
where
    V: LocalizedContext,
    F: Fn(&str, &Locale) -> PolyglotResult<V>,
{
    fn create(&self, namespace: &str, locale: &Locale) -> PolyglotResult<V> {
        self(namespace, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FactoryError, PolyglotError};

    struct Bundle {
        locale: Locale,
        namespace: String,
    }

    impl LocalizedContext for Bundle {
        fn locale(&self) -> &Locale {
            &self.locale
        }
    }

    #[test]
    fn test_closure_is_a_factory() {
        let factory = |namespace: &str, locale: &Locale| -> PolyglotResult<Bundle> {
            Ok(Bundle {
                locale: locale.clone(),
                namespace: namespace.to_string(),
            })
        };

        let de = Locale::language("de").unwrap();
        let bundle = factory.create("org.example", &de).unwrap();
        assert_eq!(bundle.locale(), &de);
        assert_eq!(bundle.namespace, "org.example");
    }

    #[test]
    fn test_factory_errors_propagate() {
        let factory = |namespace: &str, locale: &Locale| -> PolyglotResult<Bundle> {
            Err(FactoryError::ConstructionFailed {
                namespace: namespace.to_string(),
                locale: locale.to_string(),
                reason: "missing bundle".to_string(),
            }
            .into())
        };

        let result = factory.create("org.example", &Locale::root());
        assert!(matches!(result, Err(PolyglotError::Factory(_))));
    }
}
