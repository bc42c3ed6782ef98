//! Namespace-scoped cache keys.
//!
//! A `ContextKey` can only be built from a namespace and a [`Locale`], so every
//! cache entry is addressed by exactly that pair and nothing else.

use std::fmt;

use polyglot_core::Locale;

/// Separator between the namespace and the locale's canonical form.
pub const SEPARATOR: char = '/';

/// A cache key composed of a namespace and a locale.
///
/// # Format
///
/// `<namespace>/<locale>`, e.g. `org.example.app/en_US`. The namespace may
/// be empty (`/de`), and so may the locale (`org.example.app/` for the root
/// locale).
///
/// Locale canonical forms never contain `/`, so the last separator always
/// splits the key back into its two parts. That makes the mapping from
/// (namespace, locale) to key injective, even for namespaces that contain
/// `/` themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextKey {
    /// Private so keys cannot be assembled from arbitrary strings.
    composed: String,
}

impl ContextKey {
    /// Compose the key for `namespace` in `locale`.
    pub fn new(namespace: &str, locale: &Locale) -> Self {
        Self {
            composed: format!("{}{}{}", namespace, SEPARATOR, locale),
        }
    }

    /// The namespace part.
    pub fn namespace(&self) -> &str {
        self.split().0
    }

    /// The locale's canonical form.
    pub fn locale_tag(&self) -> &str {
        self.split().1
    }

    /// The full composed key.
    pub fn as_str(&self) -> &str {
        &self.composed
    }

    /// Returns true if this key was built for `namespace`.
    ///
    /// This is an exact match: `org.example` does not own keys of
    /// `org.example.app`.
    pub fn belongs_to(&self, namespace: &str) -> bool {
        self.namespace() == namespace
    }

    fn split(&self) -> (&str, &str) {
        self.composed
            .rsplit_once(SEPARATOR)
            .unwrap_or((self.composed.as_str(), ""))
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.composed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(s: &str) -> Locale {
        Locale::parse(s).expect("valid locale")
    }

    #[test]
    fn test_composition() {
        let key = ContextKey::new("org.example.app", &locale("en_US"));
        assert_eq!(key.as_str(), "org.example.app/en_US");
        assert_eq!(key.namespace(), "org.example.app");
        assert_eq!(key.locale_tag(), "en_US");
        assert_eq!(key.to_string(), "org.example.app/en_US");
    }

    #[test]
    fn test_empty_namespace_and_root_locale() {
        let key = ContextKey::new("", &locale("de"));
        assert_eq!(key.as_str(), "/de");
        assert_eq!(key.namespace(), "");
        assert_eq!(key.locale_tag(), "de");

        let key = ContextKey::new("pkg", &Locale::root());
        assert_eq!(key.as_str(), "pkg/");
        assert_eq!(key.namespace(), "pkg");
        assert_eq!(key.locale_tag(), "");
    }

    #[test]
    fn test_deterministic() {
        let a = ContextKey::new("pkg", &locale("fr-CA"));
        let b = ContextKey::new("pkg", &locale("fr_CA"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_country_and_variant_give_distinct_keys() {
        let keys = [
            ContextKey::new("pkg", &locale("en")),
            ContextKey::new("pkg", &locale("en_US")),
            ContextKey::new("pkg", &locale("en_GB")),
            ContextKey::new("pkg", &locale("en_US_POSIX")),
            ContextKey::new("pkg", &Locale::new("en", "", "POSIX").unwrap()),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_slash_in_namespace() {
        let key = ContextKey::new("a/b", &locale("en"));
        assert_eq!(key.namespace(), "a/b");
        assert_eq!(key.locale_tag(), "en");
        assert_ne!(key, ContextKey::new("a", &locale("en")));
    }

    #[test]
    fn test_belongs_to_is_exact() {
        let key = ContextKey::new("org.example.app", &locale("en"));
        assert!(key.belongs_to("org.example.app"));
        assert!(!key.belongs_to("org.example"));
        assert!(!key.belongs_to("org.example.app.extra"));
    }
}
