//! Locale identifiers
//!
//! A [`Locale`] is a language/country/variant triple with a canonical string
//! form (`en`, `en_US`, `en_US_POSIX`, `en__POSIX`, `_US`, or the empty string
//! for the root locale). Cache keys are built from that canonical form, so the
//! constructor normalizes case and rejects anything that could make two
//! different triples render the same string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Separator between subtags in the canonical form.
const SUBTAG_SEPARATOR: char = '_';

/// A structured locale identifier.
///
/// Subtags are normalized on construction:
/// - `language`: empty or 2-8 ASCII letters, stored lowercase
/// - `country`: empty, 2 ASCII letters stored uppercase, or 3 ASCII digits
/// - `variant`: empty or `_`-separated ASCII alphanumeric segments, case kept
///
/// A variant needs a language or a country next to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    /// Build a locale from its three subtags.
    pub fn new(language: &str, country: &str, variant: &str) -> Result<Self, ValidationError> {
        let language = normalize_language(language)?;
        let country = normalize_country(country)?;
        let variant = normalize_variant(variant)?;

        if !variant.is_empty() && language.is_empty() && country.is_empty() {
            return Err(invalid(
                &variant,
                "variant requires a language or a country",
            ));
        }

        Ok(Self {
            language,
            country,
            variant,
        })
    }

    /// Build a language-only locale such as `de`.
    pub fn language(language: &str) -> Result<Self, ValidationError> {
        Self::new(language, "", "")
    }

    /// Build a language + country locale such as `pt_BR`.
    pub fn with_country(language: &str, country: &str) -> Result<Self, ValidationError> {
        Self::new(language, country, "")
    }

    /// The root locale. Its canonical form is the empty string.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a locale string.
    ///
    /// Accepts `_` or `-` between subtags (`en-US` and `en_US` are the same
    /// locale). Everything after the second separator is the variant.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(invalid(value, format!("unexpected character {:?}", bad)));
        }
        if trimmed.ends_with(['_', '-']) {
            return Err(invalid(value, "trailing separator"));
        }

        let mut parts = trimmed.splitn(3, |c| c == '_' || c == '-');
        let language = parts.next().unwrap_or_default();
        let country = parts.next().unwrap_or_default();
        let variant = parts.next().unwrap_or_default().replace('-', "_");

        Self::new(language, country, &variant).map_err(|err| match err {
            ValidationError::InvalidLocale { reason, .. } => invalid(value, reason),
            other => other,
        })
    }

    /// Lowercase language subtag, possibly empty.
    pub fn language_code(&self) -> &str {
        &self.language
    }

    /// Uppercase (or numeric) country subtag, possibly empty.
    pub fn country_code(&self) -> &str {
        &self.country
    }

    /// Variant subtag, possibly empty.
    pub fn variant_code(&self) -> &str {
        &self.variant
    }

    /// Returns true for the root locale.
    pub fn is_root(&self) -> bool {
        self.language.is_empty() && self.country.is_empty() && self.variant.is_empty()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if !self.country.is_empty() || !self.variant.is_empty() {
            write!(f, "{}{}", SUBTAG_SEPARATOR, self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "{}{}", SUBTAG_SEPARATOR, self.variant)?;
        }
        Ok(())
    }
}

impl FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}

fn invalid(value: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidLocale {
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn normalize_language(language: &str) -> Result<String, ValidationError> {
    if language.is_empty() {
        return Ok(String::new());
    }
    if !(2..=8).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid(language, "language must be 2-8 ASCII letters"));
    }
    Ok(language.to_ascii_lowercase())
}

fn normalize_country(country: &str) -> Result<String, ValidationError> {
    if country.is_empty() {
        return Ok(String::new());
    }
    let alpha = country.len() == 2 && country.chars().all(|c| c.is_ascii_alphabetic());
    let numeric = country.len() == 3 && country.chars().all(|c| c.is_ascii_digit());
    if !(alpha || numeric) {
        return Err(invalid(
            country,
            "country must be 2 ASCII letters or 3 digits",
        ));
    }
    Ok(country.to_ascii_uppercase())
}

fn normalize_variant(variant: &str) -> Result<String, ValidationError> {
    if variant.is_empty() {
        return Ok(String::new());
    }
    let well_formed = variant
        .split(SUBTAG_SEPARATOR)
        .all(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric()));
    if !well_formed {
        return Err(invalid(
            variant,
            "variant must be '_'-separated ASCII alphanumeric segments",
        ));
    }
    Ok(variant.to_string())
}
