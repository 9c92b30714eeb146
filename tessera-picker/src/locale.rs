//! Locale lookup for grid headers.

pub use chrono::Locale;

use crate::error::ConfigError;

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: Locale = Locale::en_US;

/// Resolves a locale name such as `fr_FR`, `fr-FR` or `fr`.
///
/// A bare language tag resolves to its main territory (`en` becomes `en_US`,
/// `de` becomes `de_DE`).
pub fn parse_locale(name: &str) -> Result<Locale, ConfigError> {
    let normalized = name.trim().replace('-', "_");
    if normalized.is_empty() {
        return Ok(DEFAULT_LOCALE);
    }
    if normalized.eq_ignore_ascii_case("en") {
        return Ok(Locale::en_US);
    }
    if let Ok(locale) = Locale::try_from(normalized.as_str()) {
        return Ok(locale);
    }
    if !normalized.contains('_') {
        let lang = normalized.to_ascii_lowercase();
        let territory = format!("{lang}_{}", lang.to_ascii_uppercase());
        if let Ok(locale) = Locale::try_from(territory.as_str()) {
            return Ok(locale);
        }
    }
    Err(ConfigError::UnknownLocale(name.to_string()))
}
