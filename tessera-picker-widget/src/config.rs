//! Picker configuration.

use derive_setters::Setters;
use tessera_picker::{
    ConfigError, DEFAULT_INTERVAL_SEPARATOR, Formatter, Granularity, Locale, LocalZone,
    MinuteStep, SelectionConfig, parse_locale,
};

use crate::event::{ChangeCallback, ChangeEvent};

/// Configuration options for [`DateTimePicker::init`].
///
/// Every field is fixed for the lifetime of the picker.
///
/// [`DateTimePicker::init`]: crate::DateTimePicker::init
#[derive(Debug, Clone, Setters)]
pub struct PickerConfig {
    /// Finest unit the user picks.
    pub granularity: Granularity,
    /// `strftime` output format. Empty selects an ISO-8601 layout with
    /// seconds and an explicit offset.
    #[setters(into)]
    pub format: String,
    /// Text placed between the two sides of an interval.
    #[setters(into)]
    pub interval_separator: String,
    /// POSIX locale name used for grid headers.
    #[setters(into)]
    pub locale: String,
    /// Start in fixed UTC mode instead of floating local time.
    pub utc_mode: bool,
    /// Zero fields finer than the granularity when a grid cell commits.
    pub pad_to_boundary: bool,
    /// Label of the "now" button.
    #[setters(into)]
    pub now_button_text: String,
    /// Commit unfinished or unconfirmed edits when the dropdown closes.
    pub update_on_close: bool,
    /// Spacing of the minute grid.
    pub minute_step: MinuteStep,
    /// Zone of the floating local representation.
    pub zone: LocalZone,
    /// Text of the initial value, parsed like typed input.
    #[setters(strip_option, into)]
    pub initial_value: Option<String>,
    /// Subscriber notified on every change.
    #[setters(skip)]
    pub callback: Option<ChangeCallback>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            format: String::new(),
            interval_separator: DEFAULT_INTERVAL_SEPARATOR.to_string(),
            locale: "en_US".to_string(),
            utc_mode: false,
            pad_to_boundary: true,
            now_button_text: "Now".to_string(),
            update_on_close: true,
            minute_step: MinuteStep::default(),
            zone: LocalZone::default(),
            initial_value: None,
            callback: None,
        }
    }
}

/// The parts of a [`PickerConfig`] that need checking before use.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConfig {
    pub(crate) formatter: Formatter,
    pub(crate) locale: Locale,
    pub(crate) selection: SelectionConfig,
}

impl PickerConfig {
    /// Sets the change subscriber.
    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.callback = Some(ChangeCallback::new(f));
        self
    }

    /// Sets the change subscriber using a shared handle.
    pub fn callback_shared(mut self, callback: ChangeCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Checks the format string, the locale and the initial value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolve().map(|_| ())
    }

    pub(crate) fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let formatter = Formatter::new(self.format.as_str(), self.interval_separator.as_str())?;
        let locale = parse_locale(&self.locale)?;
        if let Some(text) = self.initial_value.as_deref().filter(|text| !text.trim().is_empty()) {
            let parsed = if self.granularity.is_interval() {
                formatter
                    .parse_interval(text, self.zone, self.utc_mode)
                    .map(|_| ())
            } else {
                formatter.parse(text, self.zone, self.utc_mode).map(|_| ())
            };
            parsed.map_err(|source| ConfigError::InvalidInitialValue {
                text: text.to_string(),
                source,
            })?;
        }
        Ok(ResolvedConfig {
            formatter,
            locale,
            selection: SelectionConfig {
                granularity: self.granularity,
                pad_to_boundary: self.pad_to_boundary,
                update_on_close: self.update_on_close,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use tessera_picker::ParseError;

    use super::*;

    fn utc_zone() -> LocalZone {
        LocalZone::Fixed(FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn defaults_match_the_documented_contract() {
        let config = PickerConfig::default().zone(utc_zone());
        assert_eq!(config.granularity, Granularity::Minute);
        assert_eq!(config.interval_separator, " - ");
        assert_eq!(config.now_button_text, "Now");
        assert!(config.pad_to_boundary && config.update_on_close && !config.utc_mode);
        assert_eq!(config.minute_step, MinuteStep::Ten);
        assert!(config.callback.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn setters_chain() {
        let config = PickerConfig::default()
            .granularity(Granularity::Hour)
            .format("%d/%m/%Y %H:%M")
            .locale("fr-FR")
            .initial_value("03/03/2012 22:45")
            .zone(utc_zone())
            .callback(|_| {});
        assert_eq!(config.initial_value.as_deref(), Some("03/03/2012 22:45"));
        assert!(config.callback.is_some());
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.locale, Locale::fr_FR);
        assert_eq!(resolved.selection.granularity, Granularity::Hour);
    }

    #[test]
    fn bad_settings_are_reported() {
        let bad_format = PickerConfig::default().zone(utc_zone()).format("%Q");
        assert_eq!(
            bad_format.validate(),
            Err(ConfigError::InvalidFormat("%Q".into()))
        );
        let bad_locale = PickerConfig::default().zone(utc_zone()).locale("zz");
        assert!(matches!(bad_locale.validate(), Err(ConfigError::UnknownLocale(_))));
        let bad_value = PickerConfig::default().zone(utc_zone()).initial_value("yesterday");
        assert_eq!(
            bad_value.validate(),
            Err(ConfigError::InvalidInitialValue {
                text: "yesterday".into(),
                source: ParseError::Invalid {
                    text: "yesterday".into()
                },
            })
        );
    }
}
