//! Error types shared by the picker engine.

use thiserror::Error;

/// Reasons a piece of text could not be turned into a picker value.
///
/// Parse failures never abort a transition: the selection state machine turns
/// them into a rejected outcome and leaves the committed value untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text was empty or only whitespace.
    #[error("no value entered")]
    Empty,
    /// The text matches no accepted layout or names an impossible calendar date.
    #[error("`{text}` is not a valid date")]
    Invalid {
        /// The rejected text.
        text: String,
    },
    /// The text has no explicit offset and its wall-clock time falls inside a
    /// daylight-saving gap of the active zone.
    #[error("`{text}` does not exist in the local time zone")]
    NonexistentLocalTime {
        /// The rejected text.
        text: String,
    },
    /// The text was expected to hold a date interval but one of its sides is
    /// not a date.
    #[error("`{text}` is not a valid date interval")]
    InvalidInterval {
        /// The rejected text.
        text: String,
    },
}

impl ParseError {
    pub(crate) fn invalid(text: &str) -> Self {
        Self::Invalid {
            text: text.to_string(),
        }
    }
}

/// Errors raised while validating picker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The granularity name is not one of `day`, `hour`, `minute` or
    /// `day-interval`.
    #[error("unknown granularity `{0}`")]
    UnknownGranularity(String),
    /// The output format contains a token the date library does not know.
    #[error("invalid format string `{0}`")]
    InvalidFormat(String),
    /// Minute grids only support steps of 5 or 10 minutes.
    #[error("unsupported minute step {0}, expected 5 or 10")]
    UnsupportedMinuteStep(u32),
    /// The locale name is not a known POSIX locale.
    #[error("unknown locale `{0}`")]
    UnknownLocale(String),
    /// The zone name is not a known IANA time zone.
    #[error("unknown time zone `{0}`")]
    UnknownTimeZone(String),
    /// The configured initial value could not be parsed.
    #[error("invalid initial value `{text}`: {source}")]
    InvalidInitialValue {
        /// The configured text.
        text: String,
        /// Why parsing failed.
        #[source]
        source: ParseError,
    },
}
