//! Display locales for monetary amounts.
//!
//! A [`Locale`] decides digit grouping, the decimal mark and where the
//! currency symbol goes. Currency symbols themselves live in [`super::money`]
//! because some of them depend on the locale (`￥` vs `¥`, `$` vs `US$`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Narrow no-break space, used as the French grouping separator.
const NARROW_NBSP: &str = "\u{202f}";

/// Error returned when a locale tag is not supported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported locale: {0}")]
pub struct LocaleError(pub String);

/// Supported display locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// Japanese (Japan). The default: receipts are issued in yen.
    #[default]
    #[serde(rename = "ja-JP")]
    JaJp,
    /// English (United States).
    #[serde(rename = "en-US")]
    EnUs,
    /// English (United Kingdom).
    #[serde(rename = "en-GB")]
    EnGb,
    /// German (Germany).
    #[serde(rename = "de-DE")]
    DeDe,
    /// French (France).
    #[serde(rename = "fr-FR")]
    FrFr,
}

impl Locale {
    /// BCP 47 tag for this locale.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JaJp => "ja-JP",
            Self::EnUs => "en-US",
            Self::EnGb => "en-GB",
            Self::DeDe => "de-DE",
            Self::FrFr => "fr-FR",
        }
    }

    /// Separator inserted between groups of three integer digits.
    #[must_use]
    pub const fn grouping_separator(self) -> &'static str {
        match self {
            Self::JaJp | Self::EnUs | Self::EnGb => ",",
            Self::DeDe => ".",
            Self::FrFr => NARROW_NBSP,
        }
    }

    /// Decimal mark between integer and fractional digits.
    #[must_use]
    pub const fn decimal_separator(self) -> &'static str {
        match self {
            Self::JaJp | Self::EnUs | Self::EnGb => ".",
            Self::DeDe | Self::FrFr => ",",
        }
    }

    /// Whether the currency symbol is written after the number.
    #[must_use]
    pub const fn symbol_after_amount(self) -> bool {
        matches!(self, Self::DeDe | Self::FrFr)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', "-").to_ascii_lowercase();
        match normalized.as_str() {
            "ja-jp" | "ja" => Ok(Self::JaJp),
            "en-us" | "en" => Ok(Self::EnUs),
            "en-gb" => Ok(Self::EnGb),
            "de-de" | "de" => Ok(Self::DeDe),
            "fr-fr" | "fr" => Ok(Self::FrFr),
            _ => Err(LocaleError(s.to_string())),
        }
    }
}
