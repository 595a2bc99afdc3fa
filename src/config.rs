//! Formatting and parsing settings for temporal literals.
//!
//! There is no process-wide date style: every parse and format call receives a
//! `Config`, and `Config::default()` reproduces ISO output in UTC.
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Largest accepted UTC offset, 15:59:59.
pub const MAX_UTC_OFFSET_SECONDS: i32 = 15 * 3600 + 59 * 60 + 59;

/// How timestamps and dates are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStyle {
    /// `2001-02-03 04:05:06+00`
    #[default]
    Iso,
    /// `02/03/2001 04:05:06+00` (field order follows `DateOrder`)
    Sql,
    /// `03.02.2001 04:05:06+00`
    German,
    /// `2001-02-03T04:05:06+00`
    Xsd,
}

/// Field order used to read and write ambiguous slash-separated dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    #[default]
    Mdy,
    Dmy,
    Ymd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub date_style: DateStyle,

    #[serde(default)]
    pub date_order: DateOrder,

    /// Session offset from UTC, used to read timestamps without an explicit
    /// zone and to render timestamps with time zone.
    #[serde(default)]
    pub utc_offset_seconds: i32,

    /// Fixed number of fractional digits for float output. `None` prints the
    /// shortest text that reads back to the same value.
    #[serde(default)]
    pub float_digits: Option<usize>,
}

impl Config {
    pub fn with_date_style(mut self, style: DateStyle) -> Self {
        self.date_style = style;
        self
    }

    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    pub fn with_utc_offset(mut self, seconds: i32) -> Self {
        assert!(
            seconds.abs() <= MAX_UTC_OFFSET_SECONDS,
            "UTC offset must be within 15:59:59 of UTC"
        );
        self.utc_offset_seconds = seconds;
        self
    }

    pub fn with_float_digits(mut self, digits: usize) -> Self {
        if digits > 17 {
            log::warn!(
                "Requested {} float digits; values beyond 17 significant digits are noise",
                digits
            );
        }
        self.float_digits = Some(digits);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.utc_offset_seconds.abs() > MAX_UTC_OFFSET_SECONDS {
            return Err(format!(
                "UTC offset of {} seconds is outside the supported range",
                self.utc_offset_seconds
            ));
        }
        if self.date_style == DateStyle::Sql && self.date_order == DateOrder::Ymd {
            log::warn!("SQL date style with YMD order renders dates as YYYY/MM/DD");
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            date_style: DateStyle::default(),
            date_order: DateOrder::default(),
            utc_offset_seconds: 0,
            float_digits: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.date_style, DateStyle::Iso);
        assert_eq!(config.date_order, DateOrder::Mdy);
        assert_eq!(config.utc_offset_seconds, 0);
        assert!(config.float_digits.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_date_style(DateStyle::German)
            .with_date_order(DateOrder::Dmy)
            .with_utc_offset(3600)
            .with_float_digits(3);

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        assert!(Config::from_json(r#"{"time_zone": "CET"}"#).is_err());
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"date_style": "xsd"}"#).unwrap();
        assert_eq!(config.date_style, DateStyle::Xsd);
        assert_eq!(config.date_order, DateOrder::Mdy);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());
        let bad = Config {
            utc_offset_seconds: 16 * 3600,
            ..Config::default()
        };
        assert!(bad.validate().is_err());
        assert!(Config::from_json(r#"{"utc_offset_seconds": 90000}"#).is_err());
    }

    #[test]
    #[should_panic]
    fn test_with_utc_offset_out_of_range_panics() {
        let _ = Config::default().with_utc_offset(-16 * 3600);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml_round_trip() {
        let config = Config::default().with_date_style(DateStyle::Sql);
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
