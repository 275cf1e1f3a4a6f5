use std::{fmt, str::FromStr, time::Duration};

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{de, Deserialize, Deserializer};

/// Fractional digits used for any ticker without an override.
pub const DEFAULT_PRECISION: i64 = 8;

/// Fractional digits kept for the BitcoinAverage global volume.
pub const VOLUME_PRECISION: i64 = 5;

const PRECISION_OVERRIDES: &[(&str, i64)] = &[("NXT", 2), ("XRP", 6)];

/// Number of fractional digits a ticker is stored with. Unknown tickers
/// fall back to [`DEFAULT_PRECISION`].
pub fn precision_for(ticker: &str) -> i64 {
    let ticker = ticker.to_uppercase();

    PRECISION_OVERRIDES
        .iter()
        .find(|(symbol, _)| *symbol == ticker)
        .map(|(_, digits)| *digits)
        .unwrap_or(DEFAULT_PRECISION)
}

/// Round half to even at `digits` fractional digits.
pub fn quantize(value: &BigDecimal, digits: i64) -> BigDecimal {
    value.with_scale_round(digits, RoundingMode::HalfEven)
}

pub fn quantize_for(value: &BigDecimal, ticker: &str) -> BigDecimal {
    quantize(value, precision_for(ticker))
}

/// Splits a comma separated list, trimming blanks and dropping empty items.
pub fn parse_list(data: &str) -> Vec<String> {
    data.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_owned())
        .collect()
}

/// Seconds between update cycles. Fractions are allowed, anything under
/// one second is rejected.
pub fn parse_interval(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number of seconds", value))?;

    if !seconds.is_finite() || seconds < 1.0 {
        return Err(format!("interval must be at least 1 second, got `{}`", value));
    }

    Duration::try_from_secs_f64(seconds).map_err(|e| e.to_string())
}

/// Deserializes a decimal from either a JSON number or a numeric string.
///
/// Numbers are read through their shortest textual form, so `0.015`
/// becomes exactly `0.015` instead of the nearest binary float.
pub fn deserialize_decimal<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = NumberOrString::deserialize(deserializer)?;
    value.to_decimal().map_err(de::Error::custom)
}

pub fn deserialize_optional_decimal<'de, D>(
    deserializer: D,
) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    match value {
        Some(v) => v.to_decimal().map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

impl NumberOrString {
    fn to_decimal(&self) -> Result<BigDecimal, InvalidDecimal> {
        let text = match self {
            NumberOrString::Number(n) => n.to_string(),
            NumberOrString::String(s) => s.trim().to_owned(),
        };

        BigDecimal::from_str(&text).map_err(|_| InvalidDecimal(text))
    }
}

#[derive(Debug)]
struct InvalidDecimal(String);

impl fmt::Display for InvalidDecimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid decimal value `{}`", self.0)
    }
}
