use bigdecimal::BigDecimal;
use serde::Deserialize;

use crate::helpers::deserialize_decimal;

/// BitcoinAverage answers `ticker/USD/last` and
/// `ticker/global/USD/volume_btc` with a bare JSON scalar.
#[derive(Debug, Deserialize)]
pub struct BitcoinAverageValue(
    #[serde(deserialize_with = "deserialize_decimal")] pub BigDecimal,
);
