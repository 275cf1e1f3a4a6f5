use bigdecimal::BigDecimal;
use serde::Deserialize;

use crate::helpers::{deserialize_decimal, deserialize_optional_decimal};

/// One element of the CryptoCoinCharts `listCoins` array.
#[derive(Debug, Deserialize)]
pub struct CoinListItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub price_btc: BigDecimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub volume_btc: Option<BigDecimal>,
}
