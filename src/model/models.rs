//! Database models
//!
//! One struct per table row, columns named as in the schema.

use std::{fmt, io, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{types::BigDecimal, FromRow};

#[derive(Debug, Clone, PartialEq, FromRow, Deserialize, Serialize)]
pub struct Coin_Data {
    pub ticker: String,
    pub name: String,
    pub price: BigDecimal,
    pub price_btc: BigDecimal,
    pub volume_btc: Option<BigDecimal>,
    pub data_source: String,
    pub last_update: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, FromRow, Deserialize, Serialize)]
pub struct Orderbook {
    pub ticker1: String,
    pub ticker2: String,
    pub buy_or_sell: String,
    pub quantity: BigDecimal,
    pub rate: BigDecimal,
    pub total: BigDecimal,
    pub data_source: String,
    pub updated: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order_Side {
    Buy,
    Sell,
}

impl fmt::Display for Order_Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Order_Side::Buy => write!(f, "b"),
            Order_Side::Sell => write!(f, "s"),
        }
    }
}

impl From<Order_Side> for String {
    fn from(value: Order_Side) -> Self {
        value.to_string()
    }
}

impl FromStr for Order_Side {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<Order_Side, Self::Err> {
        match value {
            "b" | "buy" => Ok(Order_Side::Buy),
            "s" | "sell" => Ok(Order_Side::Sell),
            _ => Err(io::Error::other("Order side not supported")),
        }
    }
}
