use bigdecimal::BigDecimal;
use chrono::{NaiveDateTime, Utc};
use tracing::info;

use crate::{
    configuration::{AppState, Market, State},
    error::Error,
    model::{Order_Side, Orderbook},
    types::{OrderEntry, OrderbookResult},
};

pub const DATA_SOURCE: &str = "bittrex";

pub async fn fetch(app_state: &AppState<State>) -> Result<Vec<Orderbook>, Error> {
    let market = &app_state.config.orderbook_market;
    let depth = app_state.config.orderbook_depth;

    info!("Request orderbook from Bittrex (market: {}, depth: {})", market, depth);
    let result = app_state.http.get_orderbook(market, depth).await?;

    Ok(parse_orderbook(market, result, Utc::now().naive_utc()))
}

/// Buy side first, then sell side, each in upstream order.
pub fn parse_orderbook(
    market: &Market,
    result: OrderbookResult,
    timestamp: NaiveDateTime,
) -> Vec<Orderbook> {
    let OrderbookResult { buy, sell } = result;

    buy.into_iter()
        .map(|order| (Order_Side::Buy, order))
        .chain(sell.into_iter().map(|order| (Order_Side::Sell, order)))
        .map(|(side, order)| to_entry(market, side, order, timestamp))
        .collect()
}

fn to_entry(
    market: &Market,
    side: Order_Side,
    order: OrderEntry,
    timestamp: NaiveDateTime,
) -> Orderbook {
    let total: BigDecimal = &order.quantity * &order.rate;

    Orderbook {
        ticker1: market.ticker1.to_owned(),
        ticker2: market.ticker2.to_owned(),
        buy_or_sell: side.into(),
        quantity: order.quantity,
        rate: order.rate,
        total,
        data_source: String::from(DATA_SOURCE),
        updated: timestamp,
    }
}

pub async fn fetch_insert(app_state: AppState<State>) -> Result<(), Error> {
    let entries = fetch(&app_state).await?;
    app_state.persist_orderbook(&entries).await?;
    info!("Bittrex update done, {} orders stored", entries.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn market() -> Market {
        Market {
            ticker1: String::from("BTC"),
            ticker2: String::from("LTC"),
        }
    }

    fn result(json: &str) -> OrderbookResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_total_is_quantity_times_rate() {
        let entries = parse_orderbook(
            &market(),
            result(r#"{"buy": [{"Quantity": 2.5, "Rate": 0.015}], "sell": []}"#),
            Utc::now().naive_utc(),
        );

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.total, BigDecimal::from_str("0.0375").unwrap());
        assert_eq!(entry.total.to_string(), "0.0375");
        assert_eq!(entry.buy_or_sell, "b");
        assert_eq!(entry.ticker1, "BTC");
        assert_eq!(entry.ticker2, "LTC");
        assert_eq!(entry.data_source, "bittrex");
    }

    #[test]
    fn test_buy_side_before_sell_side() {
        let entries = parse_orderbook(
            &market(),
            result(
                r#"{
                    "sell": [{"Quantity": 1, "Rate": 0.0161}],
                    "buy": [
                        {"Quantity": 3.1, "Rate": 0.0159},
                        {"Quantity": "0.5", "Rate": "0.0158"}
                    ]
                }"#,
            ),
            Utc::now().naive_utc(),
        );

        let sides: Vec<&str> =
            entries.iter().map(|e| e.buy_or_sell.as_str()).collect();
        assert_eq!(sides, vec!["b", "b", "s"]);
        assert_eq!(entries[1].total, BigDecimal::from_str("0.0079").unwrap());
        assert_eq!(entries[2].total, BigDecimal::from_str("0.0161").unwrap());
    }

    #[test]
    fn test_empty_book() {
        let entries = parse_orderbook(
            &market(),
            result(r#"{"buy": [], "sell": []}"#),
            Utc::now().naive_utc(),
        );
        assert!(entries.is_empty());
    }
}
