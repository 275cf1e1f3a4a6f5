use bigdecimal::BigDecimal;
use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::quantize_for,
    model::Coin_Data,
    types::CoinListItem,
};

use super::bitcoinaverage;

pub const DATA_SOURCE: &str = "CryptoCoinCharts";

/// Width of the `ticker` column.
const MAX_TICKER_LENGTH: usize = 10;

pub async fn fetch(app_state: &AppState<State>) -> Result<Vec<Coin_Data>, Error> {
    let btc_price = app_state.http.get_btc_last_price().await?;
    let btc_price = quantize_for(&btc_price, bitcoinaverage::TICKER);

    info!("Fetching data from CryptoCoinCharts API");
    let coin_list = app_state.http.get_coin_list().await?;
    info!("{} coins found", coin_list.len());

    Ok(parse_coins(
        coin_list,
        &btc_price,
        app_state.config.coin_list.as_deref(),
        Utc::now().naive_utc(),
    ))
}

/// Normalizes the raw `listCoins` answer, keeping the upstream order.
/// Coins outside the filter are dropped before validation; the remaining
/// descriptors that fail it are logged and skipped.
pub fn parse_coins(
    coin_list: Vec<serde_json::Value>,
    btc_price: &BigDecimal,
    filter: Option<&[String]>,
    timestamp: NaiveDateTime,
) -> Vec<Coin_Data> {
    let total = coin_list.len();
    let mut records = Vec::with_capacity(total);

    for (index, value) in coin_list.into_iter().enumerate() {
        if !is_wanted(&value, filter) {
            continue;
        }

        let item: CoinListItem = match serde_json::from_value(value) {
            Ok(item) => item,
            Err(err) => {
                warn!("Skipping coin descriptor {}/{}: {}", index + 1, total, err);
                continue;
            },
        };

        let ticker = item.id.trim().to_uppercase();

        if ticker.is_empty() || ticker.chars().count() > MAX_TICKER_LENGTH {
            warn!("Skipping coin descriptor {}/{}: invalid ticker '{}'", index + 1, total, item.id);
            continue;
        }

        debug!("Loading coin data: {}/{} processed", index + 1, total);
        records.push(normalize(item, ticker, btc_price, timestamp));
    }

    records
}

/// Without a filter every descriptor is wanted. With one, only those whose
/// `id` matches an entry, ignoring case.
fn is_wanted(value: &serde_json::Value, filter: Option<&[String]>) -> bool {
    let Some(filter) = filter else {
        return true;
    };

    match value.get("id").and_then(serde_json::Value::as_str) {
        Some(id) => {
            let ticker = id.trim().to_uppercase();
            filter.iter().any(|c| c.to_uppercase() == ticker)
        },
        None => false,
    }
}

fn normalize(
    item: CoinListItem,
    ticker: String,
    btc_price: &BigDecimal,
    timestamp: NaiveDateTime,
) -> Coin_Data {
    let price_btc = quantize_for(&item.price_btc, &ticker);
    let price = &price_btc * btc_price;
    let volume_btc = item
        .volume_btc
        .map(|volume| quantize_for(&volume, bitcoinaverage::TICKER));

    Coin_Data {
        ticker,
        name: item.name,
        price,
        price_btc,
        volume_btc,
        data_source: String::from(DATA_SOURCE),
        last_update: timestamp,
    }
}

pub async fn fetch_insert(app_state: AppState<State>) -> Result<(), Error> {
    let records = fetch(&app_state).await?;
    app_state.persist_coin_data(&records).await?;
    info!("CryptoCoinCharts update done, {} coins stored", records.len());

    Ok(())
}
