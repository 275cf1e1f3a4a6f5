use bigdecimal::BigDecimal;
use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info, warn, Level};

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::{precision_for, quantize, quantize_for, VOLUME_PRECISION},
    model::Coin_Data,
    provider::DatabasePool,
};

pub const DATA_SOURCE: &str = "BitcoinAverage";
pub const TICKER: &str = "BTC";
const NAME: &str = "Bitcoin";

pub async fn fetch(app_state: &AppState<State>) -> Result<Coin_Data, Error> {
    info!("Fetching Bitcoin data from BitcoinAverage");
    let price = app_state.http.get_btc_last_price().await?;
    let volume = app_state.http.get_btc_volume().await?;

    Ok(build_record(&price, &volume, Utc::now().naive_utc()))
}

/// BTC priced in USD, and in itself.
pub fn build_record(
    price: &BigDecimal,
    volume: &BigDecimal,
    timestamp: NaiveDateTime,
) -> Coin_Data {
    Coin_Data {
        ticker: String::from(TICKER),
        name: String::from(NAME),
        price: quantize_for(price, TICKER),
        price_btc: quantize(&BigDecimal::from(1), precision_for(TICKER)),
        volume_btc: Some(quantize(volume, VOLUME_PRECISION)),
        data_source: String::from(DATA_SOURCE),
        last_update: timestamp,
    }
}

pub async fn fetch_insert(app_state: AppState<State>) -> Result<(), Error> {
    let record = fetch(&app_state).await?;

    if tracing::enabled!(Level::DEBUG) {
        if let Some(database) = &app_state.database {
            if let Some(previous) = previous_price(database).await {
                debug!("BTC price {} (previous {})", &record.price, previous);
            }
        }
    }

    app_state
        .persist_coin_data(std::slice::from_ref(&record))
        .await?;
    info!("BitcoinAverage update done");

    Ok(())
}

/// Last stored BTC price. Lookup failures are logged, never raised, so
/// they cannot keep the new price from being stored.
async fn previous_price(database: &DatabasePool) -> Option<BigDecimal> {
    match database.coin_data.get_last_price(TICKER).await {
        Ok(price) => price.map(|(price,)| price),
        Err(err) => {
            warn!("Could not read the previous BTC price: {}", err);
            None
        },
    }
}
