use std::time::Duration;

use bigdecimal::BigDecimal;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{
    configuration::{Config, Market},
    error::Error,
    types::{BitcoinAverageValue, OrderbookBody, OrderbookResult},
};

#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    pub http: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<HTTP, Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("surge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HTTP { config, http })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", &url);
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            return Err(Error::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let json = serde_json::from_slice::<T>(&bytes)?;

        Ok(json)
    }

    /// Last USD/BTC trade price, as published by BitcoinAverage.
    pub async fn get_btc_last_price(&self) -> Result<BigDecimal, Error> {
        let url = self.config.get_btc_last_price_url()?;
        let BitcoinAverageValue(price) = self.get_json(url).await?;
        Ok(price)
    }

    /// Global 24h BTC volume, as published by BitcoinAverage.
    pub async fn get_btc_volume(&self) -> Result<BigDecimal, Error> {
        let url = self.config.get_btc_volume_url()?;
        let BitcoinAverageValue(volume) = self.get_json(url).await?;
        Ok(volume)
    }

    /// Raw `listCoins` elements. Each one is validated separately by the
    /// caller so a single broken descriptor does not hide the others.
    pub async fn get_coin_list(&self) -> Result<Vec<serde_json::Value>, Error> {
        let url = self.config.get_coin_list_url()?;
        self.get_json(url).await
    }

    pub async fn get_orderbook(
        &self,
        market: &Market,
        depth: u32,
    ) -> Result<OrderbookResult, Error> {
        let url = self.config.get_orderbook_url(market, depth)?;
        let body: OrderbookBody = self.get_json(url).await?;
        check_orderbook_body(body)
    }
}

fn check_orderbook_body(body: OrderbookBody) -> Result<OrderbookResult, Error> {
    if !body.success {
        let message = body
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| String::from("success=false"));
        return Err(Error::UpstreamRejected(message));
    }

    body.result.ok_or_else(|| {
        Error::InvalidPayload(String::from("orderbook result is missing"))
    })
}
