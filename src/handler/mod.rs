pub mod bitcoinaverage;
pub mod bittrex;
pub mod cryptocoincharts;

use crate::{
    configuration::{AppState, State},
    scheduler::{FailurePolicy, Job},
};

/// Jobs of one update cycle, in execution order. BitcoinAverage only runs
/// when enabled in the configuration.
pub fn update_jobs(app_state: &AppState<State>) -> Vec<Job> {
    let mut jobs = Vec::with_capacity(3);

    if app_state.config.include_bitcoinaverage {
        let state = app_state.clone();
        jobs.push(Job::new("bitcoinaverage", FailurePolicy::Hard, move || {
            bitcoinaverage::fetch_insert(state.clone())
        }));
    }

    let state = app_state.clone();
    jobs.push(Job::new("cryptocoincharts", FailurePolicy::Hard, move || {
        cryptocoincharts::fetch_insert(state.clone())
    }));

    let state = app_state.clone();
    jobs.push(Job::new("bittrex", FailurePolicy::Soft, move || {
        bittrex::fetch_insert(state.clone())
    }));

    jobs
}

#[cfg(test)]
mod tests {
    use std::{str::FromStr, time::Duration};

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::{
        configuration::tests::test_config,
        error::Error,
        provider::{
            tests::{
                local_config, serve, BTC_PRICE, BTC_VOLUME, COIN_LIST, ORDERBOOK,
            },
            HTTP,
        },
        scheduler::Scheduler,
    };

    fn app_state(include_bitcoinaverage: bool) -> AppState<State> {
        let mut config = test_config();
        config.include_bitcoinaverage = include_bitcoinaverage;
        let http = HTTP::new(config.clone()).unwrap();
        AppState::new(State::new(config, http, None))
    }

    fn offline_state(base: &url::Url, include_bitcoinaverage: bool) -> AppState<State> {
        let mut config = local_config(base);
        config.include_bitcoinaverage = include_bitcoinaverage;
        let http = HTTP::new(config.clone()).unwrap();
        AppState::new(State::new(config, http, None))
    }

    #[test]
    fn test_default_jobs() {
        let jobs = update_jobs(&app_state(false));
        let jobs: Vec<(&str, FailurePolicy)> =
            jobs.iter().map(|j| (j.name, j.policy)).collect();

        assert_eq!(
            jobs,
            vec![
                ("cryptocoincharts", FailurePolicy::Hard),
                ("bittrex", FailurePolicy::Soft),
            ]
        );
    }

    #[test]
    fn test_jobs_with_bitcoinaverage() {
        let jobs = update_jobs(&app_state(true));
        let names: Vec<&str> = jobs.iter().map(|j| j.name).collect();

        assert_eq!(names, vec!["bitcoinaverage", "cryptocoincharts", "bittrex"]);
        assert_eq!(jobs[0].policy, FailurePolicy::Hard);
    }

    #[tokio::test]
    async fn test_failing_orderbook_does_not_fail_the_cycle() {
        let base = serve(vec![
            BTC_PRICE,
            BTC_VOLUME,
            COIN_LIST,
            ("/public/getorderbook", 503, "Service Unavailable"),
        ])
        .await;
        let app_state = offline_state(&base, true);

        let err = app_state
            .http
            .get_orderbook(&app_state.config.orderbook_market, 50)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamStatus { status: 503, .. }));

        let scheduler =
            Scheduler::new(update_jobs(&app_state), Duration::from_secs(60), 0);
        assert!(scheduler.run_cycle().await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_price_fails_the_cycle() {
        let base = serve(vec![
            ("/ticker/USD/last", 503, "Service Unavailable"),
            COIN_LIST,
            ORDERBOOK,
        ])
        .await;
        let app_state = offline_state(&base, false);

        let scheduler =
            Scheduler::new(update_jobs(&app_state), Duration::from_secs(60), 0);
        let err = scheduler.run_cycle().await.unwrap_err();
        assert!(matches!(err, Error::UpstreamStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_offline_fetch_insert() {
        let base = serve(vec![BTC_PRICE, BTC_VOLUME, COIN_LIST, ORDERBOOK]).await;
        let app_state = offline_state(&base, true);
        assert!(app_state.config.offline);
        assert!(app_state.database.is_none());

        bitcoinaverage::fetch_insert(app_state.clone()).await.unwrap();
        cryptocoincharts::fetch_insert(app_state.clone()).await.unwrap();
        bittrex::fetch_insert(app_state.clone()).await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_end_to_end() {
        let base = serve(vec![BTC_PRICE, BTC_VOLUME, COIN_LIST, ORDERBOOK]).await;
        let app_state = offline_state(&base, true);

        let btc = bitcoinaverage::fetch(&app_state).await.unwrap();
        assert_eq!(btc.price.to_string(), "600.00000000");
        assert_eq!(
            btc.volume_btc.map(|v| v.to_string()),
            Some(String::from("8968.24000"))
        );

        let coins = cryptocoincharts::fetch(&app_state).await.unwrap();
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].ticker, "LTC");
        assert_eq!(coins[0].price, BigDecimal::from_str("7.407402").unwrap());

        let orders = bittrex::fetch(&app_state).await.unwrap();
        let orders: Vec<(&str, String)> = orders
            .iter()
            .map(|o| (o.buy_or_sell.as_str(), o.total.to_string()))
            .collect();
        assert_eq!(
            orders,
            vec![("b", String::from("0.0375")), ("s", String::from("0.0161"))]
        );
    }

    #[tokio::test]
    async fn test_offline_persist_is_a_no_op() {
        let app_state = app_state(false);
        let coins = cryptocoincharts::parse_coins(
            vec![serde_json::json!({"id": "ltc", "name": "Litecoin", "price_btc": "0.01"})],
            &BigDecimal::from(600),
            None,
            chrono::Utc::now().naive_utc(),
        );

        assert!(app_state.persist_coin_data(&coins).await.is_ok());
        assert!(app_state.persist_orderbook(&[]).await.is_ok());
    }
}
