use sqlx::{Error, QueryBuilder, Transaction};

use crate::model::{Coin_Data, Table};

use super::{DataBase, MAX_BIND_PARAMS};

const COLUMNS: usize = 7;

impl Table<Coin_Data> {
    pub async fn insert_many(
        &self,
        data: &[Coin_Data],
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<(), Error> {
        for chunk in data.chunks(MAX_BIND_PARAMS / COLUMNS) {
            let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
                r#"
                INSERT INTO coin_data (
                    name,
                    ticker,
                    price,
                    price_btc,
                    volume_btc,
                    data_source,
                    last_update
                )"#,
            );

            query_builder.push_values(chunk, |mut b, coin| {
                b.push_bind(&coin.name)
                    .push_bind(&coin.ticker)
                    .push_bind(&coin.price)
                    .push_bind(&coin.price_btc)
                    .push_bind(&coin.volume_btc)
                    .push_bind(&coin.data_source)
                    .push_bind(coin.last_update);
            });

            query_builder.build().execute(transaction.as_mut()).await?;
        }

        Ok(())
    }

    pub async fn get_last_price(
        &self,
        ticker: &str,
    ) -> Result<Option<(sqlx::types::BigDecimal,)>, Error> {
        const SQL: &str = r#"
        SELECT price
        FROM coin_data
        WHERE ticker = $1
        ORDER BY last_update DESC
        LIMIT 1
        "#;

        sqlx::query_as(SQL)
            .bind(ticker)
            .fetch_optional(&self.pool)
            .await
    }
}
