use sqlx::{Error, QueryBuilder, Transaction};

use crate::model::{Orderbook, Table};

use super::{DataBase, MAX_BIND_PARAMS};

const COLUMNS: usize = 8;

impl Table<Orderbook> {
    pub async fn insert_many(
        &self,
        data: &[Orderbook],
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<(), Error> {
        for chunk in data.chunks(MAX_BIND_PARAMS / COLUMNS) {
            let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
                r#"
                INSERT INTO orderbook (
                    ticker1,
                    ticker2,
                    buy_or_sell,
                    quantity,
                    rate,
                    total,
                    data_source,
                    updated
                )"#,
            );

            query_builder.push_values(chunk, |mut b, order| {
                b.push_bind(&order.ticker1)
                    .push_bind(&order.ticker2)
                    .push_bind(&order.buy_or_sell)
                    .push_bind(&order.quantity)
                    .push_bind(&order.rate)
                    .push_bind(&order.total)
                    .push_bind(&order.data_source)
                    .push_bind(order.updated);
            });

            query_builder.build().execute(transaction.as_mut()).await?;
        }

        Ok(())
    }

    pub async fn truncate(
        &self,
        transaction: &mut Transaction<'_, DataBase>,
    ) -> Result<(), Error> {
        sqlx::query("TRUNCATE orderbook")
            .execute(transaction.as_mut())
            .await
            .map(drop)
    }
}
