use sqlx::Transaction;
use tracing::{debug, warn};

use crate::{
    configuration::Config,
    dao::{DataBase, PoolOption, PoolType},
    error::Error,
    model::{Coin_Data, Orderbook, Table},
};

/// Single long-lived connection; every batch runs in its own transaction
/// on it, one after the other.
#[derive(Debug)]
pub struct DatabasePool {
    pub coin_data: Table<Coin_Data>,
    pub orderbook: Table<Orderbook>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .max_connections(1)
            .connect(config.database_url.as_str())
            .await?;

        Ok(DatabasePool::from_pool(pool))
    }

    pub fn from_pool(pool: PoolType) -> DatabasePool {
        DatabasePool {
            coin_data: Table::new(pool.clone()),
            orderbook: Table::new(pool.clone()),
            pool,
        }
    }

    /// Inserts the whole batch or nothing.
    pub async fn persist_coin_data(&self, data: &[Coin_Data]) -> Result<(), Error> {
        if data.is_empty() {
            return Ok(());
        }

        let mut tx = self.coin_data.begin().await?;

        if let Err(err) = self.coin_data.insert_many(data, &mut tx).await {
            rollback(tx).await;
            return Err(Error::SQL(err));
        }

        tx.commit().await?;
        debug!("Committed {} coin_data rows", data.len());

        Ok(())
    }

    /// Inserts the snapshot or nothing. With `replace` the previous
    /// snapshot is removed in the same transaction.
    pub async fn persist_orderbook(
        &self,
        data: &[Orderbook],
        replace: bool,
    ) -> Result<(), Error> {
        if data.is_empty() {
            return Ok(());
        }

        let mut tx = self.orderbook.begin().await?;

        let result = async {
            if replace {
                self.orderbook.truncate(&mut tx).await?;
            }
            self.orderbook.insert_many(data, &mut tx).await
        }
        .await;

        if let Err(err) = result {
            rollback(tx).await;
            return Err(Error::SQL(err));
        }

        tx.commit().await?;
        debug!("Committed {} orderbook rows", data.len());

        Ok(())
    }
}

/// The insert error is what the caller gets; a failed rollback is only
/// logged. Postgres discards the transaction with the connection anyway.
async fn rollback(tx: Transaction<'static, DataBase>) {
    if let Err(err) = tx.rollback().await {
        warn!("Rollback failed: {}", err);
    }
}
