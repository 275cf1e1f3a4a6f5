use std::marker::PhantomData;

use sqlx::{Error, Transaction};

use crate::dao::{DataBase, PoolType};

/// Typed handle on one table; every handle shares the same pool.
#[derive(Debug)]
pub struct Table<T> {
    pub pool: PoolType,
    _row: PhantomData<T>,
}

impl<T> Table<T> {
    pub fn new(pool: PoolType) -> Self {
        Table {
            pool,
            _row: PhantomData,
        }
    }

    pub async fn begin(&self) -> Result<Transaction<'static, DataBase>, Error> {
        self.pool.begin().await
    }
}
