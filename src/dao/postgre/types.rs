use sqlx::{postgres::PgPoolOptions, PgPool, Postgres};

pub type PoolType = PgPool;
pub type PoolOption = PgPoolOptions;
pub type DataBase = Postgres;

/// Bind parameters Postgres accepts in a single statement.
pub const MAX_BIND_PARAMS: usize = 65535;
