pub use self::types::{DataBase, PoolOption, PoolType};

mod coin_data;
mod orderbook;
mod types;

use self::types::MAX_BIND_PARAMS;
