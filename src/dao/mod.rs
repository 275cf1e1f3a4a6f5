mod postgre;

pub use postgre::{DataBase, PoolOption, PoolType};
