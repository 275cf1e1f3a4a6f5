pub use self::{database::DatabasePool, http::HTTP};

#[cfg(test)]
pub(crate) use self::http::tests;

mod database;
mod http;
