use bigdecimal::ParseBigDecimalError as BIG_DECIMAL_ERROR;
use reqwest::Error as REQWEST_ERROR;
use serde_json::Error as JSON_ERROR;
use sqlx::error::Error as SQL_ERROR;
use std::{
    env::VarError, io::Error as IO_ERROR, num::ParseIntError,
    str::ParseBoolError as PARSE_BOOL_ERROR,
};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;
use url::ParseError as URL_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    URL(#[from] URL_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    SQL(#[from] SQL_ERROR),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    BigDecimalError(#[from] BIG_DECIMAL_ERROR),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("{0}")]
    ParseBoolError(#[from] PARSE_BOOL_ERROR),

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),

    #[error("{0}")]
    ReqwestError(REQWEST_ERROR),

    #[error("Couldn't connect to upstream API: {0}")]
    Connectivity(REQWEST_ERROR),

    #[error("Upstream {url} responded with status {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Upstream rejected request: {0}")]
    UpstreamRejected(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid option {option}")]
    InvalidOption { option: String },

    #[error(
        "Number of restarts {restarts} exceeds the maximum number of allowed retries {max_retry}"
    )]
    RetryLimitExceeded { restarts: u64, max_retry: i64 },
}

impl From<REQWEST_ERROR> for Error {
    fn from(error: REQWEST_ERROR) -> Self {
        if error.is_connect() || error.is_timeout() {
            return Error::Connectivity(error);
        }

        if error.is_decode() {
            return Error::InvalidPayload(error.to_string());
        }

        Error::ReqwestError(error)
    }
}

impl Error {
    /// Errors raised while talking to, or reading the answer of, an
    /// upstream API. Everything else (database, configuration, runtime)
    /// is not a fetch failure.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::ReqwestError(_)
                | Error::Connectivity(_)
                | Error::UpstreamStatus { .. }
                | Error::UpstreamRejected(_)
                | Error::InvalidPayload(_)
                | Error::JsonError(_)
                | Error::BigDecimalError(_)
        )
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Connectivity(_))
    }
}
