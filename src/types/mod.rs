pub use self::{
    bitcoin_average::BitcoinAverageValue,
    coin_list::CoinListItem,
    orderbook_body::{OrderEntry, OrderbookBody, OrderbookResult},
};

mod bitcoin_average;
mod coin_list;
mod orderbook_body;
