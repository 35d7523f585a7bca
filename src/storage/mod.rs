mod alerts;
mod articles;
mod schema;
mod tickers;
mod types;

pub use schema::Database;
pub use types::{
    Alert, Article, Category, NewAlert, NewArticle, NewTicker, Severity, StorageError,
    TickerMessage,
};
