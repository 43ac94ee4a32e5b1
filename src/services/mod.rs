pub mod bar_aggregator;
pub mod bar_writer;
pub mod binance;
pub mod pipeline;
pub mod retry;
pub mod trade_fetcher;

pub use bar_aggregator::BarAggregator;
pub use bar_writer::{sanitize_symbol, write_bars};
pub use binance::{to_api_symbol, BinanceClient};
pub use pipeline::{FetchPipeline, RunStats};
pub use retry::{with_retry, RetryPolicy};
pub use trade_fetcher::TradeFetcher;
