//! Fixed defaults for the fetch pipeline
//!
//! Every value here is the built-in default for a CLI flag of the same name,
//! so a bare `tradebars fetch` reproduces the reference run exactly.

/// Base URL for the Binance spot REST API
pub const BINANCE_BASE_URL: &str = "https://api.binance.com";

/// Quote currencies kept during symbol discovery
pub const DEFAULT_QUOTE_ASSETS: &[&str] = &["USDT", "BTC", "ETH"];

/// Maximum number of symbols processed per run
pub const DEFAULT_MAX_SYMBOLS: usize = 20;

/// Default fetch window start (UTC)
pub const DEFAULT_START: &str = "2025-04-06 12:00:00";

/// Default fetch window end (UTC, exclusive)
pub const DEFAULT_END: &str = "2025-04-06 14:00:00";

/// Bar width in milliseconds
pub const DEFAULT_BUCKET_MS: i64 = 100;

/// Directory that receives one CSV per symbol
pub const DEFAULT_OUTPUT_DIR: &str = "data/Binance";

/// Maximum aggregate trades per page request (Binance hard limit)
pub const TRADE_PAGE_LIMIT: usize = 1000;

/// Retries per page request after the initial attempt
pub const MAX_PAGE_RETRIES: u32 = 3;

/// Base delay for linear retry backoff (attempt N waits N times this)
pub const RETRY_BASE_DELAY_SECS: u64 = 5;

/// Pause between consecutive API requests and between symbols
pub const REQUEST_PACING_MS: u64 = 200;

/// HTTP client timeout
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Timestamp format for the CSV `datetime` column
pub const CSV_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Format accepted by the `--start`/`--end` flags
pub const WINDOW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
