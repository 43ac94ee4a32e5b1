use crate::constants::{
    DEFAULT_BUCKET_MS, DEFAULT_END, DEFAULT_MAX_SYMBOLS, DEFAULT_OUTPUT_DIR,
    DEFAULT_QUOTE_ASSETS, DEFAULT_START, WINDOW_TIME_FORMAT,
};
use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Configuration for one fetch run
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Window start in milliseconds since the Unix epoch (inclusive)
    pub start_ms: i64,

    /// Window end in milliseconds since the Unix epoch (exclusive)
    pub end_ms: i64,

    /// Quote currencies kept during symbol discovery
    pub quote_assets: Vec<String>,

    /// Cap on the number of symbols processed
    pub max_symbols: usize,

    /// Bar width in milliseconds
    pub bucket_ms: i64,

    /// Directory that receives one CSV per symbol
    pub output_dir: PathBuf,

    /// Explicit symbol list ("BASE/QUOTE"); empty means discover
    pub symbols: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            // Constants are valid window strings, so parsing cannot fail here
            start_ms: parse_window_time(DEFAULT_START).unwrap_or(0),
            end_ms: parse_window_time(DEFAULT_END).unwrap_or(0),
            quote_assets: DEFAULT_QUOTE_ASSETS.iter().map(|s| s.to_string()).collect(),
            max_symbols: DEFAULT_MAX_SYMBOLS,
            bucket_ms: DEFAULT_BUCKET_MS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            symbols: Vec::new(),
        }
    }
}

impl FetchConfig {
    /// Check that the window, bucket width and symbol cap make sense
    pub fn validate(&self) -> Result<()> {
        if self.start_ms >= self.end_ms {
            return Err(Error::Config(format!(
                "Window start ({}) must be before window end ({})",
                self.start_ms, self.end_ms
            )));
        }
        if self.bucket_ms <= 0 {
            return Err(Error::Config(format!(
                "Bucket width must be positive, got {} ms",
                self.bucket_ms
            )));
        }
        if self.max_symbols == 0 {
            return Err(Error::Config("Symbol cap must be at least 1".to_string()));
        }
        if self.quote_assets.is_empty() && self.symbols.is_empty() {
            return Err(Error::Config(
                "At least one quote asset is required for discovery".to_string(),
            ));
        }
        Ok(())
    }

    /// Window length in milliseconds
    pub fn window_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

/// Parse a `YYYY-MM-DD HH:MM:SS` string as UTC milliseconds
pub fn parse_window_time(s: &str) -> Result<i64> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), WINDOW_TIME_FORMAT)
        .map_err(|e| Error::Config(format!("Invalid time '{}': {}", s, e)))?;
    Ok(naive.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_time() {
        let ms = parse_window_time("2025-04-06 12:00:00").unwrap();
        assert_eq!(ms, 1_743_940_800_000);
    }

    #[test]
    fn test_parse_window_time_trims_whitespace() {
        let ms = parse_window_time("  2025-04-06 14:00:00 ").unwrap();
        assert_eq!(ms, 1_743_948_000_000);
    }

    #[test]
    fn test_parse_window_time_rejects_garbage() {
        assert!(parse_window_time("2025-04-06").is_err());
        assert!(parse_window_time("not a time").is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = FetchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_ms(), 2 * 60 * 60 * 1000);
        assert_eq!(config.bucket_ms, 100);
        assert_eq!(config.max_symbols, 20);
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let config = FetchConfig {
            start_ms: 2_000,
            end_ms: 1_000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_bucket() {
        let config = FetchConfig {
            bucket_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = FetchConfig {
            bucket_ms: -100,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_symbol_cap() {
        let config = FetchConfig {
            max_symbols: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_explicit_symbols_without_quotes() {
        let config = FetchConfig {
            quote_assets: Vec::new(),
            symbols: vec!["BTC/USDT".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
