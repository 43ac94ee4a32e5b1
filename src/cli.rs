use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::constants::{
    DEFAULT_BUCKET_MS, DEFAULT_END, DEFAULT_MAX_SYMBOLS, DEFAULT_OUTPUT_DIR,
    DEFAULT_QUOTE_ASSETS, DEFAULT_START,
};

#[derive(Parser)]
#[command(name = "tradebars")]
#[command(about = "Fetch Binance trade history into OHLCV bar CSVs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch trades and write one OHLCV CSV per symbol
    Fetch {
        /// Window start, inclusive (UTC, "YYYY-MM-DD HH:MM:SS")
        #[arg(long, default_value = DEFAULT_START)]
        start: String,

        /// Window end, exclusive (UTC, "YYYY-MM-DD HH:MM:SS")
        #[arg(long, default_value = DEFAULT_END)]
        end: String,

        /// Comma-separated quote assets used for symbol discovery
        #[arg(long, default_value_t = DEFAULT_QUOTE_ASSETS.join(","))]
        quotes: String,

        /// Maximum number of symbols to process
        #[arg(long, default_value_t = DEFAULT_MAX_SYMBOLS)]
        max_symbols: usize,

        /// Bar width in milliseconds
        #[arg(long, default_value_t = DEFAULT_BUCKET_MS)]
        bucket_ms: i64,

        /// Directory receiving the CSV files
        #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Fetch this "BASE/QUOTE" symbol instead of discovering (repeatable)
        #[arg(long = "symbol")]
        symbols: Vec<String>,
    },
    /// List the tradable symbols discovery would select
    Symbols {
        /// Comma-separated quote assets
        #[arg(long, default_value_t = DEFAULT_QUOTE_ASSETS.join(","))]
        quotes: String,

        /// Show at most this many symbols
        #[arg(long, default_value_t = DEFAULT_MAX_SYMBOLS)]
        limit: usize,
    },
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            start,
            end,
            quotes,
            max_symbols,
            bucket_ms,
            output_dir,
            symbols,
        } => {
            commands::fetch::run(
                start,
                end,
                quotes,
                max_symbols,
                bucket_ms,
                output_dir,
                symbols,
            );
        }
        Commands::Symbols { quotes, limit } => {
            commands::symbols::run(quotes, limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::try_parse_from(["tradebars", "fetch"]).unwrap();

        match cli.command {
            Commands::Fetch {
                start,
                end,
                quotes,
                max_symbols,
                bucket_ms,
                output_dir,
                symbols,
            } => {
                assert_eq!(start, DEFAULT_START);
                assert_eq!(end, DEFAULT_END);
                assert_eq!(quotes, "USDT,BTC,ETH");
                assert_eq!(max_symbols, DEFAULT_MAX_SYMBOLS);
                assert_eq!(bucket_ms, DEFAULT_BUCKET_MS);
                assert_eq!(output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
                assert!(symbols.is_empty());
            }
            _ => panic!("Expected fetch command"),
        }
    }

    #[test]
    fn test_cli_parses_repeated_symbols() {
        let cli = Cli::try_parse_from([
            "tradebars",
            "fetch",
            "--symbol",
            "BTC/USDT",
            "--symbol",
            "ETH/USDT",
        ])
        .unwrap();

        match cli.command {
            Commands::Fetch { symbols, .. } => {
                assert_eq!(symbols, vec!["BTC/USDT", "ETH/USDT"]);
            }
            _ => panic!("Expected fetch command"),
        }
    }

    #[test]
    fn test_cli_symbols_default_limit_matches_fetch_cap() {
        let cli = Cli::try_parse_from(["tradebars", "symbols"]).unwrap();

        match cli.command {
            Commands::Symbols { limit, .. } => assert_eq!(limit, DEFAULT_MAX_SYMBOLS),
            _ => panic!("Expected symbols command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["tradebars", "fetch", "--bogus"]).is_err());
    }
}
