//! Trade history fetch command
//!
//! Fetches aggregate trades for each selected symbol, buckets them into
//! fixed-width OHLCV bars and writes one CSV per symbol.
//!
//! Usage:
//! - Discovered symbols: `tradebars fetch`
//! - Explicit symbols: `tradebars fetch --symbol BTC/USDT --symbol ETH/USDT`
//! - Custom window: `tradebars fetch --start "2025-04-06 12:00:00" --end "2025-04-06 14:00:00"`

use crate::models::{parse_window_time, FetchConfig};
use crate::services::FetchPipeline;
use std::path::PathBuf;

/// Run the fetch command
///
/// # Arguments
/// * `start` - Window start, inclusive ("YYYY-MM-DD HH:MM:SS", UTC)
/// * `end` - Window end, exclusive (same format)
/// * `quotes` - Comma-separated quote assets for discovery
/// * `max_symbols` - Cap on symbols processed per run
/// * `bucket_ms` - Bar width in milliseconds
/// * `output_dir` - Directory receiving one CSV per symbol
/// * `symbols` - Explicit symbols; bypasses discovery when non-empty
pub fn run(
    start: String,
    end: String,
    quotes: String,
    max_symbols: usize,
    bucket_ms: i64,
    output_dir: PathBuf,
    symbols: Vec<String>,
) {
    let start_ms = match parse_window_time(&start) {
        Ok(ms) => ms,
        Err(e) => {
            eprintln!("❌ Invalid --start: {}", e);
            eprintln!("   Expected format: YYYY-MM-DD HH:MM:SS (UTC)");
            std::process::exit(1);
        }
    };

    let end_ms = match parse_window_time(&end) {
        Ok(ms) => ms,
        Err(e) => {
            eprintln!("❌ Invalid --end: {}", e);
            eprintln!("   Expected format: YYYY-MM-DD HH:MM:SS (UTC)");
            std::process::exit(1);
        }
    };

    let quote_assets: Vec<String> = quotes
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    let symbols: Vec<String> = symbols.into_iter().map(|s| s.to_uppercase()).collect();

    let config = FetchConfig {
        start_ms,
        end_ms,
        quote_assets,
        max_symbols,
        bucket_ms,
        output_dir,
        symbols,
    };

    // Create Tokio runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("❌ Failed to create async runtime: {}", e);
            std::process::exit(1);
        }
    };

    match runtime.block_on(async {
        let pipeline = FetchPipeline::new(config)?;
        pipeline.run().await
    }) {
        Ok(stats) => {
            if stats.failed.is_empty() {
                println!("\n✅ Fetch completed successfully!");
            } else {
                println!(
                    "\n⚠️  Fetch completed with {} failed symbol(s)",
                    stats.failed.len()
                );
            }
        }
        Err(e) => {
            eprintln!("\n❌ Fetch failed: {}", e);
            std::process::exit(1);
        }
    }
}
