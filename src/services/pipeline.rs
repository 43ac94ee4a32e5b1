//! Sequential fetch pipeline
//!
//! Discovers symbols, then walks them one at a time: fetch the trade window,
//! aggregate into bars, write the CSV. One symbol failing never stops the
//! run; failures are collected and reported in the summary.

use crate::constants::{REQUEST_PACING_MS, WINDOW_TIME_FORMAT};
use crate::error::{Error, Result};
use crate::models::FetchConfig;
use crate::services::bar_aggregator::BarAggregator;
use crate::services::bar_writer;
use crate::services::binance::BinanceClient;
use crate::services::trade_fetcher::TradeFetcher;
use chrono::DateTime;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::info;

/// Outcome counts for one pipeline run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunStats {
    /// Symbols attempted
    pub processed: usize,
    /// Symbols with a CSV written
    pub saved: usize,
    /// Symbols skipped for lack of trades
    pub skipped: usize,
    /// Symbols that errored
    pub failed: Vec<String>,
}

/// End-to-end run over a configured symbol set
pub struct FetchPipeline {
    config: FetchConfig,
    fetcher: TradeFetcher,
}

impl FetchPipeline {
    pub fn new(config: FetchConfig) -> Result<Self> {
        config.validate()?;
        let client = BinanceClient::new()?;

        Ok(Self {
            config,
            fetcher: TradeFetcher::new(client),
        })
    }

    /// Run the pipeline over every resolved symbol
    pub async fn run(&self) -> Result<RunStats> {
        let started = Instant::now();

        let symbols = self.resolve_symbols().await?;
        let total = symbols.len();

        println!(
            "🕐 Window: {} to {} UTC ({:.1} minutes, {}ms bars)",
            format_ms(self.config.start_ms),
            format_ms(self.config.end_ms),
            self.config.window_ms() as f64 / 60_000.0,
            self.config.bucket_ms
        );
        println!("📂 Output directory: {}", self.config.output_dir.display());
        println!("🚀 Fetching {} symbols sequentially...\n", total);

        let mut stats = RunStats::default();

        for (i, symbol) in symbols.iter().enumerate() {
            println!("[{}/{}] Fetching {}...", i + 1, total, symbol);
            stats.processed += 1;

            match self.process_symbol(symbol).await {
                Ok(Some(bar_count)) => {
                    println!("✅ {}: {} bars saved", symbol, bar_count);
                    stats.saved += 1;
                }
                Ok(None) => {
                    stats.skipped += 1;
                }
                Err(e) => {
                    eprintln!("❌ {}: {}", symbol, e);
                    stats.failed.push(symbol.clone());
                }
            }

            // Pace between symbols, not after the last one
            if i < total - 1 {
                sleep(Duration::from_millis(REQUEST_PACING_MS)).await;
            }
        }

        Self::print_summary(&stats, started);

        Ok(stats)
    }

    /// Decide which symbols this run covers
    ///
    /// An explicit symbol list wins; otherwise discovery filters the
    /// exchange listing by the configured quote assets. Either way the list
    /// is capped at `max_symbols`. The server time call doubles as a
    /// connectivity check and aborts the run if the API is unreachable.
    async fn resolve_symbols(&self) -> Result<Vec<String>> {
        let client = self.fetcher.client();

        let server_time = client.server_time().await?;
        println!("🔌 Connected to Binance (server time {})", server_time);

        let mut symbols = if self.config.symbols.is_empty() {
            client.discover_symbols(&self.config.quote_assets).await?
        } else {
            self.config.symbols.clone()
        };

        if symbols.is_empty() {
            return Err(Error::NotFound(format!(
                "No tradable symbols for quote assets {:?}",
                self.config.quote_assets
            )));
        }

        if symbols.len() > self.config.max_symbols {
            info!(
                "Limiting run to first {} of {} symbols",
                self.config.max_symbols,
                symbols.len()
            );
            symbols.truncate(self.config.max_symbols);
        }

        Ok(symbols)
    }

    /// Fetch, aggregate and write one symbol
    ///
    /// Returns the number of bars written, or `None` when the window held no
    /// trades for this symbol.
    async fn process_symbol(&self, symbol: &str) -> Result<Option<usize>> {
        let trades = self
            .fetcher
            .fetch_window(symbol, self.config.start_ms, self.config.end_ms)
            .await?;

        if trades.is_empty() {
            println!("⚠️  {}: no trades in window, skipping", symbol);
            return Ok(None);
        }

        info!("{}: {} trades in window", symbol, trades.len());

        let bars = BarAggregator::aggregate(trades, self.config.bucket_ms);
        let bar_count = bars.len();

        match bar_writer::write_bars(symbol, &bars, &self.config.output_dir)? {
            Some(_) => Ok(Some(bar_count)),
            None => Ok(None),
        }
    }

    fn print_summary(stats: &RunStats, started: Instant) {
        println!("\n{}", "=".repeat(70));
        println!("📊 FETCH SUMMARY");
        println!("{}", "=".repeat(70));
        println!("📦 Processed: {}", stats.processed);
        println!("✅ Saved: {}", stats.saved);
        println!("⚠️  Skipped (no trades): {}", stats.skipped);
        println!("❌ Failed: {}", stats.failed.len());
        if !stats.failed.is_empty() {
            println!("   Failed symbols: {}", stats.failed.join(", "));
        }
        println!(
            "⏱️  Total time: {:.2} minutes",
            started.elapsed().as_secs_f64() / 60.0
        );
        println!("{}", "=".repeat(70));
    }
}

fn format_ms(ms: i64) -> String {
    match DateTime::from_timestamp_millis(ms) {
        Some(dt) => dt.format(WINDOW_TIME_FORMAT).to_string(),
        None => ms.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_stats_default() {
        let stats = RunStats::default();

        assert_eq!(stats.processed, 0);
        assert_eq!(stats.saved, 0);
        assert_eq!(stats.skipped, 0);
        assert!(stats.failed.is_empty());
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(1_743_940_800_000), "2025-04-06 12:00:00");
        assert_eq!(format_ms(0), "1970-01-01 00:00:00");
    }

    #[test]
    fn test_format_ms_out_of_range() {
        assert_eq!(format_ms(i64::MAX), i64::MAX.to_string());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_pipeline_single_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let now = chrono::Utc::now().timestamp_millis();

        // A short recent window keeps this to a handful of pages
        let config = FetchConfig {
            start_ms: now - 30_000,
            end_ms: now,
            symbols: vec!["BTC/USDT".to_string()],
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let pipeline = FetchPipeline::new(config).unwrap();
        let stats = pipeline.run().await.unwrap();

        assert_eq!(stats.processed, 1);
        assert_eq!(stats.saved, 1);
        assert!(stats.failed.is_empty());
        assert!(dir.path().join("BTC_USDT.csv").exists());
    }
}
