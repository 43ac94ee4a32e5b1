//! Symbol discovery command
//!
//! Lists the tradable symbols a fetch run would cover for a set of quote
//! assets, without fetching any trades.
//!
//! Usage:
//! - Default quotes: `tradebars symbols`
//! - Custom quotes: `tradebars symbols --quotes USDT,EUR`
//! - Full listing: `tradebars symbols --limit 10000`

use crate::services::BinanceClient;

/// Run the symbols command
///
/// # Arguments
/// * `quotes` - Comma-separated quote assets
/// * `limit` - Print at most this many symbols; defaults to the fetch cap
pub fn run(quotes: String, limit: usize) {
    let quote_assets: Vec<String> = quotes
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if quote_assets.is_empty() {
        eprintln!("❌ No quote assets given");
        std::process::exit(1);
    }

    // Create Tokio runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("❌ Failed to create async runtime: {}", e);
            std::process::exit(1);
        }
    };

    match runtime.block_on(async {
        let client = BinanceClient::new()?;
        let server_time = client.server_time().await?;
        println!("🔌 Connected to Binance (server time {})\n", server_time);
        client.discover_symbols(&quote_assets).await
    }) {
        Ok(symbols) => {
            let total = symbols.len();
            let shown = limit.min(total);

            for symbol in &symbols[..shown] {
                println!("{}", symbol);
            }
            if shown < total {
                println!("... and {} more", total - shown);
            }
            println!(
                "\n📊 {} tradable symbol(s) for quotes {}",
                total,
                quote_assets.join(", ")
            );
        }
        Err(e) => {
            eprintln!("❌ Failed to list symbols: {}", e);
            std::process::exit(1);
        }
    }
}
