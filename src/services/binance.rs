//! Binance public REST client
//!
//! Covers the three endpoints the fetch pipeline needs: server time for the
//! connectivity check, exchange info for symbol discovery, and aggregated
//! trade pages. Trade pages are requested with `endTime` only, which avoids
//! the one hour span limit the API enforces on `startTime` + `endTime`
//! queries.

use crate::constants::{
    BINANCE_BASE_URL, HTTP_TIMEOUT_SECS, MAX_PAGE_RETRIES, RETRY_BASE_DELAY_SECS,
};
use crate::error::{Error, Result};
use crate::models::Trade;
use crate::services::retry::{with_retry, RetryPolicy};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct ServerTime {
    #[serde(rename = "serverTime")]
    server_time: i64,
}

#[derive(Debug, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    #[serde(rename = "baseAsset")]
    base_asset: String,
    #[serde(rename = "quoteAsset")]
    quote_asset: String,
    status: String,
}

/// One row of an aggTrades response; prices and quantities arrive as strings
#[derive(Debug, Deserialize)]
struct AggTrade {
    #[serde(rename = "p")]
    price: String,
    #[serde(rename = "q")]
    quantity: String,
    #[serde(rename = "T")]
    timestamp: i64,
}

impl AggTrade {
    fn to_trade(&self) -> Result<Trade> {
        let price = self
            .price
            .parse::<f64>()
            .map_err(|e| Error::Parse(format!("Invalid trade price '{}': {}", self.price, e)))?;
        let amount = self.quantity.parse::<f64>().map_err(|e| {
            Error::Parse(format!("Invalid trade quantity '{}': {}", self.quantity, e))
        })?;

        Ok(Trade::new(self.timestamp, price, amount))
    }
}

/// Strip the separator from a `BASE/QUOTE` symbol for use in request URLs
pub fn to_api_symbol(symbol: &str) -> String {
    symbol.replace('/', "")
}

fn select_symbols(symbols: &[SymbolInfo], quote_assets: &[String]) -> Vec<String> {
    let mut selected: Vec<String> = symbols
        .iter()
        .filter(|s| s.status == "TRADING" && quote_assets.contains(&s.quote_asset))
        .map(|s| format!("{}/{}", s.base_asset, s.quote_asset))
        .collect();
    selected.sort();
    selected
}

/// HTTP client for the Binance spot API
pub struct BinanceClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl BinanceClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: BINANCE_BASE_URL.to_string(),
            retry: RetryPolicy::new(MAX_PAGE_RETRIES, Duration::from_secs(RETRY_BASE_DELAY_SECS)),
        })
    }

    /// Current server time in epoch milliseconds
    ///
    /// Used as a connectivity check before a run starts fetching. Not
    /// retried; an unreachable API should abort the run immediately.
    pub async fn server_time(&self) -> Result<i64> {
        let url = format!("{}/api/v3/time", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to reach Binance: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Server time request failed with status {}",
                response.status()
            )));
        }

        let body: ServerTime = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Invalid server time response: {}", e)))?;

        Ok(body.server_time)
    }

    /// List tradable symbols whose quote asset is in `quote_assets`
    ///
    /// Only symbols with status `TRADING` are kept. Results are formatted as
    /// `BASE/QUOTE` and sorted alphabetically so runs are reproducible.
    pub async fn discover_symbols(&self, quote_assets: &[String]) -> Result<Vec<String>> {
        let url = format!("{}/api/v3/exchangeInfo", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to fetch exchange info: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Exchange info request failed with status {}",
                response.status()
            )));
        }

        let info: ExchangeInfo = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Invalid exchange info response: {}", e)))?;

        let symbols = select_symbols(&info.symbols, quote_assets);
        info!(
            "Discovered {} tradable symbols out of {} listed",
            symbols.len(),
            info.symbols.len()
        );

        Ok(symbols)
    }

    /// Fetch up to `limit` aggregated trades ending at or before `end_time`
    ///
    /// `api_symbol` must already be in API form (no separator). The page
    /// request is retried under the client's retry policy. Rows come back in
    /// the order Binance sends them, oldest first.
    pub async fn agg_trades(
        &self,
        api_symbol: &str,
        end_time: i64,
        limit: usize,
    ) -> Result<Vec<Trade>> {
        let url = format!(
            "{}/api/v3/aggTrades?symbol={}&endTime={}&limit={}",
            self.base_url, api_symbol, end_time, limit
        );
        let what = format!("aggTrades page for {}", api_symbol);

        with_retry(&self.retry, &what, || self.fetch_trade_page(&url)).await
    }

    async fn fetch_trade_page(&self, url: &str) -> Result<Vec<Trade>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Trade request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Network(format!(
                "Trade request failed with status {}",
                response.status()
            )));
        }

        let rows: Vec<AggTrade> = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Invalid trade response: {}", e)))?;

        debug!("Received {} trade rows", rows.len());

        rows.iter().map(AggTrade::to_trade).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotes(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_to_api_symbol() {
        assert_eq!(to_api_symbol("BTC/USDT"), "BTCUSDT");
        assert_eq!(to_api_symbol("ETH/BTC"), "ETHBTC");
        assert_eq!(to_api_symbol("BTCUSDT"), "BTCUSDT");
    }

    #[test]
    fn test_select_symbols_filters_and_sorts() {
        let listed = vec![
            SymbolInfo {
                base_asset: "ETH".to_string(),
                quote_asset: "USDT".to_string(),
                status: "TRADING".to_string(),
            },
            SymbolInfo {
                base_asset: "BTC".to_string(),
                quote_asset: "USDT".to_string(),
                status: "TRADING".to_string(),
            },
            SymbolInfo {
                base_asset: "LUNA".to_string(),
                quote_asset: "USDT".to_string(),
                status: "BREAK".to_string(),
            },
            SymbolInfo {
                base_asset: "BTC".to_string(),
                quote_asset: "EUR".to_string(),
                status: "TRADING".to_string(),
            },
        ];

        let selected = select_symbols(&listed, &quotes(&["USDT", "BTC"]));

        assert_eq!(selected, vec!["BTC/USDT", "ETH/USDT"]);
    }

    #[test]
    fn test_select_symbols_empty_quote_list() {
        let listed = vec![SymbolInfo {
            base_asset: "BTC".to_string(),
            quote_asset: "USDT".to_string(),
            status: "TRADING".to_string(),
        }];

        assert!(select_symbols(&listed, &[]).is_empty());
    }

    #[test]
    fn test_parse_agg_trades_response() {
        // Shape taken from the live endpoint; extra fields are ignored
        let body = r#"[
            {"a":26129,"p":"0.01633102","q":"4.70443515","f":27781,"l":27781,"T":1498793709153,"m":true,"M":true},
            {"a":26130,"p":"0.01633103","q":"1.00000000","f":27782,"l":27782,"T":1498793709154,"m":false,"M":true}
        ]"#;

        let rows: Vec<AggTrade> = serde_json::from_str(body).unwrap();
        let trades: Vec<Trade> = rows.iter().map(|r| r.to_trade().unwrap()).collect();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].timestamp, 1498793709153);
        assert!((trades[0].price - 0.01633102).abs() < 1e-12);
        assert!((trades[0].amount - 4.70443515).abs() < 1e-12);
        assert_eq!(trades[1].timestamp, 1498793709154);
    }

    #[test]
    fn test_parse_agg_trade_bad_price() {
        let row = AggTrade {
            price: "not-a-number".to_string(),
            quantity: "1.0".to_string(),
            timestamp: 1_700_000_000_000,
        };

        assert!(row.to_trade().is_err());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_server_time() {
        let client = BinanceClient::new().unwrap();
        let time = client.server_time().await.unwrap();

        // Sanity bound: well past 2020
        assert!(time > 1_577_836_800_000);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_discover_symbols() {
        let client = BinanceClient::new().unwrap();
        let symbols = client.discover_symbols(&quotes(&["USDT"])).await.unwrap();

        assert!(!symbols.is_empty());
        assert!(symbols.contains(&"BTC/USDT".to_string()));
        assert!(symbols.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_agg_trades_page() {
        let client = BinanceClient::new().unwrap();
        let end = client.server_time().await.unwrap();
        let trades = client.agg_trades("BTCUSDT", end, 10).await.unwrap();

        assert!(!trades.is_empty());
        assert!(trades.len() <= 10);
        assert!(trades.iter().all(|t| t.price > 0.0 && t.amount > 0.0));
    }
}
