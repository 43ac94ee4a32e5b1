//! Backward pagination over aggregated trade history
//!
//! Binance caps a trade page at 1000 rows, so a window is assembled by
//! walking backwards from the end: each page is requested with `endTime`
//! set just below the earliest row seen so far, until the window start is
//! reached or history runs out.

use crate::constants::{REQUEST_PACING_MS, TRADE_PAGE_LIMIT};
use crate::error::Result;
use crate::models::Trade;
use crate::services::binance::{to_api_symbol, BinanceClient};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Collects all trades for a symbol inside a half-open time window
pub struct TradeFetcher {
    client: BinanceClient,
}

impl TradeFetcher {
    pub fn new(client: BinanceClient) -> Self {
        Self { client }
    }

    /// Shared API client, for the calls that sit outside pagination
    pub fn client(&self) -> &BinanceClient {
        &self.client
    }

    /// Fetch every trade with `start_ms <= timestamp < end_ms`, oldest first
    ///
    /// Pagination walks backwards one page at a time. A page that still
    /// fails after retries ends the walk early with a warning; the trades
    /// accumulated so far are returned rather than thrown away.
    pub async fn fetch_window(
        &self,
        symbol: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Trade>> {
        let api_symbol = to_api_symbol(symbol);
        let mut all_trades: Vec<Trade> = Vec::new();
        // endTime is inclusive on the API side, so start just below end_ms
        let mut cursor = end_ms - 1;
        let mut page = 1u32;

        loop {
            let batch = match self
                .client
                .agg_trades(&api_symbol, cursor, TRADE_PAGE_LIMIT)
                .await
            {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(
                        "{}: giving up pagination after page {} failed: {}",
                        symbol, page, e
                    );
                    break;
                }
            };

            if batch.is_empty() {
                debug!("{}: no more trades before {}", symbol, cursor);
                break;
            }

            let earliest = batch[0].timestamp;
            let newest = batch[batch.len() - 1].timestamp;
            let rows = batch.len();

            let step = absorb_page(batch, start_ms, end_ms, TRADE_PAGE_LIMIT, &mut all_trades);

            debug!(
                "{}: page {} covered {}..{} ({} rows, {} kept so far)",
                symbol,
                page,
                earliest,
                newest,
                rows,
                all_trades.len()
            );

            match step {
                PageStep::Continue(next_cursor) => {
                    cursor = next_cursor;
                    page += 1;
                    sleep(Duration::from_millis(REQUEST_PACING_MS)).await;
                }
                PageStep::Done => break,
            }
        }

        all_trades.sort_by_key(|t| t.timestamp);
        Ok(all_trades)
    }
}

/// Outcome of folding one raw page into the accumulated window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageStep {
    /// Request the next page ending at this timestamp
    Continue(i64),
    /// History is exhausted or the window start was reached
    Done,
}

/// Fold one raw page into `kept` and decide how the walk proceeds
///
/// Only trades with `start_ms <= timestamp < end_ms` are kept. The walk
/// stops on an empty page, a page shorter than `page_size` or a page whose
/// earliest row is at or before the window start; otherwise the next page
/// ends just below this page's earliest row.
fn absorb_page(
    page: Vec<Trade>,
    start_ms: i64,
    end_ms: i64,
    page_size: usize,
    kept: &mut Vec<Trade>,
) -> PageStep {
    if page.is_empty() {
        return PageStep::Done;
    }

    // Rows arrive oldest first
    let earliest = page[0].timestamp;
    let page_len = page.len();

    kept.extend(
        page.into_iter()
            .filter(|t| t.timestamp >= start_ms && t.timestamp < end_ms),
    );

    if page_len < page_size || earliest <= start_ms {
        return PageStep::Done;
    }

    PageStep::Continue(earliest - 1)
}
