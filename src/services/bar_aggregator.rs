use crate::models::{Bar, Trade};
use std::collections::HashMap;
use tracing::debug;

/// Service for aggregating raw trades into fixed-width OHLCV bars
pub struct BarAggregator;

impl BarAggregator {
    /// Aggregate trades into contiguous OHLCV bars
    ///
    /// # Arguments
    /// * `trades` - Raw trades, in any order
    /// * `bucket_ms` - Bar width in milliseconds
    ///
    /// # Returns
    /// One bar per bucket from the earliest occupied bucket to the latest,
    /// sorted by time. A bucket without trades becomes a flat bar: open,
    /// high, low and close all equal the previous bar's close, volume zero.
    pub fn aggregate(trades: Vec<Trade>, bucket_ms: i64) -> Vec<Bar> {
        if trades.is_empty() {
            return vec![];
        }

        if bucket_ms <= 0 {
            debug!("Invalid bucket width: {}ms", bucket_ms);
            return vec![];
        }

        debug!(
            "Aggregating {} trades into {}ms buckets",
            trades.len(),
            bucket_ms
        );

        // Group trades by bucket start time
        let mut buckets = Self::group_by_bucket(trades, bucket_ms);

        // Keys exist because trades is non-empty
        let min_key = buckets.keys().min().copied().unwrap_or(0);
        let max_key = buckets.keys().max().copied().unwrap_or(0);

        // Walk every bucket between the first and last occupied one, filling
        // quiet buckets from the previous close. The first bucket is always
        // occupied, so the range never starts with a gap.
        let mut bars: Vec<Bar> = Vec::new();
        let mut key = min_key;
        loop {
            match buckets.remove(&key) {
                Some(bucket) => bars.push(Self::aggregate_bucket(bucket, key)),
                None => {
                    if let Some(prev) = bars.last() {
                        let close = prev.close;
                        bars.push(Bar::new(key, close, close, close, close, 0.0));
                    }
                }
            }

            if key >= max_key {
                break;
            }
            key += bucket_ms;
        }

        debug!("Aggregated into {} bars", bars.len());
        bars
    }

    /// Group trades by bucket start time
    fn group_by_bucket(trades: Vec<Trade>, bucket_ms: i64) -> HashMap<i64, Vec<Trade>> {
        let mut buckets: HashMap<i64, Vec<Trade>> = HashMap::new();

        for trade in trades {
            let key = Self::bucket_key(trade.timestamp, bucket_ms);
            buckets.entry(key).or_default().push(trade);
        }

        buckets
    }

    /// Calculate bucket start time (rounded down to the nearest boundary)
    ///
    /// Euclidean division keeps pre-epoch timestamps rounding towards
    /// negative infinity instead of towards zero.
    fn bucket_key(timestamp: i64, bucket_ms: i64) -> i64 {
        timestamp.div_euclid(bucket_ms) * bucket_ms
    }

    /// Aggregate OHLCV for one occupied bucket
    ///
    /// # Arguments
    /// * `trades` - Trades falling inside the bucket (never empty)
    /// * `bucket_time` - Start time of the bucket
    ///
    /// # Returns
    /// A bar with:
    /// - open = first trade's price
    /// - high = maximum price
    /// - low = minimum price
    /// - close = last trade's price
    /// - volume = sum of amounts
    fn aggregate_bucket(mut trades: Vec<Trade>, bucket_time: i64) -> Bar {
        // Stable sort, so trades sharing a timestamp keep arrival order
        trades.sort_by_key(|t| t.timestamp);

        let first = &trades[0];
        let last = &trades[trades.len() - 1];

        let open = first.price;
        let close = last.price;
        let high = trades
            .iter()
            .map(|t| t.price)
            .fold(f64::NEG_INFINITY, f64::max);
        let low = trades.iter().map(|t| t.price).fold(f64::INFINITY, f64::min);
        let volume = trades.iter().map(|t| t.amount).sum();

        Bar::new(bucket_time, open, high, low, close, volume)
    }
}
