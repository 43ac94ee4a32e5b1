/// A single executed trade
///
/// Ephemeral record produced by the trade fetcher and consumed by the
/// bar aggregator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trade {
    /// Execution time in milliseconds since the Unix epoch
    pub timestamp: i64,

    /// Execution price
    pub price: f64,

    /// Executed base-asset quantity
    pub amount: f64,
}

impl Trade {
    /// Create a new trade record
    pub fn new(timestamp: i64, price: f64, amount: f64) -> Self {
        Self {
            timestamp,
            price,
            amount,
        }
    }
}
