use chrono::{DateTime, Utc};

/// One fixed-width OHLCV bar
///
/// `timegroup` is the bucket start in milliseconds since the Unix epoch and is
/// always a multiple of the configured bucket width. Volume is the sum of the
/// base-asset amounts traded inside the bucket, so it stays zero for gap-filled
/// bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Bucket start in milliseconds since the Unix epoch
    pub timegroup: i64,

    /// Opening price
    pub open: f64,

    /// Highest price
    pub high: f64,

    /// Lowest price
    pub low: f64,

    /// Closing price
    pub close: f64,

    /// Sum of traded amounts
    pub volume: f64,
}

impl Bar {
    /// Create a new bar
    pub fn new(timegroup: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timegroup,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Bucket start as a UTC datetime, `None` if the timestamp is out of range
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timegroup)
    }
}
