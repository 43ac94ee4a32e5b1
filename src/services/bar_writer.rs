//! CSV output, one file per symbol

use crate::constants::CSV_DATETIME_FORMAT;
use crate::error::{Error, Result};
use crate::models::Bar;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Make a symbol safe to use as a file name
pub fn sanitize_symbol(symbol: &str) -> String {
    symbol.replace('/', "_")
}

/// Write bars to `<output_dir>/<sanitized symbol>.csv`
///
/// Returns the written path, or `None` when there are no bars to write.
/// An existing file for the symbol is replaced.
pub fn write_bars(symbol: &str, bars: &[Bar], output_dir: &Path) -> Result<Option<PathBuf>> {
    if bars.is_empty() {
        warn!("{}: no bars to write, skipping", symbol);
        return Ok(None);
    }

    fs::create_dir_all(output_dir).map_err(|e| {
        Error::Io(format!(
            "Failed to create output directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    let path = output_dir.join(format!("{}.csv", sanitize_symbol(symbol)));

    let mut writer = csv::Writer::from_path(&path)
        .map_err(|e| Error::Io(format!("Failed to create CSV file {}: {}", path.display(), e)))?;

    writer
        .write_record(["datetime", "open", "high", "low", "close", "volume"])
        .map_err(|e| Error::Io(format!("Failed to write CSV header: {}", e)))?;

    for bar in bars {
        let datetime = bar
            .datetime()
            .ok_or_else(|| {
                Error::InvalidInput(format!("Bar timestamp {} out of range", bar.timegroup))
            })?
            .format(CSV_DATETIME_FORMAT)
            .to_string();

        writer
            .write_record(&[
                datetime,
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
                bar.volume.to_string(),
            ])
            .map_err(|e| Error::Io(format!("Failed to write CSV row: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| Error::Io(format!("Failed to flush CSV file {}: {}", path.display(), e)))?;

    info!("{}: wrote {} bars to {}", symbol, bars.len(), path.display());

    Ok(Some(path))
}
