//! Fetch Binance trade history and aggregate it into fixed-interval OHLCV
//! CSV files.
//!
//! A run has four stages: discover tradable symbols for a set of quote
//! assets, page backwards through each symbol's aggregate trades inside a
//! time window, bucket the trades into fixed-width bars, and write one CSV
//! per symbol.

pub mod cli;
pub mod commands;
pub mod constants;
pub mod error;
pub mod models;
pub mod services;
