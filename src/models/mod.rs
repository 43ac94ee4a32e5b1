mod bar;
mod fetch_config;
mod trade;

pub use bar::Bar;
pub use fetch_config::{parse_window_time, FetchConfig};
pub use trade::Trade;
