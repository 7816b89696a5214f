pub mod asset_registry;
pub mod generation;
pub mod trading_log_feed;
pub mod trading_log_viewer;
