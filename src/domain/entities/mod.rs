pub mod diary_asset;
pub mod market_asset;
pub mod session;
pub mod trading_log;
