pub mod add_trading_log;
pub mod asset_draft;
pub mod sign_in;
pub mod sign_up;
