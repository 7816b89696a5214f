pub mod price;
pub mod profit_rate;
