pub mod trading_hours;

pub use trading_hours::TradingHours;
