pub mod bar;
pub mod loader;

pub use bar::{candles, candles_from_columns, column, Bar, Candle, PriceField};
pub use loader::{load_sierra_csv, read_sierra_csv, LoadError};
