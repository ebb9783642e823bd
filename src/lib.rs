//a Rust-based trade outcome simulator and indicator engine for futures candle data

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod metrics;
pub mod session;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::SimulationConfig;
    pub use crate::data::{
        candles, candles_from_columns, column, load_sierra_csv, read_sierra_csv, Bar, Candle,
        LoadError, PriceField,
    };
    pub use crate::engine::{Direction, Simulator, TradeRequest, Trailing};
    pub use crate::error::SimError;
    pub use crate::indicators::{
        apply_all, cci, ema, ma, parse_params, study_angle, t3, IndicatorParams, IndicatorSpec,
        MovingAverage, ParamValue,
    };
    pub use crate::metrics::{drawdowns, equity_curve, max_drawdown, SummaryMetrics};
    pub use crate::session::TradingHours;
    pub use crate::strategy::{crossover_indices, outcomes_by_bar, EntryRule};
}
