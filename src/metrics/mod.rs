pub mod drawdown;
pub mod summary;

pub use drawdown::{drawdowns, equity_curve, max_drawdown};
pub use summary::SummaryMetrics;
