//causal filters: every output position depends only on inputs at or before it

pub mod cci;
pub mod moving_average;
pub mod registry;
pub mod study_angle;
pub mod t3;

pub use cci::{cci, DEFAULT_CCI_MULTIPLIER};
pub use moving_average::{ema, ma, MovingAverage};
pub use registry::{apply_all, parse_params, IndicatorParams, IndicatorSpec, ParamValue};
pub use study_angle::{study_angle, DEFAULT_VALUE_PER_POINT};
pub use t3::{t3, DEFAULT_T3_MULTIPLIER};
