use crate::error::{Result, SimError};
use crate::indicators::moving_average::MovingAverage;

pub const DEFAULT_CCI_MULTIPLIER: f64 = 0.015;

//stand-in for a zero mean absolute deviation
const ZERO_DEVIATION: f64 = 1e-5;

//commodity channel index
//early bars use the partial window 0..=i scaled by i + 1
pub fn cci(
    series: &[f64],
    length: usize,
    moving_average: MovingAverage,
    multiplier: f64,
) -> Result<Vec<f64>> {
    if !multiplier.is_finite() || multiplier == 0.0 {
        return Err(SimError::invalid_parameter(
            "multiplier",
            format!("must be finite and non-zero, got {}", multiplier),
        ));
    }
    let averages = moving_average.apply(series, length)?;

    Ok(series
        .iter()
        .zip(&averages)
        .enumerate()
        .map(|(i, (&value, &average))| {
            let (start, scale) = if i < length {
                (0, i + 1)
            } else {
                (i + 1 - length, length)
            };

            let mut deviation: f64 = series[start..=i]
                .iter()
                .map(|&v| (average - v).abs())
                .sum();
            if deviation == 0.0 {
                deviation = ZERO_DEVIATION;
            }

            (value - average) / deviation * scale as f64 / multiplier
        })
        .collect())
}
