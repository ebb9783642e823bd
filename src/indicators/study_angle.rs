use crate::error::{Result, SimError};
use crate::indicators::moving_average::check_length;

pub const DEFAULT_VALUE_PER_POINT: f64 = 1.0;

//slope over `length` bars expressed as an angle in degrees
//bars without a full look-back read 0
pub fn study_angle(series: &[f64], length: usize, value_per_point: f64) -> Result<Vec<f64>> {
    check_length(length)?;
    if !value_per_point.is_finite() || value_per_point <= 0.0 {
        return Err(SimError::invalid_parameter(
            "value_per_point",
            format!("must be positive, got {}", value_per_point),
        ));
    }

    let run = length as f64 * value_per_point;
    Ok(series
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            if i < length {
                0.0
            } else {
                ((value - series[i - length]) / run).atan().to_degrees()
            }
        })
        .collect())
}
