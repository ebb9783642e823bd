use crate::error::{Result, SimError};
use crate::indicators::moving_average::MovingAverage;

pub const DEFAULT_T3_MULTIPLIER: f64 = 0.84;

const PASSES: usize = 6;

//tillson t3: six cascaded averages blended by the volume factor `multiplier`
pub fn t3(
    series: &[f64],
    length: usize,
    moving_average: MovingAverage,
    multiplier: f64,
) -> Result<Vec<f64>> {
    if !multiplier.is_finite() {
        return Err(SimError::invalid_parameter(
            "multiplier",
            format!("must be finite, got {}", multiplier),
        ));
    }

    let mut passes: Vec<Vec<f64>> = Vec::with_capacity(PASSES);
    let mut current = moving_average.apply(series, length)?;
    for _ in 1..PASSES {
        let next = moving_average.apply(&current, length)?;
        passes.push(current);
        current = next;
    }
    passes.push(current);

    let m = multiplier;
    let c6 = -m.powi(3);
    let c5 = 3.0 * m * m * (1.0 + m);
    let c4 = -3.0 * m * (1.0 + m).powi(2);
    let c3 = (1.0 + m).powi(3);

    Ok((0..series.len())
        .map(|i| c6 * passes[5][i] + c5 * passes[4][i] + c4 * passes[3][i] + c3 * passes[2][i])
        .collect())
}
