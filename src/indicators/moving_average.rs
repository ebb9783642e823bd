use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

//pluggable average used by cci and t3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovingAverage {
    #[serde(rename = "ma")]
    Simple,
    #[serde(rename = "ema")]
    Exponential,
}

impl MovingAverage {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ma" | "sma" | "simple" => Some(MovingAverage::Simple),
            "ema" | "exponential" => Some(MovingAverage::Exponential),
            _ => None,
        }
    }

    pub fn apply(&self, series: &[f64], length: usize) -> Result<Vec<f64>> {
        match self {
            MovingAverage::Simple => ma(series, length),
            MovingAverage::Exponential => ema(series, length),
        }
    }
}

pub(crate) fn check_length(length: usize) -> Result<()> {
    if length == 0 {
        return Err(SimError::invalid_parameter(
            "length",
            "must be a positive integer",
        ));
    }
    Ok(())
}

//running mean; the first `length` values average the partial window
pub fn ma(series: &[f64], length: usize) -> Result<Vec<f64>> {
    check_length(length)?;

    let mut result = Vec::with_capacity(series.len());
    let mut rolling_sum = 0.0;
    for (i, &value) in series.iter().enumerate() {
        if i < length {
            rolling_sum += value;
            result.push(rolling_sum / (i + 1) as f64);
        } else {
            rolling_sum = rolling_sum + value - series[i - length];
            result.push(rolling_sum / length as f64);
        }
    }
    Ok(result)
}

//exponential filter seeded with the first value
//bars before length - 1 use the adaptive constant 2 / (i + 2)
pub fn ema(series: &[f64], length: usize) -> Result<Vec<f64>> {
    check_length(length)?;

    let smoothing = 2.0 / (length as f64 + 1.0);
    let mut result: Vec<f64> = Vec::with_capacity(series.len());
    for (i, &value) in series.iter().enumerate() {
        if i == 0 {
            result.push(value);
            continue;
        }

        let alpha = if i + 1 < length {
            2.0 / (i as f64 + 2.0)
        } else {
            smoothing
        };

        //a zero output restarts the recursion from the previous input
        let previous = if result[i - 1] == 0.0 {
            series[i - 1]
        } else {
            result[i - 1]
        };
        result.push(alpha * value + (1.0 - alpha) * previous);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_series_eq(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(*a, *e, epsilon = 1e-9);
        }
    }

    #[test]
    fn ma_partial_then_rolling_window() {
        let result = ma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_series_eq(&result, &[1.0, 1.5, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn ma_length_one_is_identity() {
        let input = [3.5, -1.25, 7.0, 0.1, 2.2];
        assert_series_eq(&ma(&input, 1).unwrap(), &input);
    }

    #[test]
    fn ma_longer_than_series() {
        let result = ma(&[2.0, 4.0], 10).unwrap();
        assert_series_eq(&result, &[2.0, 3.0]);
    }

    #[test]
    fn ema_adaptive_warmup() {
        let result = ema(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        let e1 = 2.0 / 3.0 * 2.0 + 1.0 / 3.0 * 1.0;
        let e2 = 0.5 * 3.0 + 0.5 * e1;
        let e3 = 0.5 * 4.0 + 0.5 * e2;
        let e4 = 0.5 * 5.0 + 0.5 * e3;
        assert_series_eq(&result, &[1.0, e1, e2, e3, e4]);
    }

    #[test]
    fn ema_warmup_differs_from_fixed_constant() {
        let result = ema(&[10.0, 20.0, 30.0], 5).unwrap();
        //i = 1 uses 2/3, not 2/6
        assert_relative_eq!(result[1], 10.0 / 3.0 + 40.0 / 3.0, epsilon = 1e-9);
        //i = 2 uses 1/2
        assert_relative_eq!(result[2], 15.0 + result[1] / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn ema_restarts_from_input_after_zero() {
        let result = ema(&[4.0, 4.0, -4.0, 10.0], 3).unwrap();
        assert_series_eq(&result, &[4.0, 4.0, 0.0, 3.0]);
    }

    #[test]
    fn ema_length_one_is_identity() {
        let input = [3.5, -1.25, 7.0, 0.1, 2.2];
        assert_series_eq(&ema(&input, 1).unwrap(), &input);
    }

    #[test]
    fn zero_length_is_rejected() {
        assert!(matches!(
            ma(&[1.0], 0),
            Err(SimError::InvalidParameter { .. })
        ));
        assert!(matches!(
            ema(&[1.0], 0),
            Err(SimError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn empty_series_yields_empty_output() {
        assert!(ma(&[], 3).unwrap().is_empty());
        assert!(ema(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn moving_average_dispatch() {
        let input = [1.0, 2.0, 3.0];
        assert_eq!(
            MovingAverage::Simple.apply(&input, 2).unwrap(),
            ma(&input, 2).unwrap()
        );
        assert_eq!(
            MovingAverage::Exponential.apply(&input, 2).unwrap(),
            ema(&input, 2).unwrap()
        );
        assert_eq!(MovingAverage::parse("EMA"), Some(MovingAverage::Exponential));
        assert_eq!(MovingAverage::parse("wma"), None);
    }
}
