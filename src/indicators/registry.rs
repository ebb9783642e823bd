use crate::error::{Result, SimError};
use crate::indicators::cci::{cci, DEFAULT_CCI_MULTIPLIER};
use crate::indicators::moving_average::{ema, ma, MovingAverage};
use crate::indicators::study_angle::{study_angle, DEFAULT_VALUE_PER_POINT};
use crate::indicators::t3::{t3, DEFAULT_T3_MULTIPLIER};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

//loosely typed indicator argument, as given on the command line or in json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    //reads a command line value as the narrowest type that fits
    pub fn infer(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(value) = raw.parse::<i64>() {
            ParamValue::Int(value)
        } else if let Ok(value) = raw.parse::<f64>() {
            ParamValue::Float(value)
        } else {
            ParamValue::Text(raw.to_string())
        }
    }
}

pub type IndicatorParams = IndexMap<String, ParamValue>;

//parses `key=value` pairs into indicator params
pub fn parse_params<S: AsRef<str>>(pairs: &[S]) -> Result<IndicatorParams> {
    let mut params = IndicatorParams::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            SimError::invalid_parameter(pair, "expected key=value")
        })?;
        params.insert(key.trim().to_lowercase(), ParamValue::infer(value));
    }
    Ok(params)
}

fn default_value_per_point() -> f64 {
    DEFAULT_VALUE_PER_POINT
}

fn default_cci_average() -> MovingAverage {
    MovingAverage::Simple
}

fn default_cci_multiplier() -> f64 {
    DEFAULT_CCI_MULTIPLIER
}

fn default_t3_average() -> MovingAverage {
    MovingAverage::Exponential
}

fn default_t3_multiplier() -> f64 {
    DEFAULT_T3_MULTIPLIER
}

//a fully parameterised indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorSpec {
    Ma {
        length: usize,
    },
    Ema {
        length: usize,
    },
    StudyAngle {
        length: usize,
        #[serde(default = "default_value_per_point")]
        value_per_point: f64,
    },
    Cci {
        length: usize,
        #[serde(default = "default_cci_average")]
        moving_average: MovingAverage,
        #[serde(default = "default_cci_multiplier")]
        multiplier: f64,
    },
    T3 {
        length: usize,
        #[serde(default = "default_t3_average")]
        moving_average: MovingAverage,
        #[serde(default = "default_t3_multiplier")]
        multiplier: f64,
    },
}

impl IndicatorSpec {
    //resolves an indicator by name, filling per-indicator defaults
    pub fn from_params(name: &str, params: &IndicatorParams) -> Result<Self> {
        let spec = match name.trim().to_lowercase().as_str() {
            "ma" => IndicatorSpec::Ma {
                length: required_length(params)?,
            },
            "ema" => IndicatorSpec::Ema {
                length: required_length(params)?,
            },
            "study angle" | "study_angle" => IndicatorSpec::StudyAngle {
                length: required_length(params)?,
                value_per_point: number(params, "value_per_point", DEFAULT_VALUE_PER_POINT)?,
            },
            "cci" => IndicatorSpec::Cci {
                length: required_length(params)?,
                moving_average: average(params, MovingAverage::Simple)?,
                multiplier: number(params, "multiplier", DEFAULT_CCI_MULTIPLIER)?,
            },
            "t3" => IndicatorSpec::T3 {
                length: required_length(params)?,
                moving_average: average(params, MovingAverage::Exponential)?,
                multiplier: number(params, "multiplier", DEFAULT_T3_MULTIPLIER)?,
            },
            _ => return Err(SimError::UnknownIndicator(name.to_string())),
        };

        debug!(indicator = spec.name(), "resolved indicator");
        Ok(spec)
    }

    pub fn name(&self) -> &'static str {
        match self {
            IndicatorSpec::Ma { .. } => "ma",
            IndicatorSpec::Ema { .. } => "ema",
            IndicatorSpec::StudyAngle { .. } => "study angle",
            IndicatorSpec::Cci { .. } => "cci",
            IndicatorSpec::T3 { .. } => "t3",
        }
    }

    pub fn apply(&self, series: &[f64]) -> Result<Vec<f64>> {
        match *self {
            IndicatorSpec::Ma { length } => ma(series, length),
            IndicatorSpec::Ema { length } => ema(series, length),
            IndicatorSpec::StudyAngle {
                length,
                value_per_point,
            } => study_angle(series, length, value_per_point),
            IndicatorSpec::Cci {
                length,
                moving_average,
                multiplier,
            } => cci(series, length, moving_average, multiplier),
            IndicatorSpec::T3 {
                length,
                moving_average,
                multiplier,
            } => t3(series, length, moving_average, multiplier),
        }
    }
}

//evaluates independent indicators over one series on the rayon pool
pub fn apply_all(specs: &[IndicatorSpec], series: &[f64]) -> Result<Vec<Vec<f64>>> {
    specs.par_iter().map(|spec| spec.apply(series)).collect()
}

fn required_length(params: &IndicatorParams) -> Result<usize> {
    match params.get("length") {
        None => Err(SimError::MissingParameter("length".to_string())),
        Some(ParamValue::Int(length)) if *length > 0 => Ok(*length as usize),
        Some(ParamValue::Int(length)) => Err(SimError::invalid_parameter(
            "length",
            format!("must be a positive integer, got {}", length),
        )),
        Some(other) => Err(SimError::invalid_parameter(
            "length",
            format!("must be an integer, got {:?}", other),
        )),
    }
}

fn number(params: &IndicatorParams, key: &str, default: f64) -> Result<f64> {
    match params.get(key) {
        None => Ok(default),
        Some(ParamValue::Int(value)) => Ok(*value as f64),
        Some(ParamValue::Float(value)) => Ok(*value),
        Some(ParamValue::Text(value)) => Err(SimError::invalid_parameter(
            key,
            format!("must be a number, got '{}'", value),
        )),
    }
}

fn average(params: &IndicatorParams, default: MovingAverage) -> Result<MovingAverage> {
    match params.get("moving_average") {
        None => Ok(default),
        Some(ParamValue::Text(name)) => MovingAverage::parse(name).ok_or_else(|| {
            SimError::invalid_parameter(
                "moving_average",
                format!("unrecognised keyword '{}'", name),
            )
        }),
        Some(other) => Err(SimError::invalid_parameter(
            "moving_average",
            format!("must be a name, got {:?}", other),
        )),
    }
}
