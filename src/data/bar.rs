use crate::error::{Result, SimError};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

//the price view of a single bar consumed by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time_of_day: NaiveTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub last: f64,
}

impl Candle {
    pub fn new(time_of_day: NaiveTime, open: f64, high: f64, low: f64, last: f64) -> Self {
        Candle {
            time_of_day,
            open,
            high,
            low,
            last,
        }
    }

    //returns the candle with every price negated (high and low swap roles)
    pub fn mirrored(&self) -> Self {
        Candle {
            time_of_day: self.time_of_day,
            open: -self.open,
            high: -self.low,
            low: -self.high,
            last: -self.last,
        }
    }
}

//represents one row of an exchange export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub last: f64,
    pub volume: f64,
    pub num_trades: u64,
}

impl Bar {
    //combined date and time of the bar
    pub fn datetime(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn candle(&self) -> Candle {
        Candle::new(self.time, self.open, self.high, self.low, self.last)
    }
}

//projects bars onto the candle view
pub fn candles(bars: &[Bar]) -> Vec<Candle> {
    bars.iter().map(Bar::candle).collect()
}

//builds candles from parallel columns, all of which must have the same length
pub fn candles_from_columns(
    times: &[NaiveTime],
    open: &[f64],
    high: &[f64],
    low: &[f64],
    last: &[f64],
) -> Result<Vec<Candle>> {
    let len = times.len();
    for (name, column) in [("open", open), ("high", high), ("low", low), ("last", last)] {
        if column.len() != len {
            return Err(SimError::InvalidShape(format!(
                "column {} has {} rows, expected {}",
                name,
                column.len(),
                len
            )));
        }
    }

    Ok((0..len)
        .map(|i| Candle::new(times[i], open[i], high[i], low[i], last[i]))
        .collect())
}

//price column selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Last,
}

impl PriceField {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open" => Some(PriceField::Open),
            "high" => Some(PriceField::High),
            "low" => Some(PriceField::Low),
            "last" | "close" => Some(PriceField::Last),
            _ => None,
        }
    }

    pub fn of(&self, candle: &Candle) -> f64 {
        match self {
            PriceField::Open => candle.open,
            PriceField::High => candle.high,
            PriceField::Low => candle.low,
            PriceField::Last => candle.last,
        }
    }
}

//extracts one price column as a series
pub fn column(candles: &[Candle], field: PriceField) -> Vec<f64> {
    candles.iter().map(|c| field.of(c)).collect()
}
