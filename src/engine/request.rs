use crate::data::Candle;
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

//trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "long" | "buy" => Some(Direction::Long),
            "short" | "sell" => Some(Direction::Short),
            _ => None,
        }
    }

    //converts to price sign (Long = +1, Short = -1)
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }

    //(favorable, adverse) extremes of a candle for this direction
    pub(crate) fn touches(&self, candle: &Candle) -> (f64, f64) {
        match self {
            Direction::Long => (candle.high, candle.low),
            Direction::Short => (candle.low, candle.high),
        }
    }
}

//trailing stop setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trailing {
    #[default]
    Off,
    On { offset_ticks: u32 },
}

//a hypothetical entry to evaluate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub entry_index: usize,
    pub direction: Direction,
    pub stop_offset_ticks: u32,
    pub target_offset_ticks: u32,
    pub tick_size: f64,

    //fill at the entry bar's close instead of the next bar's open
    pub enter_on_close: bool,
    pub slippage_ticks: u32,
    pub trailing: Trailing,
}

impl TradeRequest {
    //creates a request that fills at the entry close with no slippage or trailing
    pub fn new(
        entry_index: usize,
        direction: Direction,
        stop_offset_ticks: u32,
        target_offset_ticks: u32,
        tick_size: f64,
    ) -> Self {
        TradeRequest {
            entry_index,
            direction,
            stop_offset_ticks,
            target_offset_ticks,
            tick_size,
            enter_on_close: true,
            slippage_ticks: 0,
            trailing: Trailing::Off,
        }
    }

    pub fn long(entry_index: usize, stop: u32, target: u32, tick_size: f64) -> Self {
        TradeRequest::new(entry_index, Direction::Long, stop, target, tick_size)
    }

    pub fn short(entry_index: usize, stop: u32, target: u32, tick_size: f64) -> Self {
        TradeRequest::new(entry_index, Direction::Short, stop, target, tick_size)
    }

    pub fn with_slippage(mut self, slippage_ticks: u32) -> Self {
        self.slippage_ticks = slippage_ticks;
        self
    }

    pub fn with_trailing(mut self, offset_ticks: u32) -> Self {
        self.trailing = Trailing::On { offset_ticks };
        self
    }

    pub fn enter_on_next_open(mut self) -> Self {
        self.enter_on_close = false;
        self
    }

    //same settings at another entry bar
    pub fn at(&self, entry_index: usize) -> Self {
        TradeRequest {
            entry_index,
            ..*self
        }
    }

    //converts a tick count to a price distance
    pub fn ticks(&self, count: u32) -> f64 {
        count as f64 * self.tick_size
    }

    //checks the request against a candle sequence of the given length
    pub fn validate(&self, candle_count: usize) -> Result<()> {
        if !self.tick_size.is_finite() || self.tick_size <= 0.0 {
            return Err(SimError::invalid_parameter(
                "tick_size",
                format!("must be positive, got {}", self.tick_size),
            ));
        }

        if self.entry_index >= candle_count {
            return Err(SimError::InvalidIndex {
                index: self.entry_index,
                len: candle_count,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_compose() {
        let request = TradeRequest::short(3, 8, 16, 0.25)
            .with_slippage(1)
            .with_trailing(4)
            .enter_on_next_open();

        assert_eq!(request.direction, Direction::Short);
        assert_eq!(request.slippage_ticks, 1);
        assert_eq!(request.trailing, Trailing::On { offset_ticks: 4 });
        assert!(!request.enter_on_close);
        assert_eq!(request.ticks(request.target_offset_ticks), 4.0);
        assert_eq!(request.at(7).entry_index, 7);
        assert_eq!(request.at(7).slippage_ticks, 1);
    }

    #[test]
    fn validate_rejects_bad_tick_size() {
        for tick in [0.0, -0.25, f64::NAN] {
            let err = TradeRequest::long(0, 1, 1, tick).validate(5).unwrap_err();
            assert!(matches!(err, SimError::InvalidParameter { .. }));
        }
    }

    #[test]
    fn validate_rejects_out_of_range_index() {
        let err = TradeRequest::long(5, 1, 1, 0.25).validate(5).unwrap_err();
        assert_eq!(err, SimError::InvalidIndex { index: 5, len: 5 });
        assert!(TradeRequest::long(4, 1, 1, 0.25).validate(5).is_ok());
    }

    #[test]
    fn direction_parse_and_sign() {
        assert_eq!(Direction::parse("LONG"), Some(Direction::Long));
        assert_eq!(Direction::parse("sell"), Some(Direction::Short));
        assert_eq!(Direction::parse("flat"), None);
        assert_eq!(Direction::Short.sign(), -1.0);
    }
}
