use crate::data::Candle;
use crate::engine::request::{Direction, TradeRequest, Trailing};
use crate::error::{Result, SimError};
use crate::session::TradingHours;
use rayon::prelude::*;
use tracing::debug;

//lifecycle of a single simulated trade
#[derive(Debug, Clone, Copy, PartialEq)]
enum TradeState {
    AwaitingEntry,
    Open(OpenTrade),
    Closed(f64),
}

//loop-local snapshot of an open trade
#[derive(Debug, Clone, Copy, PartialEq)]
struct OpenTrade {
    direction: Direction,
    entry_price: f64,
    stop_price: f64,
    target_price: f64,

    //most favorable price seen since entry
    extreme: f64,

    //bar currently being examined
    cursor: usize,

    //bars examined so far
    scanned: usize,
}

//evaluates trade requests against a candle sequence
#[derive(Debug, Clone, Copy, Default)]
pub struct Simulator {
    hours: TradingHours,
}

impl Simulator {
    pub fn new(hours: TradingHours) -> Self {
        Simulator { hours }
    }

    pub fn hours(&self) -> &TradingHours {
        &self.hours
    }

    //returns one realized pnl per request, in request order
    //the whole batch is validated before any trade is simulated
    pub fn simulate(&self, candles: &[Candle], requests: &[TradeRequest]) -> Result<Vec<f64>> {
        validate_batch(candles, requests)?;
        debug!(
            candles = candles.len(),
            requests = requests.len(),
            "simulating trades"
        );

        Ok(requests
            .iter()
            .map(|request| self.run(candles, request))
            .collect())
    }

    //same as simulate, with requests spread over the rayon pool
    pub fn simulate_parallel(
        &self,
        candles: &[Candle],
        requests: &[TradeRequest],
    ) -> Result<Vec<f64>> {
        validate_batch(candles, requests)?;
        debug!(
            candles = candles.len(),
            requests = requests.len(),
            "simulating trades in parallel"
        );

        Ok(requests
            .par_iter()
            .map(|request| self.run(candles, request))
            .collect())
    }

    pub fn simulate_one(&self, candles: &[Candle], request: &TradeRequest) -> Result<f64> {
        validate_batch(candles, std::slice::from_ref(request))?;
        Ok(self.run(candles, request))
    }

    fn run(&self, candles: &[Candle], request: &TradeRequest) -> f64 {
        let mut state = TradeState::AwaitingEntry;
        loop {
            state = match state {
                TradeState::AwaitingEntry => self.enter(candles, request),
                TradeState::Open(trade) => self.step(candles, request, trade),
                TradeState::Closed(outcome) => return outcome,
            };
        }
    }

    fn enter(&self, candles: &[Candle], request: &TradeRequest) -> TradeState {
        let entry = &candles[request.entry_index];

        //no trade on the final bar or outside trading hours
        let next = match candles.get(request.entry_index + 1) {
            Some(next) => next,
            None => return TradeState::Closed(0.0),
        };
        if !self.hours.is_tradable(entry.time_of_day) {
            return TradeState::Closed(0.0);
        }

        let sign = request.direction.sign();
        let fill = if request.enter_on_close {
            entry.last
        } else {
            next.open
        };
        let entry_price = fill + sign * request.ticks(request.slippage_ticks);

        TradeState::Open(OpenTrade {
            direction: request.direction,
            entry_price,
            stop_price: entry_price - sign * request.ticks(request.stop_offset_ticks),
            target_price: entry_price + sign * request.ticks(request.target_offset_ticks),
            extreme: entry_price,
            cursor: request.entry_index + 1,
            scanned: 0,
        })
    }

    fn step(&self, candles: &[Candle], request: &TradeRequest, mut trade: OpenTrade) -> TradeState {
        let sign = trade.direction.sign();
        let current = &candles[trade.cursor];

        let can_continue = match candles.get(trade.cursor + 1) {
            Some(next) => {
                self.hours.is_tradable(next.time_of_day)
                    && !self
                        .hours
                        .is_session_boundary(current.time_of_day, next.time_of_day)
            }
            None => false,
        };

        //flat exit at this bar's close
        if !can_continue {
            if trade.scanned == 0 {
                return TradeState::Closed(0.0);
            }
            return TradeState::Closed(sign * (current.last - trade.entry_price));
        }

        //target is checked first when a bar spans both levels
        let (favorable, adverse) = trade.direction.touches(current);
        if sign * favorable >= sign * trade.target_price {
            return TradeState::Closed(sign * (trade.target_price - trade.entry_price));
        }
        if sign * adverse <= sign * trade.stop_price {
            return TradeState::Closed(sign * (trade.stop_price - trade.entry_price));
        }

        if let Trailing::On { offset_ticks } = request.trailing {
            if sign * favorable > sign * trade.extreme {
                trade.extreme = favorable;
            }
            let trailed = trade.extreme - sign * request.ticks(offset_ticks);
            //ratchet only
            if sign * trailed > sign * trade.stop_price {
                trade.stop_price = trailed;
            }
        }

        trade.scanned += 1;
        trade.cursor += 1;
        TradeState::Open(trade)
    }
}

fn validate_batch(candles: &[Candle], requests: &[TradeRequest]) -> Result<()> {
    if candles.is_empty() {
        return Err(SimError::InvalidShape(
            "candle sequence is empty".to_string(),
        ));
    }

    for request in requests {
        request.validate(candles.len())?;
    }

    Ok(())
}
