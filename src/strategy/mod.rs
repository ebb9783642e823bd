pub mod crossover;

use crate::data::{column, Candle, PriceField};
use crate::engine::Direction;
use crate::error::Result;
use crate::indicators::IndicatorSpec;
use serde::{Deserialize, Serialize};

pub use crossover::crossover_indices;

//how entry bars are chosen before simulation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum EntryRule {
    //every bar is a candidate entry
    #[default]
    EveryBar,

    //enter where two indicators on the same price column cross
    Crossover {
        fast: IndicatorSpec,
        slow: IndicatorSpec,
        #[serde(default)]
        field: PriceField,
    },
}

impl EntryRule {
    //returns the entry indices for the given direction, in ascending order
    pub fn select(&self, candles: &[Candle], direction: Direction) -> Result<Vec<usize>> {
        match self {
            EntryRule::EveryBar => Ok((0..candles.len()).collect()),
            EntryRule::Crossover { fast, slow, field } => {
                let prices = column(candles, *field);
                let fast_line = fast.apply(&prices)?;
                let slow_line = slow.apply(&prices)?;
                crossover_indices(&fast_line, &slow_line, direction)
            }
        }
    }
}

//spreads outcomes back onto the bars they were entered at
//bars without an entry read 0
pub fn outcomes_by_bar(candle_count: usize, entries: &[usize], outcomes: &[f64]) -> Vec<f64> {
    let mut by_bar = vec![0.0; candle_count];
    for (&index, &outcome) in entries.iter().zip(outcomes) {
        if let Some(slot) = by_bar.get_mut(index) {
            *slot = outcome;
        }
    }
    by_bar
}
