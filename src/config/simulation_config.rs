use crate::engine::{Direction, TradeRequest, Trailing};
use crate::session::TradingHours;
use crate::strategy::EntryRule;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

//complete simulation run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    //data
    pub data_path: PathBuf,

    //instrument
    pub tick_size: f64,

    //trade rules, in ticks
    pub stop_offset_ticks: u32,
    pub target_offset_ticks: u32,
    pub slippage_ticks: u32,
    #[serde(default)]
    pub trailing_offset_ticks: Option<u32>,
    #[serde(default = "default_enter_on_close")]
    pub enter_on_close: bool,

    //directions to simulate
    pub directions: Vec<Direction>,

    #[serde(default)]
    pub trading_hours: TradingHours,

    #[serde(default)]
    pub entry_rule: EntryRule,

    //optional output path for per-bar results
    #[serde(default)]
    pub output_csv: Option<PathBuf>,
}

fn default_enter_on_close() -> bool {
    true
}

impl Default for SimulationConfig {
    //es futures, 25 tick stop, 50 tick target, 25 tick trail, 1 tick slippage
    fn default() -> Self {
        SimulationConfig {
            data_path: PathBuf::from("data.csv"),
            tick_size: 0.25,
            stop_offset_ticks: 25,
            target_offset_ticks: 50,
            slippage_ticks: 1,
            trailing_offset_ticks: Some(25),
            enter_on_close: true,
            directions: vec![Direction::Long, Direction::Short],
            trading_hours: TradingHours::default(),
            entry_rule: EntryRule::EveryBar,
            output_csv: None,
        }
    }
}

impl SimulationConfig {
    //load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    //request settings for one direction, entering at bar 0
    pub fn request_template(&self, direction: Direction) -> TradeRequest {
        TradeRequest {
            entry_index: 0,
            direction,
            stop_offset_ticks: self.stop_offset_ticks,
            target_offset_ticks: self.target_offset_ticks,
            tick_size: self.tick_size,
            enter_on_close: self.enter_on_close,
            slippage_ticks: self.slippage_ticks,
            trailing: match self.trailing_offset_ticks {
                Some(offset_ticks) => Trailing::On { offset_ticks },
                None => Trailing::Off,
            },
        }
    }

    //one request per entry index
    pub fn requests(&self, entries: &[usize], direction: Direction) -> Vec<TradeRequest> {
        let template = self.request_template(direction);
        entries.iter().map(|&index| template.at(index)).collect()
    }
}
