pub mod request;
pub mod simulator;

pub use request::{Direction, TradeRequest, Trailing};
pub use simulator::Simulator;
