use crate::error::{Result, SimError};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

//literal times below are always in range
fn hms(hour: u32, minute: u32, second: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, second).unwrap_or_default()
}

//daily window in which positions may be opened or held
//trading halts strictly after halt_after and resumes at resume_at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingHours {
    pub halt_after: NaiveTime,
    pub resume_at: NaiveTime,

    //a step from a bar at or before session_close_hour to a bar at or after
    //session_open_hour rolls into the next trading session
    pub session_close_hour: u32,
    pub session_open_hour: u32,
}

impl Default for TradingHours {
    //cme globex equity index maintenance break
    fn default() -> Self {
        TradingHours {
            halt_after: hms(16, 5, 0),
            resume_at: hms(18, 0, 0),
            session_close_hour: 16,
            session_open_hour: 18,
        }
    }
}

impl TradingHours {
    //creates a policy whose session hours follow the halt window
    pub fn new(halt_after: NaiveTime, resume_at: NaiveTime) -> Result<Self> {
        if halt_after >= resume_at {
            return Err(SimError::invalid_parameter(
                "trading_hours",
                format!("halt {} must precede resume {}", halt_after, resume_at),
            ));
        }

        Ok(TradingHours {
            halt_after,
            resume_at,
            session_close_hour: halt_after.hour(),
            session_open_hour: resume_at.hour(),
        })
    }

    pub fn with_session_hours(mut self, close_hour: u32, open_hour: u32) -> Self {
        self.session_close_hour = close_hour;
        self.session_open_hour = open_hour;
        self
    }

    pub fn is_tradable(&self, time_of_day: NaiveTime) -> bool {
        !(time_of_day > self.halt_after && time_of_day < self.resume_at)
    }

    //true when moving from `from` to `to` starts a new trading session
    //sessions span midnight, so the calendar date is not consulted
    pub fn is_session_boundary(&self, from: NaiveTime, to: NaiveTime) -> bool {
        from.hour() <= self.session_close_hour && to.hour() >= self.session_open_hour
    }
}
