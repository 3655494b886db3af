use crate::{climb::Climb, conditions::Conditions};
use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Source of long-run average conditions for a climb.
///
/// A miss is not an error: callers score the cell baseline-only.
pub trait HistoricalLookup: Sync {
    /// Average conditions for `climb` in local `month` (1-12) at local `hour` (0-23).
    fn average(&self, climb: &Climb, month: u32, hour: u32) -> Option<&Conditions>;

    /// Average conditions for the month and hour of a local timestamp.
    fn average_at(&self, climb: &Climb, local_time: &DateTime<FixedOffset>) -> Option<&Conditions> {
        self.average(climb, local_time.month(), local_time.hour())
    }
}

/// Lookup used when no historical data was loaded; every query misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHistoricalData;

impl HistoricalLookup for NoHistoricalData {
    fn average(&self, _climb: &Climb, _month: u32, _hour: u32) -> Option<&Conditions> {
        None
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyAverages {
    #[serde(default)]
    pub hourly: Vec<Option<Conditions>>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAverages {
    #[serde(default)]
    pub monthly: Vec<HourlyAverages>,
}

/// Per-segment table of average conditions indexed by month, then hour.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoricalClimbAverages(pub HashMap<i64, MonthlyAverages>);

impl HistoricalClimbAverages {
    /// Parse averages keyed by segment id.
    pub fn parse_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl HistoricalLookup for HistoricalClimbAverages {
    fn average(&self, climb: &Climb, month: u32, hour: u32) -> Option<&Conditions> {
        let month0 = month.checked_sub(1)? as usize;
        self.0
            .get(&climb.segment.id)?
            .monthly
            .get(month0)?
            .hourly
            .get(hour as usize)?
            .as_ref()
    }
}
