use crate::{
    conditions::{Conditions, Forecast},
    context::GridContext,
};
use chrono::{DateTime, FixedOffset, TimeZone, Timelike};
use log::debug;
use serde::Serialize;
use windsock_utils::dates;

/// Location of a cell inside a climb's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellPosition {
    pub day: usize,
    pub hour: usize,
}

/// One forecast day: a slot per hour in the window, absent where no data exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket<T> {
    /// Weekday name, e.g. "Saturday"
    pub day: String,
    /// Weekday plus day-of-month, e.g. "Saturday 17"
    pub key: String,
    pub conditions: Vec<Option<T>>,
}

impl<T> DayBucket<T> {
    pub fn new(day: String, key: String) -> Self {
        DayBucket {
            day,
            key,
            conditions: Vec::new(),
        }
    }

    /// Cell at `hour` slot, `None` when out of range or absent.
    pub fn get(&self, hour: usize) -> Option<&T> {
        self.conditions.get(hour).and_then(Option::as_ref)
    }

    /// First three letters of the weekday.
    pub fn short_day(&self) -> String {
        self.day.chars().take(3).collect()
    }

    /// Transform every present cell, stopping at the first error.
    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(usize, T) -> Result<U, E>,
    ) -> Result<DayBucket<U>, E> {
        let conditions = self
            .conditions
            .into_iter()
            .enumerate()
            .map(|(hour, cell)| cell.map(|c| f(hour, c)).transpose())
            .collect::<Result<Vec<_>, E>>()?;
        Ok(DayBucket {
            day: self.day,
            key: self.key,
            conditions,
        })
    }
}

/// A raw snapshot tagged with its position in the hourly sequence and its local time.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalCondition {
    /// Index into the provider's hourly sequence; 0 is "current".
    pub index: usize,
    pub local_time: DateTime<FixedOffset>,
    pub conditions: Conditions,
}

impl LocalCondition {
    pub fn is_current(&self) -> bool {
        self.index == 0
    }
}

/// Output of the windowing pass, before padding.
#[derive(Debug, Clone, Default)]
pub struct Bucketed {
    pub current: Option<LocalCondition>,
    pub days: Vec<DayBucket<LocalCondition>>,
}

/// Split an hourly forecast into day buckets confined to the context's hour window.
///
/// The first element is always kept as `current`. When its local hour is inside
/// the window it also lands at its natural place in the grid.
pub fn bucket_forecast<Tz: TimeZone>(forecast: &Forecast, ctx: &GridContext<Tz>) -> Bucketed {
    let mut bucketed = Bucketed::default();
    let mut open: Option<DayBucket<LocalCondition>> = None;

    for (index, conditions) in forecast.hourly.iter().enumerate() {
        let local_time = ctx.local(&conditions.time);
        let cell = LocalCondition {
            index,
            local_time,
            conditions: conditions.clone(),
        };
        if index == 0 {
            bucketed.current = Some(cell.clone());
        }

        if !ctx.window.contains(local_time.hour()) {
            continue;
        }

        let key = dates::disambiguated_day(&local_time);
        let bucket = match open.take() {
            Some(bucket) if bucket.key == key => bucket,
            Some(closed) => {
                bucketed.days.push(closed);
                DayBucket::new(dates::day_label(&local_time), key)
            }
            None => DayBucket::new(dates::day_label(&local_time), key),
        };
        let bucket = open.insert(bucket);
        bucket.conditions.push(Some(cell));
    }

    if let Some(last) = open {
        bucketed.days.push(last);
    }
    debug!(
        "bucketed {} hourly conditions into {} days",
        forecast.hourly.len(),
        bucketed.days.len()
    );
    bucketed
}

/// Grid position of the forecast's current snapshot, if it fell inside the window.
pub fn locate_current(days: &[DayBucket<LocalCondition>]) -> Option<CellPosition> {
    days.iter().enumerate().find_map(|(day, bucket)| {
        bucket
            .conditions
            .iter()
            .position(|cell| cell.as_ref().is_some_and(LocalCondition::is_current))
            .map(|hour| CellPosition { day, hour })
    })
}
