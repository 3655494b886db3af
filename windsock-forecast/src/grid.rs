use crate::{
    climb::Climb,
    conditions::{Forecast, ScoredCondition, Scores},
    context::{GridContext, View},
    day_bucket::{bucket_forecast, locate_current, CellPosition, DayBucket, LocalCondition},
    error::{ForecastError, Result},
    historical::HistoricalLookup,
    padding::{pad_days, validate_days},
    scoring::{BestTracker, ScoringOracle},
};
use chrono::TimeZone;
use log::debug;
use serde::Serialize;
use windsock_utils::dates;

/// A climb's scored day/hour grid plus its current conditions and best cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClimbGrid {
    pub current: Option<ScoredCondition>,
    pub days: Vec<DayBucket<ScoredCondition>>,
    /// Where `current` also sits in the grid, if its hour is inside the window.
    pub current_position: Option<CellPosition>,
    /// Lowest baseline score, never the current cell.
    pub best_baseline: Option<CellPosition>,
    /// Lowest historical score, never the current cell.
    pub best_historical: Option<CellPosition>,
}

impl ClimbGrid {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Slots per day; 0 for an empty grid.
    pub fn hours(&self) -> usize {
        self.days.first().map_or(0, |day| day.conditions.len())
    }

    pub fn cell(&self, position: CellPosition) -> Option<&ScoredCondition> {
        self.days.get(position.day)?.get(position.hour)
    }

    pub fn best_position(&self, view: View) -> Option<CellPosition> {
        match view {
            View::Baseline => self.best_baseline,
            View::Historical => self.best_historical,
        }
    }

    pub fn best(&self, view: View) -> Option<&ScoredCondition> {
        self.best_position(view).and_then(|p| self.cell(p))
    }

    /// Whether `cell` wraps the same snapshot as the current conditions.
    pub fn is_current(&self, cell: &ScoredCondition) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| current.same_snapshot(cell))
    }

    /// Whether an earlier day in the grid has the same weekday as `day`.
    ///
    /// Cells on such a day need the day of month in their slug and label.
    pub fn repeats_weekday(&self, day: usize) -> bool {
        self.days
            .get(day)
            .is_some_and(|bucket| self.days[..day].iter().any(|d| d.day == bucket.day))
    }

    /// Label of the cell at `position`, disambiguated on a repeated weekday.
    pub fn day_time_label(&self, position: CellPosition) -> Option<String> {
        let cell = self.cell(position)?;
        Some(if self.repeats_weekday(position.day) {
            cell.disambiguated_day_time()
        } else {
            cell.day_time()
        })
    }

    /// Every present cell with its position, day by day.
    pub fn cells(&self) -> impl Iterator<Item = (CellPosition, &ScoredCondition)> {
        self.days.iter().enumerate().flat_map(|(day, bucket)| {
            bucket
                .conditions
                .iter()
                .enumerate()
                .filter_map(move |(hour, cell)| {
                    cell.as_ref().map(|c| (CellPosition { day, hour }, c))
                })
        })
    }
}

/// A climb together with the grid built for it in this run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimbForecast {
    pub climb: Climb,
    pub grid: ClimbGrid,
}

impl ClimbForecast {
    pub fn slug(&self) -> String {
        self.climb.slug()
    }

    pub fn direction(&self) -> &'static str {
        self.climb.direction()
    }
}

/// Bucket, pad, validate and score one climb's forecast.
///
/// An empty forecast yields an empty grid. A malformed grid or an oracle
/// failure aborts the climb.
pub fn build_climb_grid<Tz, L, O>(
    ctx: &GridContext<Tz>,
    climb: &Climb,
    forecast: &Forecast,
    lookup: &L,
    oracle: &O,
) -> Result<ClimbGrid>
where
    Tz: TimeZone,
    L: HistoricalLookup + ?Sized,
    O: ScoringOracle + ?Sized,
{
    let bucketed = bucket_forecast(forecast, ctx);
    let Some(current) = bucketed.current else {
        return Ok(ClimbGrid::default());
    };

    let width = ctx.window.width();
    let mut days = bucketed.days;
    pad_days(&mut days, width);
    validate_days(&climb.name, &days, width)?;
    let current_position = locate_current(&days);

    let score = |cell: LocalCondition| -> Result<ScoredCondition> {
        let past = lookup.average_at(climb, &cell.local_time);
        let scores = oracle
            .score(&climb.segment, &cell.conditions, past)
            .map_err(|source| ForecastError::Oracle {
                climb: climb.name.clone(),
                time: dates::full_time(&cell.local_time),
                source,
            })?;
        let scores = Scores {
            historical: past.and(scores.historical),
            ..scores
        };
        Ok(ScoredCondition::new(cell.conditions, cell.local_time, scores))
    };

    let current = score(current)?;
    let days = days
        .into_iter()
        .map(|day| {
            day.try_map(|_, cell| {
                if cell.is_current() {
                    Ok(current.clone())
                } else {
                    score(cell)
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut grid = ClimbGrid {
        current: Some(current),
        days,
        current_position,
        best_baseline: None,
        best_historical: None,
    };

    let mut tracker = BestTracker::default();
    for (position, cell) in grid.cells() {
        if Some(position) == current_position {
            continue;
        }
        tracker.observe(position, cell);
    }
    grid.best_baseline = tracker.best_baseline();
    grid.best_historical = tracker.best_historical();

    debug!(
        "{}: {} days x {} hours, current at {:?}",
        climb.name,
        grid.days.len(),
        grid.hours(),
        grid.current_position
    );
    Ok(grid)
}
