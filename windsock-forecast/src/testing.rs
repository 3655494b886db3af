//! Shared builders for unit tests.

use crate::{
    climb::{Climb, Segment},
    conditions::{Conditions, Forecast, Scores},
    context::{GridContext, HourWindow},
    error::OracleError,
};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

/// Pacific daylight time.
pub fn pacific() -> FixedOffset {
    FixedOffset::west_opt(7 * 3600).unwrap()
}

pub fn context(min: u32, max: u32) -> GridContext<FixedOffset> {
    let generated_at = Utc.with_ymd_and_hms(2023, 6, 17, 12, 0, 0).unwrap();
    GridContext::new(generated_at, pacific(), HourWindow::new(min, max).unwrap())
}

pub fn conditions_at(time: DateTime<Utc>) -> Conditions {
    Conditions {
        time,
        icon: None,
        temperature: 18.0,
        apparent_temperature: 18.0,
        humidity: 0.6,
        air_pressure: 1013.0,
        air_density: 1.2,
        cloud_cover: 0.1,
        precip_probability: 0.0,
        precip_intensity: 0.0,
        precip_type: None,
        wind_speed: 4.0,
        wind_gust: 0.0,
        wind_bearing: 315.0,
    }
}

/// `hours` consecutive hourly snapshots starting at `start`.
pub fn hourly_forecast(start: DateTime<FixedOffset>, hours: usize) -> Forecast {
    let start = start.with_timezone(&Utc);
    Forecast {
        hourly: (0..hours)
            .map(|i| conditions_at(start + Duration::hours(i as i64)))
            .collect(),
    }
}

/// Seven days plus a partial first day, starting mid-morning.
pub fn week_forecast() -> Forecast {
    let start = pacific().with_ymd_and_hms(2023, 6, 17, 7, 0, 0).unwrap();
    hourly_forecast(start, 7 * 24)
}

pub fn climb(name: &str, id: i64) -> Climb {
    Climb {
        name: name.to_string(),
        aliases: Vec::new(),
        segment: Segment {
            name: format!("{name} segment"),
            id,
            distance: 4000.0,
            average_grade: 0.07,
            median_elevation: 300.0,
            average_direction: 220.0,
            ..Segment::default()
        },
    }
}

/// Oracle scoring each cell by its UTC hour so that scores differ deterministically.
pub fn hour_oracle(
    _segment: &Segment,
    current: &Conditions,
    past: Option<&Conditions>,
) -> Result<Scores, OracleError> {
    use chrono::Timelike;
    let baseline = 1.0 + (current.time.hour() as f64 - 12.0).abs() / 100.0;
    Ok(Scores {
        baseline,
        historical: past.map(|_| baseline),
    })
}
