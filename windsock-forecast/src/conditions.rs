use crate::{context::View, slug::slugify};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use windsock_utils::{dates, display};

/// Meters per second to kilometers per hour.
pub const MS_TO_KMH: f64 = 3600.0 / 1000.0;

/// Precipitation below this probability is not worth mentioning.
const PRECIP_DISPLAY_THRESHOLD: f64 = 0.1;

/// A single hourly weather snapshot as reported by the forecast provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Degrees Celsius
    pub temperature: f64,
    #[serde(default)]
    pub apparent_temperature: f64,
    /// Relative humidity in [0, 1]
    #[serde(default)]
    pub humidity: f64,
    /// Hectopascals
    #[serde(default)]
    pub air_pressure: f64,
    /// kg/m³
    pub air_density: f64,
    #[serde(default)]
    pub cloud_cover: f64,
    #[serde(default)]
    pub precip_probability: f64,
    /// mm/h
    #[serde(default)]
    pub precip_intensity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precip_type: Option<String>,
    /// m/s
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_gust: f64,
    /// Degrees, the direction the wind is blowing from
    pub wind_bearing: f64,
}

impl Conditions {
    /// Wind speed, gust and compass direction, e.g. "14.4 km/h (21.6 km/h) NW".
    pub fn wind(&self) -> String {
        let speed = self.wind_speed * MS_TO_KMH;
        let gust = self.wind_gust * MS_TO_KMH;
        let direction = display::direction(self.wind_bearing);
        if gust > speed {
            format!("{speed:.1} km/h ({gust:.1} km/h) {direction}")
        } else {
            format!("{speed:.1} km/h {direction}")
        }
    }

    /// Chance and kind of precipitation, e.g. "40% rain (1.2 mm/h)".
    pub fn precip(&self) -> String {
        let kind = self.precip_type.as_deref().unwrap_or("rain");
        let chance = self.precip_probability * 100.0;
        if self.precip_intensity > 0.0 {
            format!("{chance:.0}% {kind} ({:.1} mm/h)", self.precip_intensity)
        } else {
            format!("{chance:.0}% {kind}")
        }
    }

    /// Multi-line summary used in cell titles.
    pub fn summary(&self) -> String {
        let precip = if self.precip_probability > PRECIP_DISPLAY_THRESHOLD {
            format!("\n{}", self.precip())
        } else {
            String::new()
        };
        format!(
            "{:.1}°C ({:.3} kg/m³){}\n{}",
            self.temperature,
            self.air_density,
            precip,
            self.wind()
        )
    }
}

/// An hourly forecast for one location. Element 0 is the current conditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub hourly: Vec<Conditions>,
}

impl Forecast {
    /// Parse cached forecasts keyed by segment id.
    pub fn parse_forecasts_json(json: &str) -> serde_json::Result<HashMap<i64, Forecast>> {
        serde_json::from_str(json)
    }

    pub fn current(&self) -> Option<&Conditions> {
        self.hourly.first()
    }
}

/// Baseline and historical scores produced by a scoring oracle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub baseline: f64,
    /// `None` when no historical average was available for the cell.
    pub historical: Option<f64>,
}

/// A weather snapshot with its local time and both scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCondition {
    pub conditions: Conditions,
    pub local_time: DateTime<FixedOffset>,
    pub baseline: f64,
    pub historical: Option<f64>,
}

impl ScoredCondition {
    pub fn new(conditions: Conditions, local_time: DateTime<FixedOffset>, scores: Scores) -> Self {
        ScoredCondition {
            conditions,
            local_time,
            baseline: scores.baseline,
            historical: scores.historical,
        }
    }

    /// Raw score under the given view.
    pub fn score(&self, view: View) -> Option<f64> {
        match view {
            View::Baseline => Some(self.baseline),
            View::Historical => self.historical,
        }
    }

    /// Display form of the score, or `None` when the view has no score.
    pub fn display_score(&self, view: View) -> Option<String> {
        self.score(view).map(display::display_score)
    }

    pub fn rank(&self, view: View) -> Option<i32> {
        self.score(view).map(display::rank)
    }

    /// Whether this cell wraps the same snapshot as `other`.
    pub fn same_snapshot(&self, other: &ScoredCondition) -> bool {
        self.conditions == other.conditions
    }

    pub fn day(&self) -> String {
        dates::day_label(&self.local_time)
    }

    pub fn day_time(&self) -> String {
        dates::day_time(&self.local_time)
    }

    pub fn day_time_slug(&self) -> String {
        slugify(&self.day_time())
    }

    /// Day-time label carrying the day of month, e.g. "Saturday 16 8AM".
    pub fn disambiguated_day_time(&self) -> String {
        format!(
            "{} {}",
            dates::disambiguated_day(&self.local_time),
            dates::short_time(&self.local_time)
        )
    }

    pub fn disambiguated_day_time_slug(&self) -> String {
        slugify(&self.disambiguated_day_time())
    }

    pub fn full_time(&self) -> String {
        dates::full_time(&self.local_time)
    }
}
