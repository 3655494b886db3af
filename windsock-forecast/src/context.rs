use crate::error::{ForecastError, Result};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Default first hour [0-23] included in forecasts.
pub const MIN_HOUR_DEFAULT: u32 = 6;

/// Default last hour [0-23] included in forecasts.
pub const MAX_HOUR_DEFAULT: u32 = 18;

/// Inclusive range of local hours-of-day shown for each forecast day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourWindow {
    min: u32,
    max: u32,
}

impl HourWindow {
    /// Build a window, rejecting bounds outside [0-23] or with `min >= max`.
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if max > 23 || min >= max {
            return Err(ForecastError::InvalidWindow { min, max });
        }
        Ok(HourWindow { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Number of hour slots in each day.
    pub fn width(&self) -> usize {
        (self.max - self.min + 1) as usize
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.min <= hour && hour <= self.max
    }
}

impl Default for HourWindow {
    fn default() -> Self {
        HourWindow {
            min: MIN_HOUR_DEFAULT,
            max: MAX_HOUR_DEFAULT,
        }
    }
}

/// Which scoring convention a page presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Baseline,
    Historical,
}

impl View {
    pub const ALL: [View; 2] = [View::Historical, View::Baseline];

    /// Sub-directory the view is written under.
    pub fn dir(&self) -> &'static str {
        match self {
            View::Baseline => "baseline",
            View::Historical => "historical",
        }
    }
}

/// Immutable per-run settings threaded through grid construction and site assembly.
#[derive(Debug, Clone)]
pub struct GridContext<Tz: TimeZone> {
    pub generated_at: DateTime<Utc>,
    pub tz: Tz,
    pub window: HourWindow,
    pub default_view: View,
    pub title: String,
    pub absolute_url: String,
}

impl<Tz: TimeZone> GridContext<Tz> {
    pub fn new(generated_at: DateTime<Utc>, tz: Tz, window: HourWindow) -> Self {
        GridContext {
            generated_at,
            tz,
            window,
            default_view: View::Baseline,
            title: String::from("Windsock"),
            absolute_url: String::new(),
        }
    }

    pub fn with_default_view(mut self, view: View) -> Self {
        self.default_view = view;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_absolute_url(mut self, url: impl Into<String>) -> Self {
        self.absolute_url = url.into();
        self
    }

    /// Convert an absolute instant into the run's local zone.
    pub fn local(&self, time: &DateTime<Utc>) -> DateTime<FixedOffset> {
        time.with_timezone(&self.tz).fixed_offset()
    }
}
