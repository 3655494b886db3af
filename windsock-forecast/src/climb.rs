use crate::slug::slugify;
use serde::{Deserialize, Serialize};
use windsock_utils::display;

/// Embedded sample registry used by tests and the demo workflow.
pub static CLIMBS_FIXTURE: &str = include_str!("../../fixtures/climbs.json");

#[derive(Debug, Default, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Physical description of a Strava segment. Opaque to the grid engine and
/// handed through to the scoring oracle.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub id: i64,
    /// Meters
    pub distance: f64,
    /// Rise over run, e.g. 0.08 for 8%
    pub average_grade: f64,
    #[serde(default)]
    pub elevation_low: f64,
    #[serde(default)]
    pub elevation_high: f64,
    #[serde(default)]
    pub total_elevation_gain: f64,
    #[serde(default)]
    pub median_elevation: f64,
    #[serde(default)]
    pub start_location: LatLng,
    #[serde(default)]
    pub end_location: LatLng,
    #[serde(default)]
    pub average_location: LatLng,
    /// Degrees. Older registry files spell this key "AverageDirection".
    #[serde(default, alias = "AverageDirection")]
    pub average_direction: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub map: String,
}

/// A named climb with optional alternate names.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Climb {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub segment: Segment,
}

impl Climb {
    /// Build a climb named after its segment, as used for one-off segment pages.
    pub fn from_segment(segment: Segment) -> Self {
        Climb {
            name: segment.name.clone(),
            aliases: Vec::new(),
            segment,
        }
    }

    /// Parse a JSON array of climbs.
    pub fn parse_climbs_json(json: &str) -> serde_json::Result<Vec<Climb>> {
        serde_json::from_str(json)
    }

    /// Canonical page identifier.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Every name this climb is known by: its own, its segment's, then aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(std::iter::once(self.segment.name.as_str()))
            .chain(self.aliases.iter().map(String::as_str))
    }

    /// Compass direction the climb heads in.
    pub fn direction(&self) -> &'static str {
        display::direction(self.segment.average_direction)
    }
}
