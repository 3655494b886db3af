use crate::{
    climb::Segment,
    conditions::{Conditions, ScoredCondition, Scores},
    day_bucket::CellPosition,
    error::OracleError,
};

/// Grades below this are ridden in a time-trial position.
pub const CLIMB_THRESHOLD: f64 = 0.03;

const GRAVITY: f64 = 9.80665;
const SEA_LEVEL_DENSITY: f64 = 1.225;
const SYSTEM_MASS_KG: f64 = 80.0;
const ROLLING_RESISTANCE: f64 = 0.004;
const CDA_CLIMB: f64 = 0.35;
const CDA_TT: f64 = 0.25;

/// Scores a snapshot for a segment. Lower is better and 1.0 is neutral.
///
/// `historical` must be `None` whenever `past` is `None`.
pub trait ScoringOracle: Sync {
    fn score(
        &self,
        segment: &Segment,
        current: &Conditions,
        past: Option<&Conditions>,
    ) -> Result<Scores, OracleError>;
}

impl<F> ScoringOracle for F
where
    F: Fn(&Segment, &Conditions, Option<&Conditions>) -> Result<Scores, OracleError> + Sync,
{
    fn score(
        &self,
        segment: &Segment,
        current: &Conditions,
        past: Option<&Conditions>,
    ) -> Result<Scores, OracleError> {
        self(segment, current, past)
    }
}

/// Resistive-force model: air density plus the wind component along the
/// segment's average heading, against gravity and rolling resistance at a
/// grade-dependent reference speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindOracle;

impl WindOracle {
    /// Standard-atmosphere air density at `elevation` meters.
    pub fn standard_density(elevation: f64) -> f64 {
        SEA_LEVEL_DENSITY * (1.0 - 2.25577e-5 * elevation).powf(4.25588)
    }

    /// Ground speed (m/s) the model assumes for a grade.
    fn reference_speed(grade: f64) -> f64 {
        12.0 / (1.0 + 25.0 * grade.max(0.0))
    }

    fn cda(grade: f64) -> f64 {
        if grade < CLIMB_THRESHOLD {
            CDA_TT
        } else {
            CDA_CLIMB
        }
    }

    /// Component of the wind blowing against a rider heading along `heading` degrees.
    fn headwind(wind_speed: f64, wind_bearing: f64, heading: f64) -> f64 {
        wind_speed * (wind_bearing - heading).to_radians().cos()
    }

    fn resistance(segment: &Segment, density: f64, wind_speed: f64, wind_bearing: f64) -> f64 {
        let grade = segment.average_grade;
        let speed = Self::reference_speed(grade);
        let air_speed = speed + Self::headwind(wind_speed, wind_bearing, segment.average_direction);
        let aero = 0.5 * density * Self::cda(grade) * air_speed * air_speed.abs();
        let ground = SYSTEM_MASS_KG * GRAVITY * (grade + ROLLING_RESISTANCE);
        (aero + ground.max(0.0)).max(0.0)
    }

    fn validate_segment(segment: &Segment) -> Result<(), OracleError> {
        let reason = if !segment.distance.is_finite() || segment.distance <= 0.0 {
            "distance must be positive"
        } else if !segment.average_grade.is_finite() {
            "grade must be finite"
        } else {
            return Ok(());
        };
        Err(OracleError::InvalidSegment {
            segment: segment.name.clone(),
            reason: reason.to_string(),
        })
    }

    fn validate_conditions(c: &Conditions) -> Result<(), OracleError> {
        if !(c.air_density.is_finite() && c.air_density > 0.0) {
            return Err(OracleError::InvalidConditions(format!(
                "air density {} at {}",
                c.air_density, c.time
            )));
        }
        if !(c.wind_speed.is_finite() && c.wind_bearing.is_finite()) {
            return Err(OracleError::InvalidConditions(format!(
                "wind {} @ {} at {}",
                c.wind_speed, c.wind_bearing, c.time
            )));
        }
        Ok(())
    }
}

impl ScoringOracle for WindOracle {
    fn score(
        &self,
        segment: &Segment,
        current: &Conditions,
        past: Option<&Conditions>,
    ) -> Result<Scores, OracleError> {
        Self::validate_segment(segment)?;
        Self::validate_conditions(current)?;

        let now = Self::resistance(
            segment,
            current.air_density,
            current.wind_speed,
            current.wind_bearing,
        );
        let still = Self::resistance(
            segment,
            Self::standard_density(segment.median_elevation),
            0.0,
            0.0,
        );
        let historical = match past {
            Some(past) => {
                Self::validate_conditions(past)?;
                let then =
                    Self::resistance(segment, past.air_density, past.wind_speed, past.wind_bearing);
                Some(if then > 0.0 { now / then } else { 1.0 })
            }
            None => None,
        };
        Ok(Scores {
            baseline: now / still,
            historical,
        })
    }
}

/// Running minima over scored cells. Ties keep the earliest cell.
#[derive(Debug, Default, Clone, Copy)]
pub struct BestTracker {
    baseline: Option<(CellPosition, f64)>,
    historical: Option<(CellPosition, f64)>,
}

impl BestTracker {
    pub fn observe(&mut self, position: CellPosition, cell: &ScoredCondition) {
        if self.baseline.is_none_or(|(_, best)| cell.baseline < best) {
            self.baseline = Some((position, cell.baseline));
        }
        if let Some(score) = cell.historical {
            if self.historical.is_none_or(|(_, best)| score < best) {
                self.historical = Some((position, score));
            }
        }
    }

    pub fn best_baseline(&self) -> Option<CellPosition> {
        self.baseline.map(|(position, _)| position)
    }

    pub fn best_historical(&self) -> Option<CellPosition> {
        self.historical.map(|(position, _)| position)
    }
}
