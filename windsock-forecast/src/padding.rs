use crate::{
    day_bucket::DayBucket,
    error::{ForecastError, Result},
};
use std::iter::repeat_with;
use std::ops::RangeInclusive;

/// A forecast horizon yields seven full days, or seven plus a partial first day.
pub const ALLOWED_DAY_COUNTS: RangeInclusive<usize> = 7..=8;

/// Pad the partial boundary days to `width` slots.
///
/// The first day is right-aligned (absent slots in front), the last day is
/// left-aligned (absent slots at the end). Interior days are left untouched.
pub fn pad_days<T>(days: &mut [DayBucket<T>], width: usize) {
    if let Some(first) = days.first_mut() {
        let actual = first.conditions.len();
        if actual < width {
            let cells = std::mem::take(&mut first.conditions);
            first.conditions = repeat_with(|| None)
                .take(width - actual)
                .chain(cells)
                .collect();
        }
    }

    if days.len() > 1 {
        if let Some(last) = days.last_mut() {
            if last.conditions.len() < width {
                last.conditions.resize_with(width, || None);
            }
        }
    }
}

/// Check the padded grid has 7 or 8 days of exactly `width` slots each.
pub fn validate_days<T>(climb: &str, days: &[DayBucket<T>], width: usize) -> Result<()> {
    if !ALLOWED_DAY_COUNTS.contains(&days.len()) {
        return Err(ForecastError::DayCount {
            climb: climb.to_string(),
            found: days.len(),
        });
    }
    for day in days {
        if day.conditions.len() != width {
            return Err(ForecastError::HourCount {
                climb: climb.to_string(),
                day: day.key.clone(),
                expected: width,
                found: day.conditions.len(),
            });
        }
    }
    Ok(())
}
