//! Shared utility functions for Windsock crates.

/// Date utility functions
pub mod dates {
    use chrono::{DateTime, TimeZone};
    use std::fmt::Display;

    /// Weekday name, e.g. "Saturday"
    pub fn day_label<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        dt.format("%A").to_string()
    }

    /// Weekday plus day-of-month, e.g. "Saturday 17".
    /// Two Saturdays inside one forecast window never share this key.
    pub fn disambiguated_day<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        dt.format("%A %-d").to_string()
    }

    /// Weekday and 12-hour clock hour, e.g. "Saturday 8AM"
    pub fn day_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        dt.format("%A %-I%p").to_string()
    }

    /// Format as "YYYY-MM-DD HH:MM"
    pub fn full_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        dt.format("%Y-%m-%d %H:%M").to_string()
    }

    /// 12-hour clock hour, e.g. "3PM"
    pub fn short_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        dt.format("%-I%p").to_string()
    }

    /// Generation stamp, e.g. "Jun 17 08:00:00"
    pub fn stamp<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        dt.format("%b %e %H:%M:%S").to_string()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{FixedOffset, TimeZone};

        fn saturday_morning() -> DateTime<FixedOffset> {
            FixedOffset::west_opt(7 * 3600)
                .unwrap()
                .with_ymd_and_hms(2023, 6, 17, 8, 0, 0)
                .unwrap()
        }

        #[test]
        fn test_day_labels() {
            let dt = saturday_morning();
            assert_eq!(day_label(&dt), "Saturday");
            assert_eq!(disambiguated_day(&dt), "Saturday 17");
        }

        #[test]
        fn test_day_time_and_short_time() {
            let dt = saturday_morning();
            assert_eq!(day_time(&dt), "Saturday 8AM");
            assert_eq!(short_time(&dt), "8AM");

            let afternoon = dt + chrono::Duration::hours(7);
            assert_eq!(day_time(&afternoon), "Saturday 3PM");
        }

        #[test]
        fn test_full_time() {
            assert_eq!(full_time(&saturday_morning()), "2023-06-17 08:00");
        }
    }
}

/// Score and weather display helpers
pub mod display {
    /// Compass points used for wind and climb directions.
    const COMPASS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];

    /// Render a score as a signed percentage relative to neutral (1.0).
    pub fn display_score(score: f64) -> String {
        format!("{:.2}%", (score - 1.0) * 100.0)
    }

    /// Bucket a score into -5..=5. Positive ranks are favorable (score below 1.0).
    pub fn rank(score: f64) -> i32 {
        let sign = if score > 1.0 { -1 } else { 1 };
        let percent = ((score - 1.0).abs() * 100.0) as i32;
        let bucket = match percent {
            p if p < 1 => 0,
            p if p < 3 => 1,
            p if p < 6 => 2,
            p if p < 10 => 3,
            p if p < 15 => 4,
            _ => 5,
        };
        sign * bucket
    }

    /// Convert a bearing in degrees to a 16-point compass direction.
    pub fn direction(bearing: f64) -> &'static str {
        let normalized = bearing.rem_euclid(360.0);
        let index = ((normalized / 22.5).round() as usize) % COMPASS.len();
        COMPASS[index]
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_display_score() {
            assert_eq!(display_score(1.0), "0.00%");
            assert_eq!(display_score(0.9725), "-2.75%");
            assert_eq!(display_score(1.125), "12.50%");
        }

        #[test]
        fn test_rank() {
            assert_eq!(rank(1.0), 0);
            assert_eq!(rank(0.995), 0);
            assert_eq!(rank(0.98), 1);
            assert_eq!(rank(0.95), 2);
            assert_eq!(rank(0.92), 3);
            assert_eq!(rank(0.88), 4);
            assert_eq!(rank(0.5), 5);
            assert_eq!(rank(1.04), -2);
            assert_eq!(rank(1.2), -5);
        }

        #[test]
        fn test_direction() {
            assert_eq!(direction(0.0), "N");
            assert_eq!(direction(359.0), "N");
            assert_eq!(direction(90.0), "E");
            assert_eq!(direction(200.0), "SSW");
            assert_eq!(direction(-45.0), "NW");
        }
    }
}
