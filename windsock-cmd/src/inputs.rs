//! Loading of climbs, forecasts and historical averages from disk.

use crate::SiteArgs;
use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::{info, warn};
use std::collections::HashMap;
use windsock_forecast::{
    climb::Climb,
    conditions::Forecast,
    context::{GridContext, HourWindow, View},
    historical::{HistoricalClimbAverages, HistoricalLookup, NoHistoricalData},
};

/// Everything read from the input files of a run.
#[derive(Debug, Default)]
pub struct Inputs {
    /// Visible climbs first, then hidden ones.
    pub climbs: Vec<Climb>,
    /// Number of visible climbs at the front of `climbs`.
    pub hidden: usize,
    pub forecasts: HashMap<i64, Forecast>,
    pub historical: Option<HistoricalClimbAverages>,
}

impl Inputs {
    pub fn load(args: &SiteArgs) -> anyhow::Result<Self> {
        let mut climbs = read_climbs(&args.climbs)?;
        let hidden = climbs.len();
        if let Some(path) = &args.hidden_climbs {
            climbs.extend(read_climbs(path)?);
        }

        let forecasts_json = std::fs::read_to_string(&args.forecasts)
            .with_context(|| format!("failed to read forecasts {}", args.forecasts))?;
        let forecasts = Forecast::parse_forecasts_json(&forecasts_json)
            .with_context(|| format!("failed to parse forecasts {}", args.forecasts))?;

        let historical = match &args.historical {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read historical averages {path}"))?;
                let averages = HistoricalClimbAverages::parse_json(&json)
                    .with_context(|| format!("failed to parse historical averages {path}"))?;
                Some(averages)
            }
            None => None,
        };

        info!(
            "loaded {} climbs ({} visible), {} forecasts, historical averages for {} segments",
            climbs.len(),
            hidden,
            forecasts.len(),
            historical.as_ref().map_or(0, |h| h.0.len())
        );
        Ok(Inputs {
            climbs,
            hidden,
            forecasts,
            historical,
        })
    }

    /// Pair each climb with its forecast. A climb without one gets an empty forecast.
    pub fn take_forecasts(&mut self) -> Vec<(Climb, Forecast)> {
        let climbs = std::mem::take(&mut self.climbs);
        climbs
            .into_iter()
            .map(|climb| {
                let forecast = self.forecasts.remove(&climb.segment.id).unwrap_or_else(|| {
                    warn!(
                        "{}: no forecast for segment {}",
                        climb.name, climb.segment.id
                    );
                    Forecast::default()
                });
                (climb, forecast)
            })
            .collect()
    }

    pub fn lookup(&self) -> &dyn HistoricalLookup {
        match &self.historical {
            Some(averages) => averages,
            None => &NoHistoricalData,
        }
    }
}

pub fn read_climbs(path: &str) -> anyhow::Result<Vec<Climb>> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("failed to read climbs {path}"))?;
    Climb::parse_climbs_json(&json).with_context(|| format!("failed to parse climbs {path}"))
}

/// Build the immutable run context from command-line settings.
pub fn grid_context(args: &SiteArgs, generated_at: DateTime<Utc>) -> anyhow::Result<GridContext<Tz>> {
    let tz: Tz = args
        .timezone
        .parse()
        .map_err(|e| anyhow!("unknown time zone {}: {e}", args.timezone))?;
    let window = HourWindow::new(args.min, args.max)?;
    let view = if args.default_historical {
        View::Historical
    } else {
        View::Baseline
    };
    Ok(GridContext::new(generated_at, tz, window)
        .with_default_view(view)
        .with_title(args.title.clone())
        .with_absolute_url(args.absolute_url.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{write_inputs, KINGS_MOUNTAIN, OLD_LA_HONDA};

    #[test]
    fn test_load_and_pair_forecasts() {
        let dir = tempfile::tempdir().unwrap();
        let args = write_inputs(dir.path(), &[OLD_LA_HONDA, KINGS_MOUNTAIN]);
        let mut inputs = Inputs::load(&args).unwrap();
        assert_eq!(inputs.hidden, 3);
        assert!(inputs.historical.is_none());

        let paired = inputs.take_forecasts();
        assert_eq!(paired.len(), 3);
        assert_eq!(paired[0].1.hourly.len(), 7 * 24);
        // Page Mill has no cached forecast.
        assert!(paired[2].1.hourly.is_empty());
    }

    #[test]
    fn test_hidden_climbs_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = write_inputs(dir.path(), &[OLD_LA_HONDA]);
        let extra = dir.path().join("hidden.json");
        std::fs::write(
            &extra,
            r#"[{"name": "Hicks", "segment": {"name": "Hicks Rd", "id": 7,
                "distance": 2900.0, "average_grade": 0.09}}]"#,
        )
        .unwrap();
        args.hidden_climbs = Some(extra.display().to_string());

        let inputs = Inputs::load(&args).unwrap();
        assert_eq!(inputs.climbs.len(), 4);
        assert_eq!(inputs.hidden, 3);
        assert_eq!(inputs.climbs[3].name, "Hicks");
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = write_inputs(dir.path(), &[]);
        args.forecasts = dir.path().join("nope.json").display().to_string();
        let err = Inputs::load(&args).unwrap_err();
        assert!(format!("{err}").contains("nope.json"));
    }

    #[test]
    fn test_grid_context_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = write_inputs(dir.path(), &[]);
        args.default_historical = true;
        let ctx = grid_context(&args, Utc::now()).unwrap();
        assert_eq!(ctx.default_view, View::Historical);
        assert_eq!(ctx.window.width(), 13);
        assert_eq!(ctx.title, "Windsock - Bay Area");

        args.timezone = String::from("Mars/Olympus_Mons");
        assert!(grid_context(&args, Utc::now()).is_err());

        args.timezone = String::from(crate::DEFAULT_TIMEZONE);
        args.min = 18;
        args.max = 6;
        assert!(grid_context(&args, Utc::now()).is_err());
    }
}
