//! CSV summary of each climb's current and best conditions.

use crate::{
    generate::{build, ensure_built},
    inputs::{grid_context, Inputs},
    SiteArgs,
};
use anyhow::Context;
use chrono::Utc;
use log::info;
use serde::Serialize;
use windsock_forecast::{
    conditions::ScoredCondition,
    context::View,
    grid::ClimbForecast,
};

#[derive(Debug, Serialize, PartialEq)]
pub struct SummaryRow {
    pub climb: String,
    pub slug: String,
    pub direction: &'static str,
    pub current_time: Option<String>,
    pub current_baseline: Option<String>,
    pub current_historical: Option<String>,
    pub best_baseline_time: Option<String>,
    pub best_baseline: Option<String>,
    pub best_historical_time: Option<String>,
    pub best_historical: Option<String>,
}

impl SummaryRow {
    pub fn new(cf: &ClimbForecast) -> Self {
        let current = cf.grid.current.as_ref();
        let best_baseline = cf.grid.best(View::Baseline);
        let best_historical = cf.grid.best(View::Historical);
        SummaryRow {
            climb: cf.climb.name.clone(),
            slug: cf.slug(),
            direction: cf.direction(),
            current_time: current.map(ScoredCondition::full_time),
            current_baseline: current.and_then(|c| c.display_score(View::Baseline)),
            current_historical: current.and_then(|c| c.display_score(View::Historical)),
            best_baseline_time: best_baseline.map(ScoredCondition::full_time),
            best_baseline: best_baseline.and_then(|c| c.display_score(View::Baseline)),
            best_historical_time: best_historical.map(ScoredCondition::full_time),
            best_historical: best_historical.and_then(|c| c.display_score(View::Historical)),
        }
    }
}

pub fn run_summary(args: &SiteArgs, output: &str) -> anyhow::Result<()> {
    let ctx = grid_context(args, Utc::now())?;
    let mut inputs = Inputs::load(args)?;
    let hidden = inputs.hidden;
    let climbs = inputs.take_forecasts();
    let requested = climbs.len();

    let site_build = build(&ctx, climbs, hidden, inputs.lookup());
    ensure_built(&site_build, requested)?;

    let mut wtr =
        csv::Writer::from_path(output).with_context(|| format!("failed to create {output}"))?;
    for cf in &site_build.site.climbs {
        wtr.serialize(SummaryRow::new(cf))?;
    }
    wtr.flush()?;
    info!(
        "wrote summary of {} climbs to {}",
        site_build.site.climbs.len(),
        output
    );
    Ok(())
}
