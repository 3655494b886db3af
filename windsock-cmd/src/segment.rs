//! Single-segment site: one climb page, no history and no sequence.

use crate::{
    generate::{build, ensure_built, write_site},
    inputs::{grid_context, Inputs},
    SiteArgs,
};
use chrono::Utc;
use log::{info, warn};
use windsock_forecast::{climb::Climb, historical::NoHistoricalData};

pub fn run_segment(args: &SiteArgs, segment_id: i64, output: &str) -> anyhow::Result<()> {
    let ctx = grid_context(args, Utc::now())?;
    let mut inputs = Inputs::load(args)?;

    let Some(known) = inputs.climbs.iter().find(|c| c.segment.id == segment_id) else {
        anyhow::bail!("segment {segment_id} is not in any climbs file");
    };
    let climb = Climb::from_segment(known.segment.clone());
    let forecast = inputs.forecasts.remove(&segment_id).unwrap_or_else(|| {
        warn!("{}: no forecast for segment {segment_id}", climb.name);
        Default::default()
    });
    if args.historical.is_some() {
        info!("ignoring historical averages for a single segment");
    }

    let site_build = build(&ctx, vec![(climb, forecast)], 0, &NoHistoricalData);
    write_site(&site_build, output)?;
    ensure_built(&site_build, 1)
}
