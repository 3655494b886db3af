//! Builds the full site model and writes it as JSON.

use crate::{
    inputs::{grid_context, Inputs},
    SiteArgs,
};
use anyhow::Context;
use chrono::{TimeZone, Utc};
use log::{error, info};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use windsock_forecast::{
    climb::Climb,
    conditions::Forecast,
    context::GridContext,
    historical::HistoricalLookup,
    scoring::WindOracle,
    site::{build_site, Site, SiteBuild},
};

/// Site model as written to disk, with failed climbs listed by message.
#[derive(Serialize)]
pub struct SiteOutput<'a> {
    #[serde(flatten)]
    pub site: &'a Site,
    pub failures: Vec<String>,
}

/// Run the engine with the reference oracle and log every failed climb.
pub fn build<Tz: TimeZone + Sync>(
    ctx: &GridContext<Tz>,
    climbs: Vec<(Climb, Forecast)>,
    hidden: usize,
    lookup: &dyn HistoricalLookup,
) -> SiteBuild {
    let build = build_site(ctx, climbs, hidden, lookup, &WindOracle);
    for failure in &build.failures {
        error!("{failure}");
    }
    build
}

/// Serialize the site model to `output`.
pub fn write_site(build: &SiteBuild, output: &str) -> anyhow::Result<()> {
    let file = File::create(output).with_context(|| format!("failed to create {output}"))?;
    let data = SiteOutput {
        site: &build.site,
        failures: build.failures.iter().map(|f| f.to_string()).collect(),
    };
    serde_json::to_writer_pretty(BufWriter::new(file), &data)
        .with_context(|| format!("failed to write site model {output}"))?;
    info!(
        "wrote {} pages for {} climbs to {}",
        build.site.pages.len(),
        build.site.climbs.len(),
        output
    );
    Ok(())
}

/// Fails when climbs were requested but none could be built.
pub fn ensure_built(build: &SiteBuild, requested: usize) -> anyhow::Result<()> {
    if requested > 0 && build.site.climbs.is_empty() {
        anyhow::bail!("none of the {requested} climbs could be built");
    }
    Ok(())
}

pub fn run_generate(args: &SiteArgs, output: &str) -> anyhow::Result<()> {
    let ctx = grid_context(args, Utc::now())?;
    let mut inputs = Inputs::load(args)?;
    let hidden = inputs.hidden;
    let climbs = inputs.take_forecasts();
    let requested = climbs.len();

    let site_build = build(&ctx, climbs, hidden, inputs.lookup());
    write_site(&site_build, output)?;
    ensure_built(&site_build, requested)
}
