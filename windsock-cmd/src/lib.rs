//! Command implementations for Windsock CLI.
//!
//! Loads climbs, cached forecasts and historical averages from disk, runs the
//! forecast grid engine and writes the resulting site model or a summary.

use clap::{Args, Subcommand};
use windsock_forecast::context::{MAX_HOUR_DEFAULT, MIN_HOUR_DEFAULT};

pub mod generate;
pub mod inputs;
pub mod segment;
pub mod summary;

/// Default IANA zone the site is generated in.
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";

/// Default site title.
pub const DEFAULT_TITLE: &str = "Windsock - Bay Area";

/// Inputs and settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    /// JSON array of climbs shown in the site's sequence
    #[arg(short = 'c', long)]
    pub climbs: String,

    /// JSON array of extra climbs that get pages but stay out of the sequence
    #[arg(long)]
    pub hidden_climbs: Option<String>,

    /// Cached hourly forecasts keyed by segment id
    #[arg(short = 'f', long)]
    pub forecasts: String,

    /// Historical monthly/hourly averages keyed by segment id
    #[arg(long)]
    pub historical: Option<String>,

    /// First hour [0-23] included in forecasts
    #[arg(long, default_value_t = MIN_HOUR_DEFAULT)]
    pub min: u32,

    /// Last hour [0-23] included in forecasts
    #[arg(long, default_value_t = MAX_HOUR_DEFAULT)]
    pub max: u32,

    /// Time zone the site is generated in
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// Make the historical view the default one
    #[arg(long)]
    pub default_historical: bool,

    /// Absolute URL of the site root
    #[arg(long, default_value = "")]
    pub absolute_url: String,

    /// Site title
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the linked site model for every climb
    Generate {
        #[command(flatten)]
        site: SiteArgs,

        /// Output path for the site model JSON
        #[arg(short = 'o', long)]
        output: String,
    },

    /// Build the site model for a single segment, without history or sequence
    Segment {
        #[command(flatten)]
        site: SiteArgs,

        /// Strava segment id to render
        #[arg(short = 's', long)]
        segment_id: i64,

        /// Output path for the site model JSON
        #[arg(short = 'o', long)]
        output: String,
    },

    /// Write each climb's current and best conditions as CSV
    Summary {
        #[command(flatten)]
        site: SiteArgs,

        /// Output path for the summary CSV
        #[arg(short = 'o', long)]
        output: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Generate { site, output } => generate::run_generate(&site, &output),
        Command::Segment {
            site,
            segment_id,
            output,
        } => segment::run_segment(&site, segment_id, &output),
        Command::Summary { site, output } => summary::run_summary(&site, &output),
    }
}
