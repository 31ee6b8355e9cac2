//! Command line arguments for sonic2nc

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{TimeEpoch, WindVariables};

#[derive(Debug, Parser, Clone)]
#[command(version, about)]
pub struct SonicArgs {
    /// Which task to perform, conversion to NetCDF or a tower status summary
    #[command(subcommand)]
    pub command: CommandTask,
}

#[derive(Debug, Subcommand, Clone)]
pub enum CommandTask {
    /// Convert raw 2D sonic captures into one NetCDF dataset
    Convert(ConvertCommand),

    /// Print the latest interval averages for one tower unit as JSON
    Summary(SummaryCommand),
}

#[derive(Debug, Args, Clone)]
pub struct ConvertCommand {
    /// Raw capture files, in chronological order
    #[arg(required = true, num_args = 1..)]
    pub infiles: Vec<PathBuf>,

    /// Output file, or a directory to write sonic_2d_data.nc into
    #[arg(short = 'o', long = "outfile", default_value = "sonic_2d_data.nc")]
    pub outfile: PathBuf,

    /// Site metadata table with platform_latitude and platform_longitude
    #[arg(short = 'm', long = "metadata", default_value = "meta-data.csv")]
    pub metadata: PathBuf,

    /// Controlled vocabulary table, overrides the configured one
    #[arg(long = "vocabulary")]
    pub vocabulary: Option<PathBuf>,

    /// TOML conversion settings
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Time coordinate origin: unix, first_sample or a timestamp
    #[arg(long = "epoch", value_parser = parse_epoch)]
    pub epoch: Option<TimeEpoch>,

    /// Which wind variables to write
    #[arg(long = "variables", value_enum)]
    pub variables: Option<WindVariables>,

    /// Recorded as processing_software_url
    #[arg(long = "repository-url", default_value = env!("CARGO_PKG_REPOSITORY"))]
    pub repository_url: String,

    /// Recorded as processing_software_version
    #[arg(long = "revision", default_value = env!("CARGO_PKG_VERSION"))]
    pub revision: String,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryCommand {
    /// Unit identifier used as the JSON key
    #[arg(short = 'u', long = "unit")]
    pub unit: String,

    /// RHT probe log for the unit
    #[arg(long = "rht")]
    pub rht: PathBuf,

    /// Tower sonic log for the unit
    #[arg(long = "sonic")]
    pub sonic: PathBuf,

    /// Averaging interval in seconds
    #[arg(short = 'i', long = "interval", default_value_t = 60)]
    pub interval: i64,
}

fn parse_epoch(raw: &str) -> Result<TimeEpoch, String> {
    raw.parse().map_err(|e: crate::error::SonicError| e.to_string())
}
