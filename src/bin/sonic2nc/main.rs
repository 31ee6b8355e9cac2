//! Command line front end: `convert` builds a NetCDF dataset from raw captures and
//! `summary` prints the latest tower averages as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::TimeDelta;
use clap::Parser;
use log::{error, info};

use sonicrs::{
    args::{
        CommandTask::{Convert, Summary},
        ConvertCommand, SonicArgs, SummaryCommand,
    },
    config::ConversionConfig,
    dataset::{write_netcdf, DatasetBuilder, Provenance},
    metadata::{SiteMetadata, Vocabulary},
    sample_series::SampleSeries,
    summary::UnitSummary,
    Result,
};

const DEFAULT_FILE_NAME: &str = "sonic_2d_data.nc";

// Example:
// cargo run --bin sonic2nc -- convert capture-01.txt capture-02.txt
//                             --outfile  out/
//                             --metadata meta-data.csv
//                             --epoch    first_sample

fn main() -> ExitCode {
    env_logger::init();
    let args = SonicArgs::parse();

    let result = match args.command {
        Convert(command) => convert(command),
        Summary(command) => summary(command),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("sonic2nc: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Resolves the output file and makes sure its directory exists
fn output_path(outfile: &Path) -> Result<PathBuf> {
    let is_dir = outfile.is_dir() || outfile.as_os_str().to_string_lossy().ends_with('/');
    let path = if is_dir {
        outfile.join(DEFAULT_FILE_NAME)
    } else {
        outfile.to_path_buf()
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(path)
}

fn convert(command: ConvertCommand) -> Result<()> {
    let mut config = match &command.config {
        Some(path) => ConversionConfig::from_path(path)?,
        None => ConversionConfig::default(),
    };
    if let Some(epoch) = command.epoch {
        config.epoch = epoch;
    }
    if let Some(variables) = command.variables {
        config.variables = variables;
    }
    if let Some(vocabulary) = command.vocabulary {
        config.vocabulary = vocabulary;
    }

    let vocabulary = Vocabulary::from_path(&config.vocabulary)?;
    let site = SiteMetadata::from_path(&command.metadata)?;
    let provenance = Provenance {
        repository_url: command.repository_url,
        revision: command.revision,
    };

    let series = SampleSeries::from_files(&command.infiles)?;
    info!("{} samples from {} files", series.len(), command.infiles.len());

    let dataset = DatasetBuilder::new(&config, &vocabulary, &site, &provenance).build(&series)?;

    let path = output_path(&command.outfile)?;
    write_netcdf(&dataset, &path)?;
    println!("{}", path.display());
    Ok(())
}

fn summary(command: SummaryCommand) -> Result<()> {
    let summary = UnitSummary::from_files(
        &command.rht,
        &command.sonic,
        TimeDelta::seconds(command.interval),
    )?;
    info!("unit {}: {summary}", command.unit);

    let mut units = BTreeMap::new();
    units.insert(command.unit, summary);
    let json = serde_json::to_string_pretty(&units)?;
    println!("{json}");
    Ok(())
}
