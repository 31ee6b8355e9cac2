//! Conversion settings.
//!
//! Everything the dataset writer would otherwise hard code lives here so tests and sites can
//! substitute their own values. A TOML file can override any subset of the defaults:
//!
//! ```toml
//! institution = "NCAS"
//! title = "2D Sonic NetCDF file"
//! epoch = "first_sample"
//! variables = "polar"
//! vocabulary = "mean-winds-variables.csv"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SonicError};
use crate::tools::date::parse_timestamp;

/// Origin of the time coordinate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEpoch {
    /// 1970-01-01 00:00:00 UTC
    #[default]
    Unix,
    /// The timestamp of the first sample in the series
    FirstSample,
    Fixed(DateTime<Utc>),
}

impl TimeEpoch {
    /// Resolves the epoch for a series starting at `first_sample`.
    ///
    /// The result is truncated to whole seconds, the precision of the CF `units` string that
    /// names it.
    pub fn resolve(&self, first_sample: DateTime<Utc>) -> DateTime<Utc> {
        let epoch = match self {
            TimeEpoch::Unix => DateTime::<Utc>::UNIX_EPOCH,
            TimeEpoch::FirstSample => first_sample,
            TimeEpoch::Fixed(epoch) => *epoch,
        };
        epoch.trunc_subsecs(0)
    }
}

/// Accepts `unix`, `first_sample` or a timestamp for a fixed epoch
impl FromStr for TimeEpoch {
    type Err = SonicError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "unix" => Ok(TimeEpoch::Unix),
            "first_sample" | "first-sample" => Ok(TimeEpoch::FirstSample),
            other => parse_timestamp(other).map(TimeEpoch::Fixed).ok_or_else(|| {
                SonicError::InvalidMetadata(format!("{other:?} is not a valid time epoch"))
            }),
        }
    }
}

/// Which derived wind columns become output variables
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WindVariables {
    /// Speed, direction and both components
    #[default]
    All,
    /// Speed and direction only
    Polar,
    /// Eastward and northward components only
    Cartesian,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub conventions: String,
    pub institution: String,
    pub title: String,
    /// Identifier written into the `history` attribute
    pub script_name: String,
    pub epoch: TimeEpoch,
    pub variables: WindVariables,
    /// Controlled vocabulary table, used when no path is given on the command line
    pub vocabulary: PathBuf,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            conventions: "CF-1.6".into(),
            institution: "NCAS".into(),
            title: "2D Sonic NetCDF file".into(),
            script_name: "sonic2nc".into(),
            epoch: TimeEpoch::Unix,
            variables: WindVariables::All,
            vocabulary: PathBuf::from("mean-winds-variables.csv"),
        }
    }
}

impl ConversionConfig {
    pub fn from_toml(data: &str) -> Result<ConversionConfig> {
        Ok(toml::from_str(data)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ConversionConfig> {
        let data = fs::read_to_string(path)?;
        ConversionConfig::from_toml(&data)
    }
}
