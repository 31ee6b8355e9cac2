//! Fixed interval averaging for the tower status display.
//!
//! Bins are aligned to whole multiples of the interval counted from the Unix epoch and
//! labelled by their start time. Means skip NaN; a bin with nothing but NaN averages to NaN.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::data::rht_data_record::RhtDataRecord;
use crate::error::{Result, SonicError};
use crate::sample_series::SonicSample;
use crate::tools::vector::nan_mean;
use crate::wind::{PolarWind, WindVector};

/// Mean wind over one interval. The polar form is recomputed from the mean vector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindAverage {
    pub start: DateTime<Utc>,
    pub count: usize,
    pub wind: WindVector,
    pub polar: PolarWind,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RhtAverage {
    pub start: DateTime<Utc>,
    pub count: usize,
    pub temperature: f64,
    pub relative_humidity: f64,
}

fn interval_seconds(interval: TimeDelta) -> Result<i64> {
    let seconds = interval.num_seconds();
    if seconds < 1 || interval.subsec_nanos() != 0 {
        return Err(SonicError::InvalidInterval(format!(
            "{interval} is not a whole number of seconds of at least one second"
        )));
    }
    Ok(seconds)
}

fn bin_start(bin: i64, seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(bin * seconds, 0)
        .ok_or_else(|| SonicError::InvalidInterval(format!("bin {bin} is out of range")))
}

/// Groups values by bin index, keeping bins in ascending time order
fn bin_by<T, F>(items: &[T], seconds: i64, timestamp: F) -> BTreeMap<i64, Vec<&T>>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut bins: BTreeMap<i64, Vec<&T>> = BTreeMap::new();
    for item in items {
        let bin = timestamp(item).timestamp().div_euclid(seconds);
        bins.entry(bin).or_default().push(item);
    }
    bins
}

/// Averages wind samples into fixed interval bins, earliest bin first. The input does not
/// need to be sorted.
pub fn resample_wind(samples: &[SonicSample], interval: TimeDelta) -> Result<Vec<WindAverage>> {
    let seconds = interval_seconds(interval)?;

    bin_by(samples, seconds, |s| s.timestamp)
        .into_iter()
        .map(|(bin, members)| {
            let u: Vec<f64> = members.iter().map(|s| s.wind.u).collect();
            let v: Vec<f64> = members.iter().map(|s| s.wind.v).collect();
            let wind = WindVector::new(nan_mean(&u), nan_mean(&v));
            Ok(WindAverage {
                start: bin_start(bin, seconds)?,
                count: members.len(),
                wind,
                polar: wind.polar(),
            })
        })
        .collect()
}

/// Averages RHT records into fixed interval bins, earliest bin first
pub fn resample_rht(records: &[RhtDataRecord], interval: TimeDelta) -> Result<Vec<RhtAverage>> {
    let seconds = interval_seconds(interval)?;

    bin_by(records, seconds, |r| r.timestamp)
        .into_iter()
        .map(|(bin, members)| {
            let temperature: Vec<f64> = members.iter().map(|r| r.temperature).collect();
            let relative_humidity: Vec<f64> = members.iter().map(|r| r.relative_humidity).collect();
            Ok(RhtAverage {
                start: bin_start(bin, seconds)?,
                count: members.len(),
                temperature: nan_mean(&temperature),
                relative_humidity: nan_mean(&relative_humidity),
            })
        })
        .collect()
}
