use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::data::frame::FrameBuffer;
use crate::data::sonic_data_record::{SonicDataRecord, SonicDataRecordCollection};
use crate::error::{Result, SonicError};
use crate::tools::vector::min_max;
use crate::wind::{PolarWind, WindVector};

/// One time stamped wind sample with both the cartesian and polar forms
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SonicSample {
    pub timestamp: DateTime<Utc>,
    pub wind: WindVector,
    pub polar: PolarWind,
}

impl SonicSample {
    pub fn new(timestamp: DateTime<Utc>, wind: WindVector) -> SonicSample {
        SonicSample {
            timestamp,
            wind,
            polar: wind.polar(),
        }
    }
}

/// Wind samples for one processing run.
///
/// Samples keep the order they were loaded in: files in the order given, rows in file order.
/// Nothing is sorted or deduplicated, so callers that need a chronological series across
/// files must hand the files over in chronological order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SampleSeries {
    samples: Vec<SonicSample>,
}

impl SampleSeries {
    pub fn new() -> SampleSeries {
        SampleSeries::default()
    }

    /// Builds samples from parsed records. Records without a timestamp cannot be placed on
    /// the time axis and are dropped; missing wind values are kept as NaN.
    pub fn from_records<I>(records: I) -> SampleSeries
    where
        I: IntoIterator<Item = SonicDataRecord>,
    {
        let mut untimed = 0usize;
        let samples = records
            .into_iter()
            .filter_map(|record| match record.timestamp {
                Some(timestamp) => Some(SonicSample::new(timestamp, record.wind())),
                None => {
                    untimed += 1;
                    None
                }
            })
            .collect();

        if untimed > 0 {
            debug!("dropped {untimed} records without a timestamp");
        }

        SampleSeries { samples }
    }

    /// Runs frame validation, parsing and the axis transform over a cleaned frame buffer
    pub fn from_frames(frames: &FrameBuffer) -> SampleSeries {
        let mut collection = SonicDataRecordCollection::from_data(frames.as_str());
        SampleSeries::from_records(collection.records())
    }

    /// Same as [`SampleSeries::from_frames`] for a raw capture held in memory
    pub fn from_capture(data: &[u8]) -> SampleSeries {
        SampleSeries::from_frames(&FrameBuffer::from_bytes(data))
    }

    /// Loads one raw capture file. The file is closed before this returns.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SampleSeries> {
        let path = path.as_ref();
        let frames = {
            let file = File::open(path)?;
            FrameBuffer::from_reader(BufReader::new(file))?
        };

        let series = SampleSeries::from_frames(&frames);
        info!(
            "{}: {} good frames, {} samples",
            path.display(),
            frames.len(),
            series.len()
        );
        Ok(series)
    }

    /// Loads and concatenates captures in the given order.
    ///
    /// Fails with [`SonicError::EmptyResult`] when `paths` is empty or no file yields a
    /// sample. Files without samples are otherwise skipped.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<SampleSeries> {
        if paths.is_empty() {
            return Err(SonicError::EmptyResult("no input files given".into()));
        }

        let mut series = SampleSeries::new();
        for path in paths {
            let file_series = SampleSeries::from_file(path)?;
            if file_series.is_empty() {
                warn!("{}: no usable samples", path.as_ref().display());
            }
            series.append(file_series);
        }

        if series.is_empty() {
            return Err(SonicError::EmptyResult(format!(
                "none of the {} input files contained a valid sample",
                paths.len()
            )));
        }

        let (slowest, fastest) = min_max(&series.wind_speed());
        info!(
            "{} samples, wind speed {slowest:.2} to {fastest:.2} m/s",
            series.len()
        );
        Ok(series)
    }

    /// Moves every sample of `other` onto the end of this series
    pub fn append(&mut self, mut other: SampleSeries) {
        self.samples.append(&mut other.samples);
    }

    pub fn push(&mut self, sample: SonicSample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[SonicSample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &SonicSample> {
        self.samples.iter()
    }

    /// Timestamp of the first sample in series order
    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.samples.first().map(|s| s.timestamp)
    }

    /// Timestamp of the last sample in series order
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.samples.last().map(|s| s.timestamp)
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    pub fn eastward_wind(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.wind.u).collect()
    }

    pub fn northward_wind(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.wind.v).collect()
    }

    pub fn wind_speed(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.polar.speed).collect()
    }

    pub fn wind_direction(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.polar.direction).collect()
    }
}

impl FromIterator<SonicSample> for SampleSeries {
    fn from_iter<T: IntoIterator<Item = SonicSample>>(iter: T) -> Self {
        SampleSeries {
            samples: iter.into_iter().collect(),
        }
    }
}
