use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::cardinal_direction::CardinalDirection;
use crate::data::rht_data_record::{RhtDataRecord, RhtDataRecordCollection};
use crate::data::tower_sonic_data_record::TowerSonicDataRecordCollection;
use crate::error::{Result, SonicError};
use crate::resample::{resample_rht, resample_wind, RhtAverage, WindAverage};
use crate::sample_series::SonicSample;

/// Latest interval averages for one tower unit (a co-located RHT probe and 2D sonic)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub time: DateTime<Utc>,
    pub u: f64,
    pub v: f64,
    pub wind_speed: f64,
    /// Mathematical angle of the mean wind vector, counterclockwise from east
    pub wind_angle: f64,
    /// Compass point the mean wind vector points toward
    pub cardinal_direction: CardinalDirection,
    pub temperature: f64,
    pub relative_humidity: f64,
}

impl UnitSummary {
    /// Picks the latest bin across both sensors. A sensor without data in that bin
    /// contributes NaN. Returns `None` when neither sensor has any bins.
    pub fn latest(rht: &[RhtAverage], wind: &[WindAverage]) -> Option<UnitSummary> {
        let time = match (rht.last(), wind.last()) {
            (Some(r), Some(w)) => r.start.max(w.start),
            (Some(r), None) => r.start,
            (None, Some(w)) => w.start,
            (None, None) => return None,
        };

        let rht = rht.iter().rev().find(|r| r.start == time);
        let wind = wind.iter().rev().find(|w| w.start == time);

        let (u, v, wind_speed, wind_angle) = match wind {
            Some(w) => (w.wind.u, w.wind.v, w.polar.speed, w.polar.direction),
            None => (f64::NAN, f64::NAN, f64::NAN, f64::NAN),
        };

        Some(UnitSummary {
            time,
            u,
            v,
            wind_speed,
            wind_angle,
            cardinal_direction: wind
                .map(|w| w.polar.cardinal_direction())
                .unwrap_or(CardinalDirection::Invalid),
            temperature: rht.map(|r| r.temperature).unwrap_or(f64::NAN),
            relative_humidity: rht.map(|r| r.relative_humidity).unwrap_or(f64::NAN),
        })
    }

    /// Builds the summary from the raw text of an RHT file and a tower sonic file
    pub fn from_data(rht_data: &str, sonic_data: &str, interval: TimeDelta) -> Result<UnitSummary> {
        let mut rht_collection = RhtDataRecordCollection::from_data(rht_data);
        let rht_records: Vec<RhtDataRecord> = rht_collection.records().collect();

        let mut sonic_collection = TowerSonicDataRecordCollection::from_data(sonic_data);
        let sonic_samples: Vec<SonicSample> = sonic_collection
            .records()
            .map(|r| SonicSample::new(r.timestamp, r.wind()))
            .collect();

        debug!(
            "{} rht records, {} sonic samples",
            rht_records.len(),
            sonic_samples.len()
        );

        let rht = resample_rht(&rht_records, interval)?;
        let wind = resample_wind(&sonic_samples, interval)?;

        UnitSummary::latest(&rht, &wind).ok_or_else(|| {
            SonicError::EmptyResult("neither the RHT nor the sonic file had a usable row".into())
        })
    }

    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        rht_path: P,
        sonic_path: Q,
        interval: TimeDelta,
    ) -> Result<UnitSummary> {
        let rht_data = fs::read_to_string(rht_path)?;
        let sonic_data = fs::read_to_string(sonic_path)?;
        UnitSummary::from_data(&rht_data, &sonic_data, interval)
    }
}

impl fmt::Display for UnitSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}  U {:.1}  V {:.1}  wind {:.1} m/s @ {:.1}° {}  T {:.1} °C  RH {:.1} %",
            self.time.format("%Y-%m-%dT%H:%M:%S"),
            self.u,
            self.v,
            self.wind_speed,
            self.wind_angle,
            self.cardinal_direction,
            self.temperature,
            self.relative_humidity
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::wind::WindVector;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2014, 8, 20, 12, minute, 0).unwrap()
    }

    #[test]
    fn test_latest_prefers_newest_bin() {
        let rht = vec![RhtAverage {
            start: at(0),
            count: 60,
            temperature: 18.0,
            relative_humidity: 70.0,
        }];
        let wind_vector = WindVector::new(0.0, 3.0);
        let wind = vec![WindAverage {
            start: at(1),
            count: 60,
            wind: wind_vector,
            polar: wind_vector.polar(),
        }];

        let summary = UnitSummary::latest(&rht, &wind).unwrap();
        assert_eq!(summary.time, at(1));
        assert_eq!(summary.wind_speed, 3.0);
        assert_eq!(summary.cardinal_direction, CardinalDirection::North);
        assert!(summary.temperature.is_nan());
        assert!(summary.relative_humidity.is_nan());
    }

    #[test]
    fn test_latest_empty() {
        assert!(UnitSummary::latest(&[], &[]).is_none());
    }

    #[test]
    fn test_from_data() {
        let rht = "2014-08-20 12:00:10,0,18.0,70.0\n2014-08-20 12:00:20,0,20.0,72.0\n";
        let sonic = "2014-08-20 12:00:10\tQ\t-001.00\t+001.00\tM\t00\t3A\n";

        let summary = UnitSummary::from_data(rht, sonic, TimeDelta::seconds(60)).unwrap();
        assert_eq!(summary.time, at(0));
        assert_eq!(summary.temperature, 19.0);
        assert_eq!(summary.relative_humidity, 71.0);
        assert_eq!(summary.u, 1.0);
        assert_eq!(summary.v, 1.0);
        assert!((summary.wind_angle - 45.0).abs() < 1e-9);
        assert_eq!(
            summary.to_string(),
            "2014-08-20T12:00:00  U 1.0  V 1.0  wind 1.4 m/s @ 45.0° ne  T 19.0 °C  RH 71.0 %"
        );
    }
}
