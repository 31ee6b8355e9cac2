use chrono::{DateTime, Utc};
use csv::Reader;
use serde::{Deserialize, Serialize};

use crate::wind::WindVector;

use super::parseable_data_record::{
    parse_time_value, parse_value, require_fields, DataRecordParsingError, ParseableDataRecord,
};

const TIMESTAMP_FIELD: usize = 2;
const AXIS1_FIELD: usize = 3;
const AXIS2_FIELD: usize = 4;

/// One reading from a Gill 2D sonic, still in the sensor's own axis convention
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SonicDataRecord {
    /// Device timestamp, `None` when the logger wrote a missing marker
    pub timestamp: Option<DateTime<Utc>>,
    pub axis1_raw: f64,
    pub axis2_raw: f64,
}

impl SonicDataRecord {
    pub fn wind(&self) -> WindVector {
        WindVector::from_gill_axes(self.axis1_raw, self.axis2_raw)
    }
}

impl ParseableDataRecord for SonicDataRecord {
    /// Expects a cleaned frame split on commas: system time, timezone, device time, axis 1,
    /// axis 2 and then the unit, status and checksum fields which are ignored.
    fn from_data_row(row: &[&str]) -> Result<SonicDataRecord, DataRecordParsingError> {
        require_fields(row, AXIS2_FIELD + 1)?;

        Ok(SonicDataRecord {
            timestamp: parse_time_value(row[TIMESTAMP_FIELD])?,
            axis1_raw: parse_value(row[AXIS1_FIELD])?,
            axis2_raw: parse_value(row[AXIS2_FIELD])?,
        })
    }
}

/// Reads the cleaned frame buffer produced by [`super::frame::FrameBuffer`]
pub struct SonicDataRecordCollection<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> SonicDataRecordCollection<'a> {
    pub fn from_data(data: &'a str) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_bytes());

        SonicDataRecordCollection { reader }
    }

    /// Iterates the parseable rows. Rows that fail to parse are skipped.
    pub fn records(&'a mut self) -> impl Iterator<Item = SonicDataRecord> + 'a {
        self.reader
            .records()
            .map(|result| -> Result<SonicDataRecord, DataRecordParsingError> {
                match result {
                    Ok(record) => {
                        let row: Vec<&str> = record.iter().collect();
                        SonicDataRecord::from_data_row(&row)
                    }
                    Err(e) => Err(DataRecordParsingError::ParseFailure(e.to_string())),
                }
            })
            .filter_map(|d| d.ok())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_sonic_data_row_parse() {
        let raw_data =
            "2017-08-30 01:17:51,UTC,2017-08-30T01:17:52.906838,+002.03,+000.64,M,00,\x03";
        let data_row: Vec<&str> = raw_data.split(',').collect();

        let sonic_data = SonicDataRecord::from_data_row(&data_row).unwrap();
        let timestamp = sonic_data.timestamp.unwrap();

        assert_eq!(timestamp.year(), 2017);
        assert_eq!(timestamp.minute(), 17);
        assert_eq!(timestamp.nanosecond(), 906_838_000);
        assert_eq!(sonic_data.axis1_raw, 2.03);
        assert_eq!(sonic_data.axis2_raw, 0.64);

        let wind = sonic_data.wind();
        assert_eq!(wind.u, -2.03);
        assert_eq!(wind.v, 0.64);
    }

    #[test]
    fn test_missing_markers_retained() {
        let raw_data = "2017-08-30 01:17:51,UTC,2017-08-30T01:17:52.906838,M,Ó,M,00,\x03";
        let data_row: Vec<&str> = raw_data.split(',').collect();

        let sonic_data = SonicDataRecord::from_data_row(&data_row).unwrap();
        assert!(sonic_data.timestamp.is_some());
        assert!(sonic_data.axis1_raw.is_nan());
        assert!(sonic_data.axis2_raw.is_nan());

        let raw_data = "2017-08-30 01:17:51,UTC,M,+001.00,+001.00";
        let data_row: Vec<&str> = raw_data.split(',').collect();
        let sonic_data = SonicDataRecord::from_data_row(&data_row).unwrap();
        assert!(sonic_data.timestamp.is_none());
    }

    #[test]
    fn test_short_row_rejected() {
        let data_row = vec!["2017-08-30 01:17:51", "UTC", "2017-08-30T01:17:52.906838"];
        assert!(SonicDataRecord::from_data_row(&data_row).is_err());
    }

    #[test]
    fn test_collection_skips_bad_rows() {
        let data = "\
2017-08-30 01:17:51,UTC,2017-08-30T01:17:52.906838,+002.03,+000.64,M,00,\x03
not,a,row
2017-08-30 01:17:52,UTC,2017-08-30T01:17:53.156838,+00x.03,+000.64,M,00,\x03
2017-08-30 01:17:52,UTC,2017-08-30T01:17:53.406838,-001.10,+000.20,M,00,\x03
";
        let mut collection = SonicDataRecordCollection::from_data(data);
        let records: Vec<SonicDataRecord> = collection.records().collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].axis1_raw, 2.03);
        assert_eq!(records[1].axis1_raw, -1.1);
        assert!(records[0].timestamp < records[1].timestamp);
    }
}
