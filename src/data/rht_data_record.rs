use chrono::{DateTime, Utc};
use csv::Reader;
use serde::{Deserialize, Serialize};

use super::parseable_data_record::{
    parse_time_value, parse_value, require_fields, DataRecordParsingError, ParseableDataRecord,
};

/// Relative humidity and temperature reading from a tower RHT probe.
///
/// Rows look like `DateTime,<unused>,TempSH,RH`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RhtDataRecord {
    pub timestamp: DateTime<Utc>,
    /// Air temperature in degrees celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub relative_humidity: f64,
}

impl ParseableDataRecord for RhtDataRecord {
    fn from_data_row(row: &[&str]) -> Result<RhtDataRecord, DataRecordParsingError> {
        require_fields(row, 4)?;

        let timestamp = parse_time_value(row[0])?.ok_or(DataRecordParsingError::InvalidData)?;

        Ok(RhtDataRecord {
            timestamp,
            temperature: parse_value(row[2])?,
            relative_humidity: parse_value(row[3])?,
        })
    }
}

pub struct RhtDataRecordCollection<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> RhtDataRecordCollection<'a> {
    pub fn from_data(data: &'a str) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .trim(csv::Trim::All)
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_bytes());

        RhtDataRecordCollection { reader }
    }

    pub fn records(&'a mut self) -> impl Iterator<Item = RhtDataRecord> + 'a {
        self.reader
            .records()
            .map(|result| -> Result<RhtDataRecord, DataRecordParsingError> {
                match result {
                    Ok(record) => {
                        let row: Vec<&str> = record.iter().collect();
                        RhtDataRecord::from_data_row(&row)
                    }
                    Err(e) => Err(DataRecordParsingError::ParseFailure(e.to_string())),
                }
            })
            .filter_map(|d| d.ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rht_data_row_parse() {
        let data_row = vec!["2014-08-20 12:00:01", "0", "18.25", "71.5"];
        let rht = RhtDataRecord::from_data_row(&data_row).unwrap();
        assert_eq!(rht.temperature, 18.25);
        assert_eq!(rht.relative_humidity, 71.5);
    }

    #[test]
    fn test_rht_collection() {
        let data = "2014-08-20 12:00:01,0,18.25,71.5\n2014-08-20 12:00:02,0,M,71.0\nbroken\n";
        let mut collection = RhtDataRecordCollection::from_data(data);
        let records: Vec<RhtDataRecord> = collection.records().collect();
        assert_eq!(records.len(), 2);
        assert!(records[1].temperature.is_nan());
    }
}
