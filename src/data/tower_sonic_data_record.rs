use chrono::{DateTime, Utc};
use csv::Reader;
use serde::{Deserialize, Serialize};

use crate::wind::WindVector;

use super::parseable_data_record::{
    parse_time_value, parse_value, require_fields, DataRecordParsingError, ParseableDataRecord,
};

/// A 2D sonic reading from the tower loggers' tab separated files:
/// `DateTime  node  UGILL  VGILL  Units  Status  Checksum`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TowerSonicDataRecord {
    pub timestamp: DateTime<Utc>,
    pub node: String,
    pub axis1_raw: f64,
    pub axis2_raw: f64,
    pub status: String,
}

impl TowerSonicDataRecord {
    pub fn wind(&self) -> WindVector {
        WindVector::from_gill_axes(self.axis1_raw, self.axis2_raw)
    }
}

impl ParseableDataRecord for TowerSonicDataRecord {
    fn from_data_row(row: &[&str]) -> Result<TowerSonicDataRecord, DataRecordParsingError> {
        require_fields(row, 4)?;

        let timestamp = parse_time_value(row[0])?.ok_or(DataRecordParsingError::InvalidData)?;

        Ok(TowerSonicDataRecord {
            timestamp,
            node: row[1].to_string(),
            axis1_raw: parse_value(row[2])?,
            axis2_raw: parse_value(row[3])?,
            status: row.get(5).map(|s| s.to_string()).unwrap_or_default(),
        })
    }
}

pub struct TowerSonicDataRecordCollection<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> TowerSonicDataRecordCollection<'a> {
    pub fn from_data(data: &'a str) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .trim(csv::Trim::All)
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_bytes());

        TowerSonicDataRecordCollection { reader }
    }

    pub fn records(&'a mut self) -> impl Iterator<Item = TowerSonicDataRecord> + 'a {
        self.reader
            .records()
            .map(|result| -> Result<TowerSonicDataRecord, DataRecordParsingError> {
                match result {
                    Ok(record) => {
                        let row: Vec<&str> = record.iter().collect();
                        TowerSonicDataRecord::from_data_row(&row)
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
    fn test_tower_sonic_data_row_parse() {
        let raw_data = "2014-08-20 12:00:01\tQ\t+001.20\t-000.40\tM\t00\t3A";
        let data_row: Vec<&str> = raw_data.split('\t').collect();

        let sonic = TowerSonicDataRecord::from_data_row(&data_row).unwrap();
        assert_eq!(sonic.node, "Q");
        assert_eq!(sonic.status, "00");

        let wind = sonic.wind();
        assert_eq!(wind.u, -1.2);
        assert_eq!(wind.v, -0.4);
    }

    #[test]
    fn test_tower_sonic_collection() {
        let data = "2014-08-20 12:00:01\tQ\t+001.20\t-000.40\tM\t00\t3A\n\
                    2014-08-20 12:00:02\tQ\n\
                    2014-08-20 12:00:03\tQ\t+001.00\t+000.00\tM\t00\t3B\n";
        let mut collection = TowerSonicDataRecordCollection::from_data(data);
        assert_eq!(collection.records().count(), 2);
    }
}
