//! Free form site and instrument metadata.
//!
//! A headerless two column CSV of `attribute,value` pairs. Two keys are reserved for the
//! platform position and are written as coordinate variables instead of global attributes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SonicError};

pub const PLATFORM_LATITUDE: &str = "platform_latitude";
pub const PLATFORM_LONGITUDE: &str = "platform_longitude";
pub const RESERVED_KEYS: [&str; 2] = [PLATFORM_LATITUDE, PLATFORM_LONGITUDE];

/// Ordered attribute map. Inserting an existing key replaces its value and keeps the key's
/// original position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteMetadata {
    entries: Vec<(String, String)>,
}

impl SiteMetadata {
    pub fn new() -> SiteMetadata {
        SiteMetadata::default()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<SiteMetadata> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut metadata = SiteMetadata::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            match (record.get(0), record.get(1)) {
                (Some(key), Some(value)) if !key.is_empty() => metadata.insert(key, value),
                (Some(""), _) => continue,
                _ => {
                    return Err(SonicError::InvalidMetadata(format!(
                        "site metadata line {} is not an attribute,value pair",
                        index + 1
                    )))
                }
            }
        }

        Ok(metadata)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SiteMetadata> {
        let file = File::open(path)?;
        SiteMetadata::from_reader(file)
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Every pair except the reserved platform position keys, in file order
    pub fn passthrough(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(k, _)| !RESERVED_KEYS.contains(k))
    }

    fn coordinate(&self, key: &str) -> Result<f64> {
        let raw = self
            .get(key)
            .ok_or_else(|| SonicError::MetadataLookup(format!("site metadata has no {key}")))?;

        raw.parse::<f64>()
            .map_err(|e| SonicError::InvalidMetadata(format!("{key} = {raw:?}: {e}")))
    }

    /// Latitude and longitude of the stationary platform in degrees
    pub fn platform_position(&self) -> Result<(f64, f64)> {
        Ok((
            self.coordinate(PLATFORM_LATITUDE)?,
            self.coordinate(PLATFORM_LONGITUDE)?,
        ))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SiteMetadata {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut metadata = SiteMetadata::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}
