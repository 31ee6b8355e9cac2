//! Description of the output dataset.
//!
//! [`DatasetBuilder`] turns a [`SampleSeries`] plus its metadata into a [`Dataset`]: the
//! dimensions, variables, values and attributes of the output file, all checked before
//! anything touches the disk. A storage backend such as [`netcdf_writer`] then only has to
//! copy the description out.

pub mod netcdf_writer;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{ConversionConfig, WindVariables};
use crate::error::{Result, SonicError};
use crate::metadata::{SiteMetadata, StorageType, VariableDefinition, Vocabulary};
use crate::sample_series::SampleSeries;
use crate::tools::date::{cf_time_units, iso_seconds, seconds_since};

pub use netcdf_writer::write_netcdf;

pub const TIME_DIMENSION: &str = "time";
pub const LATITUDE_DIMENSION: &str = "latitude";
pub const LONGITUDE_DIMENSION: &str = "longitude";

/// Physical quantities the 2D sonic can provide
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindQuantity {
    WindSpeed,
    WindFromDirection,
    EastwardWind,
    NorthwardWind,
}

impl WindQuantity {
    /// Name of the quantity's section in the controlled vocabulary
    pub fn vocabulary_key(&self) -> &'static str {
        match self {
            WindQuantity::WindSpeed => "wind_speed",
            WindQuantity::WindFromDirection => "wind_from_direction",
            WindQuantity::EastwardWind => "eastward_wind",
            WindQuantity::NorthwardWind => "northward_wind",
        }
    }

    pub fn selection(variables: WindVariables) -> &'static [WindQuantity] {
        match variables {
            WindVariables::All => &[
                WindQuantity::WindSpeed,
                WindQuantity::WindFromDirection,
                WindQuantity::EastwardWind,
                WindQuantity::NorthwardWind,
            ],
            WindVariables::Polar => &[WindQuantity::WindSpeed, WindQuantity::WindFromDirection],
            WindVariables::Cartesian => &[WindQuantity::EastwardWind, WindQuantity::NorthwardWind],
        }
    }

    pub fn values(&self, series: &SampleSeries) -> Vec<f64> {
        match self {
            WindQuantity::WindSpeed => series.wind_speed(),
            WindQuantity::WindFromDirection => series.wind_direction(),
            WindQuantity::EastwardWind => series.eastward_wind(),
            WindQuantity::NorthwardWind => series.northward_wind(),
        }
    }
}

/// Where the processing software came from. Worked out by the caller; the library never
/// asks version control itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub repository_url: String,
    pub revision: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Text(String),
    Number(f64),
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    /// `None` for the unlimited dimension
    pub len: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetVariable {
    pub name: String,
    pub storage_type: StorageType,
    pub dimensions: Vec<String>,
    pub attributes: Vec<(String, AttributeValue)>,
    /// Values as f64, narrowed to `storage_type` by the backend. NaN marks missing data.
    pub values: Vec<f64>,
}

impl DatasetVariable {
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    fn coordinate(name: &str, values: Vec<f64>, attributes: Vec<(&str, AttributeValue)>) -> Self {
        DatasetVariable {
            name: name.to_string(),
            storage_type: StorageType::Float64,
            dimensions: vec![name.to_string()],
            attributes: attributes
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
            values,
        }
    }

    fn from_definition(definition: &VariableDefinition, values: Vec<f64>) -> Self {
        DatasetVariable {
            name: definition.name.clone(),
            storage_type: definition.storage_type,
            dimensions: vec![definition.dimension.clone()],
            attributes: vec![
                ("long_name".to_string(), definition.long_name.as_str().into()),
                ("units".to_string(), definition.units.as_str().into()),
                ("standard_name".to_string(), definition.standard_name.as_str().into()),
            ],
            values,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dimensions: Vec<Dimension>,
    pub variables: Vec<DatasetVariable>,
    /// Global attributes in write order
    pub attributes: Vec<(String, String)>,
}

impl Dataset {
    pub fn variable(&self, name: &str) -> Option<&DatasetVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets a global attribute. An existing attribute keeps its place and takes the new value.
    pub fn set_attribute<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key, value)),
        }
    }
}

/// Collects everything needed to describe the output file
pub struct DatasetBuilder<'a> {
    config: &'a ConversionConfig,
    vocabulary: &'a Vocabulary,
    site: &'a SiteMetadata,
    provenance: &'a Provenance,
    created: DateTime<Utc>,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(
        config: &'a ConversionConfig,
        vocabulary: &'a Vocabulary,
        site: &'a SiteMetadata,
        provenance: &'a Provenance,
    ) -> Self {
        DatasetBuilder {
            config,
            vocabulary,
            site,
            provenance,
            created: Utc::now(),
        }
    }

    /// Overrides the creation time written into `history`
    pub fn created_at(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    /// Describes `series` as a dataset.
    ///
    /// Fails with [`SonicError::EmptyResult`] for an empty series, and with
    /// [`SonicError::MetadataLookup`] when the platform position or a vocabulary entry for
    /// one of the selected quantities is missing.
    pub fn build(&self, series: &SampleSeries) -> Result<Dataset> {
        let (first, last) = match (series.first_timestamp(), series.last_timestamp()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(SonicError::EmptyResult("the sample series is empty".into())),
        };

        let (latitude, longitude) = self.site.platform_position()?;

        let quantities = WindQuantity::selection(self.config.variables);
        let definitions = quantities
            .iter()
            .map(|q| {
                let definition = self.vocabulary.definition(q.vocabulary_key())?;
                if definition.dimension != TIME_DIMENSION {
                    return Err(SonicError::InvalidMetadata(format!(
                        "{} must use the {TIME_DIMENSION} dimension, not {}",
                        q.vocabulary_key(),
                        definition.dimension
                    )));
                }
                Ok((*q, definition))
            })
            .collect::<Result<Vec<_>>>()?;

        let epoch = self.config.epoch.resolve(first);
        debug!("time coordinate counted from {epoch}");

        let time = series
            .timestamps()
            .iter()
            .map(|t| seconds_since(t, &epoch))
            .collect();

        let mut variables = vec![
            DatasetVariable::coordinate(
                TIME_DIMENSION,
                time,
                vec![
                    ("units", cf_time_units(&epoch).into()),
                    ("standard_name", "time".into()),
                    ("long_name", "Time".into()),
                    ("calendar", "standard".into()),
                    ("axis", "T".into()),
                ],
            ),
            DatasetVariable::coordinate(
                LATITUDE_DIMENSION,
                vec![latitude],
                vec![
                    ("units", "degrees_north".into()),
                    ("standard_name", "latitude".into()),
                    ("long_name", "Latitude".into()),
                ],
            ),
            DatasetVariable::coordinate(
                LONGITUDE_DIMENSION,
                vec![longitude],
                vec![
                    ("units", "degrees_east".into()),
                    ("standard_name", "longitude".into()),
                    ("long_name", "Longitude".into()),
                ],
            ),
        ];
        variables.extend(
            definitions
                .iter()
                .map(|(q, definition)| DatasetVariable::from_definition(definition, q.values(series))),
        );

        let mut dataset = Dataset {
            dimensions: vec![
                Dimension {
                    name: TIME_DIMENSION.into(),
                    len: None,
                },
                Dimension {
                    name: LATITUDE_DIMENSION.into(),
                    len: Some(1),
                },
                Dimension {
                    name: LONGITUDE_DIMENSION.into(),
                    len: Some(1),
                },
            ],
            variables,
            attributes: vec![],
        };

        dataset.set_attribute("Conventions", self.config.conventions.as_str());
        dataset.set_attribute("institution", self.config.institution.as_str());
        dataset.set_attribute("title", self.config.title.as_str());
        dataset.set_attribute(
            "history",
            format!(
                "{}: Written with script: {}",
                self.created.format("%Y-%m-%dT%H:%M:%S"),
                self.config.script_name
            ),
        );
        dataset.set_attribute("time_coverage_start", iso_seconds(&first));
        dataset.set_attribute("time_coverage_end", iso_seconds(&last));
        dataset.set_attribute(
            "processing_software_url",
            self.provenance.repository_url.as_str(),
        );
        dataset.set_attribute(
            "processing_software_version",
            self.provenance.revision.as_str(),
        );
        for (key, value) in self.site.passthrough() {
            dataset.set_attribute(key, value);
        }

        Ok(dataset)
    }
}
