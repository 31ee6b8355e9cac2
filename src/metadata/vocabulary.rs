//! Controlled vocabulary of output variables.
//!
//! The table is a CSV file with a `Variable,Attribute,Value` header. A row with a non empty
//! `Variable` opens a section for that logical variable; the rows below it, with an empty
//! `Variable`, give the section's attributes until the next section starts.
//!
//! ```text
//! Variable,Attribute,Value
//! wind_speed,,
//! ,name,wind_speed
//! ,type,float32
//! ,dimension,time
//! ```

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SonicError};

/// Attributes every variable section must define
pub const REQUIRED_ATTRIBUTES: [&str; 6] =
    ["name", "type", "dimension", "long_name", "units", "standard_name"];

/// Numeric type a variable is stored as in the output file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Int8,
    Int16,
    Int32,
    Float32,
    Float64,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Int8 => "int8",
            StorageType::Int16 => "int16",
            StorageType::Int32 => "int32",
            StorageType::Float32 => "float32",
            StorageType::Float64 => "float64",
        }
    }
}

impl FromStr for StorageType {
    type Err = SonicError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int8" | "byte" | "i1" => Ok(StorageType::Int8),
            "int16" | "short" | "i2" => Ok(StorageType::Int16),
            "int32" | "int" | "i4" => Ok(StorageType::Int32),
            "float32" | "float" | "real" | "f4" => Ok(StorageType::Float32),
            "float64" | "double" | "f8" => Ok(StorageType::Float64),
            other => Err(SonicError::InvalidMetadata(format!(
                "unsupported storage type {other:?}"
            ))),
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the output file needs to describe one physical quantity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    pub storage_type: StorageType,
    pub dimension: String,
    pub long_name: String,
    pub units: String,
    pub standard_name: String,
}

#[derive(Debug, Deserialize)]
struct VocabularyRow {
    #[serde(rename = "Variable", default)]
    variable: String,
    #[serde(rename = "Attribute", default)]
    attribute: String,
    #[serde(rename = "Value", default)]
    value: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VocabularySection {
    pub variable: String,
    pub attributes: Vec<(String, String)>,
}

impl VocabularySection {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    sections: Vec<VocabularySection>,
}

impl Vocabulary {
    pub fn from_reader<R: Read>(reader: R) -> Result<Vocabulary> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut sections: Vec<VocabularySection> = Vec::new();
        for (index, row) in reader.deserialize::<VocabularyRow>().enumerate() {
            let row = row?;
            if !row.variable.is_empty() {
                sections.push(VocabularySection {
                    variable: row.variable,
                    attributes: vec![],
                });
                continue;
            }

            if row.attribute.is_empty() {
                continue;
            }

            match sections.last_mut() {
                Some(section) => section.attributes.push((row.attribute, row.value)),
                None => {
                    return Err(SonicError::InvalidMetadata(format!(
                        "vocabulary row {} sets {:?} before any variable section",
                        index + 2,
                        row.attribute
                    )))
                }
            }
        }

        Ok(Vocabulary { sections })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vocabulary> {
        let file = File::open(path)?;
        Vocabulary::from_reader(file)
    }

    pub fn section(&self, variable: &str) -> Option<&VocabularySection> {
        self.sections.iter().rev().find(|s| s.variable == variable)
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.variable.as_str())
    }

    /// Looks up the output definition of a logical variable such as `wind_speed`.
    ///
    /// Fails with [`SonicError::MetadataLookup`] when the section or one of the
    /// [`REQUIRED_ATTRIBUTES`] is absent.
    pub fn definition(&self, variable: &str) -> Result<VariableDefinition> {
        let section = self.section(variable).ok_or_else(|| {
            SonicError::MetadataLookup(format!("no vocabulary entry for {variable}"))
        })?;

        let require = |attribute: &str| -> Result<String> {
            section
                .attribute(attribute)
                .map(str::to_string)
                .ok_or_else(|| {
                    SonicError::MetadataLookup(format!(
                        "vocabulary entry {variable} has no {attribute}"
                    ))
                })
        };

        Ok(VariableDefinition {
            name: require("name")?,
            storage_type: require("type")?.parse()?,
            dimension: require("dimension")?,
            long_name: require("long_name")?,
            units: require("units")?,
            standard_name: require("standard_name")?,
        })
    }
}
