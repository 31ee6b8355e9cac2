//! Conversion of Gill 2D sonic anemometer serial captures into CF NetCDF datasets.
//!
//! A run flows through the modules in order: [`data::frame`] keeps only well formed frames,
//! [`data::sonic_data_record`] parses them, [`wind`] turns the raw axes into geophysical
//! components, [`sample_series`] gathers samples across files and [`dataset`] describes and
//! writes the output file.

pub mod args;
pub mod cardinal_direction;
pub mod config;
pub mod data;
pub mod dataset;
pub mod error;
pub mod metadata;
pub mod resample;
pub mod sample_series;
pub mod summary;
pub mod tools;
pub mod wind;

pub use error::{Result, SonicError};
