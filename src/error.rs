//! Crate-wide error type.
//!
//! Frame level problems (bad length, bad status code, stray characters, unparseable rows)
//! never surface here: they are dropped where they are found. Everything in `SonicError`
//! aborts a conversion run.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type Result<T> = std::result::Result<T, SonicError>;

#[derive(Error, Debug)]
pub enum SonicError {
    /// No input files were given, or none of them produced a usable sample.
    #[error("no usable samples: {0}")]
    EmptyResult(String),

    /// A physical quantity or a required metadata key is missing from its table.
    #[error("metadata lookup failed: {0}")]
    MetadataLookup(String),

    /// A metadata value exists but cannot be interpreted.
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("failed to write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid resampling interval: {0}")]
    InvalidInterval(String),

    #[error("Feature '{0}' is not enabled. Please build with --features {0}")]
    FeatureNotEnabled(String),

    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SonicError::MetadataLookup("platform_latitude".to_string());
        assert_eq!(err.to_string(), "metadata lookup failed: platform_latitude");
    }

    #[test]
    fn test_write_error_display() {
        let err = SonicError::Write {
            path: PathBuf::from("/readonly/out.nc"),
            reason: "permission denied".into(),
        };
        assert_eq!(err.to_string(), "failed to write /readonly/out.nc: permission denied");
    }
}
