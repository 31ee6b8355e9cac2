//! NetCDF backend for [`Dataset`].
//!
//! The file is written next to its destination under a `.partial` name and renamed once it
//! is complete, so a failed run never leaves a truncated dataset at the requested path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::dataset::Dataset;
use crate::error::{Result, SonicError};

/// Fill values for integer storage, matching the netCDF library defaults
pub const FILL_INT8: i8 = -127;
pub const FILL_INT16: i16 = -32767;
pub const FILL_INT32: i32 = -2147483647;

fn partial_path(path: &Path) -> Result<PathBuf> {
    let mut name: OsString = path
        .file_name()
        .ok_or_else(|| SonicError::Write {
            path: path.to_path_buf(),
            reason: "the output path has no file name".into(),
        })?
        .to_os_string();
    name.push(".partial");
    Ok(path.with_file_name(name))
}

/// Writes `dataset` to `path`, replacing any existing file there
#[cfg(feature = "netcdf")]
pub fn write_netcdf<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    use log::{debug, info};
    use std::fs;

    let path = path.as_ref();
    let partial = partial_path(path)?;
    debug!("writing {}", partial.display());

    match backend::write_file(dataset, &partial) {
        Ok(()) => {
            fs::rename(&partial, path).map_err(|e| SonicError::Write {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            info!("wrote {}", path.display());
            Ok(())
        }
        Err(e) => {
            // The partial file may not exist if creation itself failed
            let _ = fs::remove_file(&partial);
            Err(e)
        }
    }
}

#[cfg(not(feature = "netcdf"))]
pub fn write_netcdf<P: AsRef<Path>>(_dataset: &Dataset, path: P) -> Result<()> {
    partial_path(path.as_ref())?;
    Err(SonicError::FeatureNotEnabled("netcdf".to_string()))
}

#[cfg(feature = "netcdf")]
mod backend {
    use std::path::Path;

    use super::{FILL_INT16, FILL_INT32, FILL_INT8};
    use crate::dataset::{AttributeValue, Dataset, DatasetVariable};
    use crate::error::{Result, SonicError};
    use crate::metadata::StorageType;

    /// Defines one variable of a concrete type, sets its attributes and fills in its values.
    /// NaN becomes the fill value for integer types and stays NaN for float types.
    macro_rules! put_variable {
        ($file:expr, $variable:expr, $dims:expr, $ty:ty, $fill:expr) => {{
            let mut var = $file.add_variable::<$ty>(&$variable.name, $dims)?;
            let fill: Option<$ty> = $fill;
            if let Some(fill) = fill {
                var.set_fill_value(fill)?;
            }
            for (name, value) in &$variable.attributes {
                match value {
                    AttributeValue::Text(text) => var.put_attribute(name, text.as_str())?,
                    AttributeValue::Number(number) => var.put_attribute(name, *number)?,
                };
            }
            let values: Vec<$ty> = $variable
                .values
                .iter()
                .map(|v| match fill {
                    Some(fill) if v.is_nan() => fill,
                    _ => *v as $ty,
                })
                .collect();
            var.put_values(&values, (&[0usize], &[values.len()]))?;
        }};
    }

    fn put_variable(file: &mut netcdf::FileMut, variable: &DatasetVariable) -> Result<()> {
        let dims: Vec<&str> = variable.dimensions.iter().map(String::as_str).collect();
        match variable.storage_type {
            StorageType::Int8 => put_variable!(file, variable, &dims, i8, Some(FILL_INT8)),
            StorageType::Int16 => put_variable!(file, variable, &dims, i16, Some(FILL_INT16)),
            StorageType::Int32 => put_variable!(file, variable, &dims, i32, Some(FILL_INT32)),
            StorageType::Float32 => put_variable!(file, variable, &dims, f32, None),
            StorageType::Float64 => put_variable!(file, variable, &dims, f64, None),
        }
        Ok(())
    }

    pub(super) fn write_file(dataset: &Dataset, path: &Path) -> Result<()> {
        let mut file = netcdf::create(path).map_err(|e| SonicError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        for dimension in &dataset.dimensions {
            match dimension.len {
                Some(len) => file.add_dimension(&dimension.name, len)?,
                None => file.add_unlimited_dimension(&dimension.name)?,
            };
        }

        for variable in &dataset.variables {
            put_variable(&mut file, variable)?;
        }

        for (name, value) in &dataset.attributes {
            file.add_attribute(name, value.as_str())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/tmp/out/sonic.nc")).unwrap(),
            PathBuf::from("/tmp/out/sonic.nc.partial")
        );
        assert!(partial_path(Path::new("/")).is_err());
    }

    #[cfg(not(feature = "netcdf"))]
    #[test]
    fn test_feature_not_enabled() {
        let result = write_netcdf(&Dataset::default(), "sonic.nc");
        assert!(matches!(result, Err(SonicError::FeatureNotEnabled(_))));
    }
}
