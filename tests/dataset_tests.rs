extern crate sonicrs;

use chrono::TimeDelta;
use sonicrs::config::{ConversionConfig, TimeEpoch};
use sonicrs::dataset::{AttributeValue, DatasetBuilder, Provenance};
use sonicrs::metadata::{SiteMetadata, Vocabulary};
use sonicrs::sample_series::SampleSeries;
use sonicrs::tools::date::parse_timestamp;
use sonicrs::SonicError;

fn provenance() -> Provenance {
    Provenance {
        repository_url: "https://example.org/sonicrs".into(),
        revision: "0123abcd".into(),
    }
}

fn load_series() -> SampleSeries {
    SampleSeries::from_files(&["mock/sonic_2d_capture.txt", "mock/sonic_2d_noise.txt"]).unwrap()
}

#[test]
fn build_dataset_from_mock_data() {
    let config = ConversionConfig::default();
    let vocabulary = Vocabulary::from_path("mock/mean-winds-variables.csv").unwrap();
    let site = SiteMetadata::from_path("mock/meta-data.csv").unwrap();
    let provenance = provenance();

    let dataset = DatasetBuilder::new(&config, &vocabulary, &site, &provenance)
        .build(&load_series())
        .unwrap();

    assert_eq!(dataset.variable("time").unwrap().values.len(), 10);
    assert_eq!(dataset.variable("latitude").unwrap().values, vec![53.4553]);
    assert_eq!(dataset.attribute("time_coverage_start"), Some("2017-08-30T01:17:52"));
    assert_eq!(dataset.attribute("time_coverage_end"), Some("2017-08-30T01:17:55"));
    assert_eq!(
        dataset.attribute("comment"),
        Some("Mounted on the mast top, boom pointing north")
    );
    assert_eq!(dataset.attribute("platform_longitude"), None);
}

#[test]
fn missing_latitude_fails_before_writing() {
    let config = ConversionConfig::default();
    let vocabulary = Vocabulary::from_path("mock/mean-winds-variables.csv").unwrap();
    let site = SiteMetadata::from_path("mock/meta-data-no-latitude.csv").unwrap();
    let provenance = provenance();

    let result = DatasetBuilder::new(&config, &vocabulary, &site, &provenance).build(&load_series());
    assert!(matches!(result, Err(SonicError::MetadataLookup(_))));
}

#[test]
fn first_sample_epoch_decodes_to_sample_times() {
    let config = ConversionConfig {
        epoch: TimeEpoch::FirstSample,
        ..ConversionConfig::default()
    };
    let vocabulary = Vocabulary::from_path("mock/mean-winds-variables.csv").unwrap();
    let site = SiteMetadata::from_path("mock/meta-data.csv").unwrap();
    let provenance = provenance();
    let series = load_series();

    let dataset = DatasetBuilder::new(&config, &vocabulary, &site, &provenance)
        .build(&series)
        .unwrap();

    let time = dataset.variable("time").unwrap();
    let units = match time.attribute("units") {
        Some(AttributeValue::Text(units)) => units.clone(),
        other => panic!("expected text units, found {other:?}"),
    };
    assert_eq!(units, "seconds since 2017-08-30 01:17:52");
    assert!((time.values[0] - 0.906838).abs() < 1e-9);

    let epoch = parse_timestamp(units.trim_start_matches("seconds since ")).unwrap();
    for (value, sample) in time.values.iter().zip(series.iter()) {
        let decoded = epoch + TimeDelta::nanoseconds((value * 1e9).round() as i64);
        assert_eq!(decoded, sample.timestamp);
    }
}

#[cfg(feature = "netcdf")]
mod netcdf_output {
    use chrono::{TimeZone, Utc};
    use sonicrs::dataset::{write_netcdf, DatasetVariable};
    use sonicrs::metadata::StorageType;

    use super::*;

    fn text_attribute(attribute: Option<netcdf::Attribute>) -> String {
        match attribute.unwrap().value().unwrap() {
            netcdf::AttributeValue::Str(s) => s,
            other => panic!("expected a string attribute, found {other:?}"),
        }
    }

    #[test]
    fn write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sonic_2d_data.nc");

        let config = ConversionConfig {
            epoch: TimeEpoch::Fixed(Utc.with_ymd_and_hms(2017, 8, 30, 0, 0, 0).unwrap()),
            ..ConversionConfig::default()
        };
        let vocabulary = Vocabulary::from_path("mock/mean-winds-variables.csv").unwrap();
        let site = SiteMetadata::from_path("mock/meta-data.csv").unwrap();
        let provenance = provenance();
        let series = load_series();

        let dataset = DatasetBuilder::new(&config, &vocabulary, &site, &provenance)
            .build(&series)
            .unwrap();
        write_netcdf(&dataset, &path).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("sonic_2d_data.nc.partial").exists());

        let file = netcdf::open(&path).unwrap();

        let time_dim = file.dimension("time").unwrap();
        assert!(time_dim.is_unlimited());
        assert_eq!(time_dim.len(), 10);
        assert_eq!(file.dimension("latitude").unwrap().len(), 1);

        let time = file.variable("time").unwrap();
        assert_eq!(
            text_attribute(time.attribute("units")),
            "seconds since 2017-08-30 00:00:00"
        );
        let time_values = time.get_values::<f64, _>(..).unwrap();
        assert!((time_values[0] - 4672.906838).abs() < 1e-6);

        let speed = file.variable("wind_speed").unwrap();
        assert_eq!(text_attribute(speed.attribute("units")), "m s-1");
        assert_eq!(text_attribute(speed.attribute("standard_name")), "wind_speed");
        let speed_values = speed.get_values::<f32, _>(..).unwrap();
        assert_eq!(speed_values.len(), 10);
        for (written, expected) in speed_values.iter().zip(series.wind_speed()) {
            assert!((*written as f64 - expected).abs() < 1e-5);
        }

        let eastward = file.variable("eastward_wind").unwrap();
        let eastward_values = eastward.get_values::<f32, _>(..).unwrap();
        assert_eq!(eastward_values[0], -2.03f32);

        let latitude = file.variable("latitude").unwrap();
        assert_eq!(latitude.get_values::<f64, _>(..).unwrap(), vec![53.4553]);

        assert_eq!(text_attribute(file.attribute("Conventions")), "CF-1.6");
        assert_eq!(
            text_attribute(file.attribute("processing_software_version")),
            "0123abcd"
        );
        assert_eq!(
            text_attribute(file.attribute("source")),
            "Gill WindSonic 2D ultrasonic anemometer"
        );
        assert!(file.attribute("platform_latitude").is_none());
    }

    #[test]
    fn unwritable_path_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("sonic_2d_data.nc");

        let config = ConversionConfig::default();
        let vocabulary = Vocabulary::from_path("mock/mean-winds-variables.csv").unwrap();
        let site = SiteMetadata::from_path("mock/meta-data.csv").unwrap();
        let provenance = provenance();

        let dataset = DatasetBuilder::new(&config, &vocabulary, &site, &provenance)
            .build(&load_series())
            .unwrap();

        let result = write_netcdf(&dataset, &path);
        assert!(matches!(result, Err(SonicError::Write { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sonic_2d_data.nc");

        let config = ConversionConfig::default();
        let vocabulary = Vocabulary::from_path("mock/mean-winds-variables.csv").unwrap();
        let site = SiteMetadata::from_path("mock/meta-data.csv").unwrap();
        let provenance = provenance();

        let mut dataset = DatasetBuilder::new(&config, &vocabulary, &site, &provenance)
            .build(&load_series())
            .unwrap();
        dataset.variables.push(DatasetVariable {
            name: "wind_gust".into(),
            storage_type: StorageType::Float32,
            dimensions: vec!["height".into()],
            attributes: vec![],
            values: vec![7.5],
        });

        let result = write_netcdf(&dataset, &path);
        assert!(result.is_err());
        assert!(!path.exists());
        assert!(!dir.path().join("sonic_2d_data.nc.partial").exists());
    }
}
