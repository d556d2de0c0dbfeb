// src/linux/w1_temperature.rs

//! DS18B20 readings through the kernel's w1-therm driver.
//!
//! The driver exposes `<bus_path>/<sensor_id>/w1_slave` with two lines; the
//! second ends in `t=<millidegrees>`:
//!
//! ```text
//! 72 01 4b 46 7f ff 0e 10 57 : crc=57 YES
//! 72 01 4b 46 7f ff 0e 10 57 t=23125
//! ```

use std::fs;
use std::io;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::string::{String, ToString};

use crate::common::types::Temperature;

/// Where the w1 bus master lists its devices.
pub const DEFAULT_W1_BUS_PATH: &str = "/sys/bus/w1/devices";

#[derive(Debug, thiserror::Error)]
pub enum TemperatureError {
    #[error("the location {} is not readable", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} has no reading line", .path.display())]
    MissingReadingLine { path: PathBuf },

    #[error("no `t=` token in {}", .path.display())]
    MissingToken { path: PathBuf },

    #[error("invalid temperature {value:?} in {}", .path.display())]
    InvalidValue {
        path: PathBuf,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// `<bus_path>/<sensor_id>/w1_slave`
pub fn sensor_path(bus_path: impl AsRef<Path>, sensor_id: &str) -> PathBuf {
    bus_path.as_ref().join(sensor_id).join("w1_slave")
}

/// Reads one sensor, e.g. `read_temperature(DEFAULT_W1_BUS_PATH, "28-021503ca1aff")`.
pub fn read_temperature(
    bus_path: impl AsRef<Path>,
    sensor_id: &str,
) -> Result<Temperature, TemperatureError> {
    let path = sensor_path(bus_path, sensor_id);
    let contents = fs::read_to_string(&path).map_err(|source| TemperatureError::Unreadable {
        path: path.clone(),
        source,
    })?;

    let temperature = parse_w1_slave(&path, &contents)?;
    tracing::debug!(sensor_id, %temperature, "read temperature");
    Ok(temperature)
}

fn parse_w1_slave(path: &Path, contents: &str) -> Result<Temperature, TemperatureError> {
    let line = contents
        .lines()
        .nth(1)
        .ok_or_else(|| TemperatureError::MissingReadingLine {
            path: path.to_path_buf(),
        })?;

    let (_, raw) = line
        .split_once("t=")
        .ok_or_else(|| TemperatureError::MissingToken {
            path: path.to_path_buf(),
        })?;

    let raw = raw.trim();
    let millidegrees = raw
        .parse::<i32>()
        .map_err(|source| TemperatureError::InvalidValue {
            path: path.to_path_buf(),
            value: raw.to_string(),
            source,
        })?;

    Ok(Temperature::from_millidegrees(millidegrees))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SENSOR_ID: &str = "28-021503ca1aff";

    fn bus_with(contents: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let sensor_dir = dir.path().join(SENSOR_ID);
        fs::create_dir(&sensor_dir).unwrap();
        fs::write(sensor_dir.join("w1_slave"), contents).unwrap();
        dir
    }

    #[test]
    fn test_reads_millidegrees() {
        let dir = bus_with(
            "72 01 4b 46 7f ff 0e 10 57 : crc=57 YES\n72 01 4b 46 7f ff 0e 10 57 t=23125\n",
        );
        let temperature = read_temperature(dir.path(), SENSOR_ID).unwrap();
        assert_eq!(temperature.as_millidegrees(), 23125);
        assert_eq!(temperature.to_string(), "23.125");
    }

    #[test]
    fn test_reads_negative_temperature() {
        let dir = bus_with("ec ff 4b 46 7f ff 0c 10 1b : crc=1b YES\nec ff 4b 46 7f ff 0c 10 1b t=-1250\n");
        let temperature = read_temperature(dir.path(), SENSOR_ID).unwrap();
        assert_eq!(temperature.as_millidegrees(), -1250);
    }

    #[test]
    fn test_missing_sensor() {
        let dir = TempDir::new().unwrap();
        let err = read_temperature(dir.path(), SENSOR_ID).unwrap_err();
        assert!(matches!(err, TemperatureError::Unreadable { .. }));
        assert!(err.to_string().contains("is not readable"));
    }

    #[test]
    fn test_malformed_contents() {
        let dir = bus_with("72 01 4b 46 7f ff 0e 10 57 : crc=57 YES\n");
        assert!(matches!(
            read_temperature(dir.path(), SENSOR_ID),
            Err(TemperatureError::MissingReadingLine { .. })
        ));

        let dir = bus_with("crc=57 YES\n72 01 4b 46 7f ff 0e 10 57\n");
        assert!(matches!(
            read_temperature(dir.path(), SENSOR_ID),
            Err(TemperatureError::MissingToken { .. })
        ));

        let dir = bus_with("crc=57 YES\n72 01 t=warm\n");
        match read_temperature(dir.path(), SENSOR_ID) {
            Err(TemperatureError::InvalidValue { value, .. }) => assert_eq!(value, "warm"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_sensor_path() {
        assert_eq!(
            sensor_path(DEFAULT_W1_BUS_PATH, SENSOR_ID),
            PathBuf::from("/sys/bus/w1/devices/28-021503ca1aff/w1_slave")
        );
    }
}
