//! ERA5 hourly reanalysis download from the Open-Meteo archive API.

use std::time::Duration;

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::features::WeatherRow;

const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/era5";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Hourly variables requested for the turbulence feature set.
pub const HOURLY_VARIABLES: [&str; 7] = [
    "temperature_2m",
    "dewpoint_2m",
    "surface_pressure",
    "wind_speed_10m",
    "wind_speed_100m",
    "relative_humidity_2m",
    "cloud_cover",
];

#[derive(Debug, Deserialize)]
pub struct Era5Response {
    pub hourly: HourlyData,
}

/// Column-oriented hourly series as returned by the archive endpoint.
/// Individual samples may be null.
#[derive(Debug, Deserialize)]
pub struct HourlyData {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub dewpoint_2m: Vec<Option<f64>>,
    pub surface_pressure: Vec<Option<f64>>,
    pub wind_speed_10m: Vec<Option<f64>>,
    pub wind_speed_100m: Vec<Option<f64>>,
    pub relative_humidity_2m: Vec<Option<f64>>,
    pub cloud_cover: Vec<Option<f64>>,
}

impl HourlyData {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// One hour as a row, tolerating ragged columns.
    pub fn row(&self, i: usize) -> WeatherRow {
        WeatherRow {
            time: self.time[i].clone(),
            temperature_2m: sample(&self.temperature_2m, i),
            dewpoint_2m: sample(&self.dewpoint_2m, i),
            surface_pressure: sample(&self.surface_pressure, i),
            wind_speed_10m: sample(&self.wind_speed_10m, i),
            wind_speed_100m: sample(&self.wind_speed_100m, i),
            relative_humidity_2m: sample(&self.relative_humidity_2m, i),
            cloud_cover: sample(&self.cloud_cover, i),
        }
    }
}

fn sample(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

/// Pulls the hourly series for one coordinate and date range.
///
/// The request carries a bounded timeout; a non-200 status or a body that
/// does not match the expected shape is an error.
pub async fn fetch_era5_hourly(
    lat: f64,
    lon: f64,
    start_date: &str,
    end_date: &str,
) -> Result<HourlyData> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    let response = client
        .get(ARCHIVE_URL)
        .query(&[
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("start_date", start_date.to_string()),
            ("end_date", end_date.to_string()),
            ("hourly", HOURLY_VARIABLES.join(",")),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        bail!("Open-Meteo API error: {}", response.status());
    }

    let parsed: Era5Response = response.json().await?;

    Ok(parsed.hourly)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_deserialise_archive_response() {
        let body = r#"{
            "hourly": {
                "time": ["2024-01-01T00:00", "2024-01-01T01:00"],
                "temperature_2m": [12.5, null],
                "dewpoint_2m": [8.0, 8.1],
                "surface_pressure": [1013.2, 1013.0],
                "wind_speed_10m": [3.4, 3.6],
                "wind_speed_100m": [9.1, 9.4],
                "relative_humidity_2m": [74.0, 75.0],
                "cloud_cover": [20.0, 25.0]
            }
        }"#;

        let parsed: Era5Response = serde_json::from_str(body).unwrap();
        let hourly = parsed.hourly;

        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly.temperature_2m, vec![Some(12.5), None]);

        let row = hourly.row(1);
        assert_eq!(row.time, "2024-01-01T01:00");
        assert_eq!(row.temperature_2m, None);
        assert_eq!(row.wind_speed_100m, Some(9.4));
    }

    #[test]
    fn should_tolerate_ragged_columns() {
        let hourly = HourlyData {
            time: vec!["2024-01-01T00:00".to_string(), "2024-01-01T01:00".to_string()],
            temperature_2m: vec![Some(12.5)],
            dewpoint_2m: Vec::new(),
            surface_pressure: Vec::new(),
            wind_speed_10m: Vec::new(),
            wind_speed_100m: Vec::new(),
            relative_humidity_2m: Vec::new(),
            cloud_cover: Vec::new(),
        };

        let row = hourly.row(1);

        assert_eq!(row.temperature_2m, None);
    }
}
