//! Download ERA5 hourly reanalysis data and save it as a plain CSV.

use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::{create_spinner, FetchArgs};
use crate::fetch::{fetch_era5_hourly, HourlyData};

/// Column order of the hourly weather CSV, shared with `features`.
pub const WEATHER_COLUMNS: [&str; 8] = [
    "time",
    "temperature_2m",
    "dewpoint_2m",
    "surface_pressure",
    "wind_speed_10m",
    "wind_speed_100m",
    "relative_humidity_2m",
    "cloud_cover",
];

pub async fn fetch(args: &FetchArgs) -> Result<String> {
    let bar = create_spinner(format!(
        "Fetching ERA5 hourly data for {},{}...",
        args.lat, args.lon
    ));
    let hourly = fetch_era5_hourly(args.lat, args.lon, &args.start_date, &args.end_date).await?;
    bar.finish_with_message(format!("Fetched {} hourly samples", hourly.len()));

    if hourly.is_empty() {
        bail!("no hourly samples returned for {}..{}", args.start_date, args.end_date);
    }

    save_weather_csv(&hourly, &args.out)?;

    Ok(format!("File saved to `{}`", args.out.display()))
}

fn save_weather_csv(hourly: &HourlyData, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(WEATHER_COLUMNS)?;
    for i in 0..hourly.len() {
        writer.serialize(hourly.row(i))?;
    }
    writer.flush()?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn should_save_hourly_rows_with_header() {
        let hourly = HourlyData {
            time: vec!["2024-01-01T00:00".to_string()],
            temperature_2m: vec![Some(12.5)],
            dewpoint_2m: vec![Some(8.0)],
            surface_pressure: vec![Some(1013.2)],
            wind_speed_10m: vec![Some(3.4)],
            wind_speed_100m: vec![None],
            relative_humidity_2m: vec![Some(74.0)],
            cloud_cover: vec![Some(20.0)],
        };
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weather.csv");

        save_weather_csv(&hourly, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], WEATHER_COLUMNS.join(","));
        assert_eq!(lines[1], "2024-01-01T00:00,12.5,8.0,1013.2,3.4,,74.0,20.0");
    }

    #[test]
    fn should_save_header_for_empty_range() {
        let hourly = HourlyData {
            time: Vec::new(),
            temperature_2m: Vec::new(),
            dewpoint_2m: Vec::new(),
            surface_pressure: Vec::new(),
            wind_speed_10m: Vec::new(),
            wind_speed_100m: Vec::new(),
            relative_humidity_2m: Vec::new(),
            cloud_cover: Vec::new(),
        };
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("weather.csv");

        save_weather_csv(&hourly, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}\n", WEATHER_COLUMNS.join(",")));
    }
}
