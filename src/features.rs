//! Feature engineering and turbulence labels for hourly weather tables.

use serde::{Deserialize, Serialize};

/// Interior gaps of at most this many consecutive missing samples are
/// filled linearly; longer gaps stay missing and their rows are dropped.
pub const GAP_LIMIT: usize = 3;

/// One hour of ERA5-style surface data. Any variable may be missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRow {
    pub time: String,
    pub temperature_2m: Option<f64>,
    pub dewpoint_2m: Option<f64>,
    pub surface_pressure: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub wind_speed_100m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub cloud_cover: Option<f64>,
}

/// Turbulence class from thresholding the instability index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Label {
    Low,
    Moderate,
    Severe,
}

/// Model feature vector with its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub wind_speed_10m: f64,
    pub wind_speed_100m: f64,
    pub wind_shear: f64,
    pub relative_humidity_2m: f64,
    pub cloud_cover: f64,
    pub surface_pressure: f64,
    pub dewpt_dep: f64,
    pub label: Label,
}

/// Fills short gaps column-wise, then derives one feature row per hour that
/// has every variable present.
pub fn make_features(mut rows: Vec<WeatherRow>) -> Vec<FeatureRow> {
    interpolate_columns(&mut rows);

    rows.iter().filter_map(feature_row).collect()
}

fn feature_row(row: &WeatherRow) -> Option<FeatureRow> {
    let temperature = row.temperature_2m?;
    let dewpoint = row.dewpoint_2m?;
    let pressure = row.surface_pressure?;
    let wind_10m = row.wind_speed_10m?;
    let wind_100m = row.wind_speed_100m?;
    let humidity = row.relative_humidity_2m?;
    let cloud = row.cloud_cover?;

    let wind_shear = (wind_100m - wind_10m).abs();
    let instability = 0.5 * wind_shear + 0.3 * (100.0 - humidity) + 0.2 * cloud;
    let label = label_for(instability)?;

    Some(FeatureRow {
        wind_speed_10m: wind_10m,
        wind_speed_100m: wind_100m,
        wind_shear,
        relative_humidity_2m: humidity,
        cloud_cover: cloud,
        surface_pressure: pressure,
        dewpt_dep: temperature - dewpoint,
        label,
    })
}

/// Thresholds the instability index: (-999, 10] Low, (10, 25] Moderate,
/// (25, 999] Severe. Out-of-range values get no label.
pub fn label_for(instability: f64) -> Option<Label> {
    if !instability.is_finite() || instability <= -999.0 || instability > 999.0 {
        None
    } else if instability <= 10.0 {
        Some(Label::Low)
    } else if instability <= 25.0 {
        Some(Label::Moderate)
    } else {
        Some(Label::Severe)
    }
}

fn columns() -> [fn(&mut WeatherRow) -> &mut Option<f64>; 7] {
    [
        |r| &mut r.temperature_2m,
        |r| &mut r.dewpoint_2m,
        |r| &mut r.surface_pressure,
        |r| &mut r.wind_speed_10m,
        |r| &mut r.wind_speed_100m,
        |r| &mut r.relative_humidity_2m,
        |r| &mut r.cloud_cover,
    ]
}

fn interpolate_columns(rows: &mut [WeatherRow]) {
    for column in columns() {
        let mut values: Vec<Option<f64>> = rows.iter_mut().map(|row| *column(row)).collect();
        interpolate_gaps(&mut values, GAP_LIMIT);
        for (row, value) in rows.iter_mut().zip(values) {
            *column(row) = value;
        }
    }
}

/// Linearly fills interior gaps of at most `limit` consecutive missing
/// values. Leading and trailing gaps have no second endpoint and stay
/// missing.
pub fn interpolate_gaps(values: &mut [Option<f64>], limit: usize) {
    let mut i = 0;

    while i < values.len() {
        if values[i].is_some() {
            i += 1;
            continue;
        }

        let gap_start = i;
        while i < values.len() && values[i].is_none() {
            i += 1;
        }
        let gap_len = i - gap_start;

        if gap_len > limit || gap_start == 0 || i == values.len() {
            continue;
        }

        if let (Some(left), Some(right)) = (values[gap_start - 1], values[i]) {
            let span = (gap_len + 1) as f64;
            for (k, slot) in values[gap_start..i].iter_mut().enumerate() {
                let fraction = (k + 1) as f64 / span;
                *slot = Some(left + (right - left) * fraction);
            }
        }
    }
}

// -- Tests -------------------------------------------------------------------
