//! Derive model features and turbulence labels from an hourly weather CSV.

use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::FeaturesArgs;
use crate::features::{make_features, FeatureRow, WeatherRow};

pub fn features(args: &FeaturesArgs) -> Result<String> {
    let rows = load_weather_csv(&args.input)?;
    if rows.is_empty() {
        bail!("no rows in {}", args.input.display());
    }

    let features = make_features(rows);
    save_features_csv(&features, &args.out)?;

    Ok(format!(
        "{} feature rows saved to `{}`",
        features.len(),
        args.out.display()
    ))
}

fn load_weather_csv(path: &Path) -> Result<Vec<WeatherRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();

    for result in reader.deserialize() {
        rows.push(result?);
    }

    Ok(rows)
}

fn save_features_csv(features: &[FeatureRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    for feature in features {
        writer.serialize(feature)?;
    }
    writer.flush()?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
