//! Command line interface.

pub mod command;

use std::path::PathBuf;
use std::time::Duration;

use clap::{command, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::flatten::BoundingBox;
use crate::swath::TimeEpoch;

#[derive(Parser)]
#[command(version, about, long_about = None)]
/// Contains the commands
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert swath files to one CSV extract per input
    Extract(ExtractArgs),
    /// Convert swath files to a single concatenated CSV extract
    Merge(MergeArgs),
    /// Fetch ERA5 hourly reanalysis data for one location
    Fetch(FetchArgs),
    /// Derive model features and turbulence labels from an hourly weather CSV
    Features(FeaturesArgs),
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Directory of .h5 swath files
    #[arg(long, default_value = "mosdac_data")]
    pub data_dir: PathBuf,

    /// Directory for the per-file .csv.gz extracts
    #[arg(long, default_value = "processed_csv")]
    pub out_dir: PathBuf,

    /// Time epoch convention of the product family
    #[arg(long, value_enum, default_value_t = TimeEpoch::Auto)]
    pub epoch: TimeEpoch,

    /// Optional bounding box "lon_min,lat_min,lon_max,lat_max"
    #[arg(long)]
    pub bbox: Option<BoundingBox>,

    /// Rows per write batch
    #[arg(long, default_value_t = 500_000)]
    pub chunk_size: usize,
}

#[derive(Args)]
pub struct MergeArgs {
    /// Directory of .h5 swath files
    #[arg(long, default_value = "mosdac_data")]
    pub data_dir: PathBuf,

    /// Path of the concatenated .csv.gz extract
    #[arg(long, default_value = "mosdac_flat.csv.gz")]
    pub out: PathBuf,

    /// Time epoch convention of the product family
    #[arg(long, value_enum, default_value_t = TimeEpoch::Auto)]
    pub epoch: TimeEpoch,

    /// Optional bounding box "lon_min,lat_min,lon_max,lat_max"
    #[arg(long)]
    pub bbox: Option<BoundingBox>,

    /// Rows per write batch
    #[arg(long, default_value_t = 500_000)]
    pub chunk_size: usize,
}

#[derive(Args)]
pub struct FetchArgs {
    /// Latitude of the location
    #[arg(long)]
    pub lat: f64,

    /// Longitude of the location
    #[arg(long)]
    pub lon: f64,

    /// First day of the range, YYYY-MM-DD
    #[arg(long)]
    pub start_date: String,

    /// Last day of the range, YYYY-MM-DD
    #[arg(long)]
    pub end_date: String,

    /// Path of the hourly weather CSV
    #[arg(long, default_value = "era5_hourly.csv")]
    pub out: PathBuf,
}

#[derive(Args)]
pub struct FeaturesArgs {
    /// Hourly weather CSV (the `fetch` output schema)
    #[arg(long)]
    pub input: PathBuf,

    /// Path of the features CSV
    #[arg(long, default_value = "features.csv")]
    pub out: PathBuf,
}

/// Creates a spinner.
pub fn create_spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner().with_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));

    bar
}

/// Creates a progress bar.
pub fn create_progress_bar(size: u64, message: String) -> ProgressBar {
    ProgressBar::new(size).with_message(message).with_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    )
}
