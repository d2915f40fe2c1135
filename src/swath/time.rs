//! Time field normalization.
//!
//! MOSDAC product families disagree on the time epoch: some store minutes
//! since 2000-01-01, others seconds since 1970-01-01. The convention is an
//! explicit option; `Auto` consults the dataset's `units` attribute before
//! falling back to a magnitude heuristic.

use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeEpoch {
    /// Infer from the `units` attribute, else from value magnitude
    Auto,
    /// Minutes since 2000-01-01 00:00:00
    Minutes2000,
    /// Seconds since 1970-01-01 00:00:00
    Seconds1970,
}

impl TimeEpoch {
    /// Resolves `Auto` against file metadata, then the raw values.
    pub fn resolve(self, units: Option<&str>, raw: &[f64]) -> TimeEpoch {
        match self {
            TimeEpoch::Auto => from_units(units).unwrap_or_else(|| from_magnitude(raw)),
            explicit => explicit,
        }
    }
}

fn from_units(units: Option<&str>) -> Option<TimeEpoch> {
    let units = units?.to_lowercase();
    if units.starts_with("minutes since 2000") {
        Some(TimeEpoch::Minutes2000)
    } else if units.starts_with("seconds since 1970") {
        Some(TimeEpoch::Seconds1970)
    } else {
        None
    }
}

// Values above 1e9 can only be seconds since 1970; minutes since 2000 stay
// far below that for any plausible observation date.
fn from_magnitude(raw: &[f64]) -> TimeEpoch {
    let max = raw
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::MIN, f64::max);

    if max > 1e9 {
        TimeEpoch::Seconds1970
    } else {
        TimeEpoch::Minutes2000
    }
}

/// Converts a raw time array to ISO-8601 text under the given convention.
///
/// An element that cannot be converted (non-finite, or outside the calendar
/// range) falls back to its raw numeric text.
pub fn to_timestamps(raw: &[f64], epoch: TimeEpoch, units: Option<&str>) -> Vec<String> {
    let epoch = epoch.resolve(units, raw);

    raw.iter().map(|&value| to_timestamp(value, epoch)).collect()
}

fn to_timestamp(value: f64, epoch: TimeEpoch) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let converted = match epoch {
        TimeEpoch::Minutes2000 => epoch_2000().checked_add_signed(millis(value * 60_000.0)),
        TimeEpoch::Seconds1970 => epoch_1970().checked_add_signed(millis(value * 1_000.0)),
        TimeEpoch::Auto => None,
    };

    match converted {
        Some(timestamp) => timestamp.format("%Y-%m-%dT%H:%M:%S").to_string(),
        None => value.to_string(),
    }
}

/// Expands a normalized time column to one entry per pixel.
///
/// Length `n` is per-pixel, length 1 broadcasts, length 0 means no time
/// field. Any other cardinality is an error; the caller converts it to a
/// per-file skip.
pub fn broadcast(times: Vec<String>, n: usize) -> Result<Vec<Option<String>>> {
    match times.len() {
        0 => Ok(vec![None; n]),
        1 => Ok(vec![Some(times[0].clone()); n]),
        len if len == n => Ok(times.into_iter().map(Some).collect()),
        len => bail!("time field has {} entries for {} pixels", len, n),
    }
}

fn epoch_2000() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn epoch_1970() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn millis(value: f64) -> Duration {
    Duration::milliseconds(value as i64)
}

// -- Tests -------------------------------------------------------------------
