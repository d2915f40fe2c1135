//! Per-pixel flattening and validity filtering.

use std::str::FromStr;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::swath::{time, Swath, TimeEpoch};

/// Sentinel marking an invalid pixel in the geolocation fields.
pub const LAT_FILL: f64 = 32767.0;

/// The atomic output unit: one valid pixel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelRecord {
    pub source_file: String,
    pub time: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "CTP")]
    pub ctp: Option<f64>,
    #[serde(rename = "CTT")]
    pub ctt: Option<f64>,
}

/// Optional geographic filter, ANDed with the fill-value mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lon_min: f64,
    pub lat_min: f64,
    pub lon_max: f64,
    pub lat_max: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lon >= self.lon_min && lon <= self.lon_max && lat >= self.lat_min && lat <= self.lat_max
    }
}

impl FromStr for BoundingBox {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()?;

        if parts.len() != 4 {
            bail!("expected \"lon_min,lat_min,lon_max,lat_max\", got `{}`", s);
        }

        Ok(BoundingBox {
            lon_min: parts[0],
            lat_min: parts[1],
            lon_max: parts[2],
            lat_max: parts[3],
        })
    }
}

/// One swath flattened to per-pixel columns, ready for filtering and writing.
#[derive(Debug)]
pub struct PixelTable {
    pub source_file: String,
    times: Vec<Option<String>>,
    lat: Vec<f64>,
    lon: Vec<f64>,
    ctp: Vec<f64>,
    ctt: Vec<f64>,
}

impl PixelTable {
    /// Normalizes the time column and fits the science columns to the
    /// canonical pixel count (the latitude length).
    pub fn from_swath(swath: Swath, epoch: TimeEpoch) -> Result<Self> {
        let n = swath.lat.len();

        let normalized = time::to_timestamps(&swath.time_raw, epoch, swath.time_units.as_deref());
        let times = time::broadcast(normalized, n)?;

        Ok(PixelTable {
            source_file: swath.source_file,
            times,
            lat: swath.lat,
            lon: swath.lon,
            ctp: fit_science(swath.ctp, n),
            ctt: fit_science(swath.ctt, n),
        })
    }

    /// Indices of pixels passing the fill-value mask (and bounding box, when
    /// configured), in pixel order. Science NaNs never mask a row.
    pub fn valid_indices(&self, bbox: Option<&BoundingBox>) -> Vec<usize> {
        (0..self.lat.len())
            .filter(|&i| {
                let lat = self.lat[i];
                let lon = match self.lon.get(i) {
                    Some(&lon) => lon,
                    None => return false,
                };

                lat != LAT_FILL
                    && lat.is_finite()
                    && lon.is_finite()
                    && bbox.map_or(true, |b| b.contains(lat, lon))
            })
            .collect()
    }

    pub fn record(&self, i: usize) -> PixelRecord {
        PixelRecord {
            source_file: self.source_file.clone(),
            time: self.times.get(i).cloned().flatten(),
            lat: self.lat[i],
            lon: self.lon[i],
            ctp: present(self.ctp[i]),
            ctt: present(self.ctt[i]),
        }
    }

    /// Materializes one write batch of valid pixels.
    pub fn batch(&self, indices: &[usize]) -> Vec<PixelRecord> {
        indices.iter().map(|&i| self.record(i)).collect()
    }
}

// A missing or wrong-length science array degrades to an all-NaN column,
// never to an omitted column.
fn fit_science(values: Option<Vec<f64>>, n: usize) -> Vec<f64> {
    match values {
        Some(v) if v.len() == n => v,
        _ => vec![f64::NAN; n],
    }
}

fn present(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    fn table(lat: Vec<f64>, lon: Vec<f64>) -> PixelTable {
        let n = lat.len();
        PixelTable {
            source_file: "swath.h5".to_string(),
            times: vec![None; n],
            lat,
            lon,
            ctp: vec![f64::NAN; n],
            ctt: vec![f64::NAN; n],
        }
    }

    #[test]
    fn should_mask_fill_and_nan_coordinates() {
        let table = table(vec![10.0, LAT_FILL, 20.0], vec![77.0, 78.0, f64::NAN]);

        let valid = table.valid_indices(None);

        assert_eq!(valid, vec![0]);
        let record = table.record(0);
        assert_eq!(record.lat, 10.0);
        assert_eq!(record.lon, 77.0);
    }

    #[test]
    fn should_apply_bounding_box_when_configured() {
        let table = table(vec![5.0, 10.0, 40.0], vec![70.0, 77.0, 77.0]);
        let bbox: BoundingBox = "68.0,6.0,98.0,37.0".parse().unwrap();

        assert_eq!(table.valid_indices(Some(&bbox)), vec![1]);
        assert_eq!(table.valid_indices(None), vec![0, 1, 2]);
    }

    #[test]
    fn should_reject_malformed_bounding_box() {
        assert!("68.0,6.0,98.0".parse::<BoundingBox>().is_err());
        assert!("a,b,c,d".parse::<BoundingBox>().is_err());
    }

    #[test]
    fn should_pass_science_nan_through_as_null() {
        let mut table = table(vec![10.0], vec![77.0]);
        table.ctp = vec![950.0];

        let record = table.record(0);

        assert_eq!(record.ctp, Some(950.0));
        assert_eq!(record.ctt, None);
    }

    #[test]
    fn should_fit_wrong_length_science_to_all_missing() {
        let fitted = fit_science(Some(vec![1.0, 2.0]), 3);

        assert_eq!(fitted.len(), 3);
        assert!(fitted.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn should_batch_in_index_order() {
        let mut table = table(vec![10.0, 11.0, 12.0], vec![70.0, 71.0, 72.0]);
        table.times = vec![Some("t0".to_string()), Some("t1".to_string()), Some("t2".to_string())];

        let batch = table.batch(&[2, 0]);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].lat, 12.0);
        assert_eq!(batch[0].time.as_deref(), Some("t2"));
        assert_eq!(batch[1].lat, 10.0);
    }
}
