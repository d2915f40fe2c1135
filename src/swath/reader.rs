//! Scoped, read-only access to one swath file.
//!
//! The HDF5 handle lives only for the duration of `read_swath`; every array
//! comes back flattened row-major, ready for per-pixel filtering.

use std::path::Path;

use anyhow::Result;
use hdf5::types::VarLenUnicode;
use hdf5::{Dataset, File};

/// Geolocation field names, consulted in priority order.
const GEO_CANDIDATES: [(&str, &str); 2] = [
    ("Latitude", "Longitude"),
    ("CSBT_Latitude", "CSBT_Longitude"),
];

const SCIENCE_FIELDS: (&str, &str) = ("CTP", "CTT");
const TIME_FIELD: &str = "time";

/// Raw field contents of one swath file.
#[derive(Debug)]
pub struct Swath {
    pub source_file: String,
    /// The latitude field name that resolved, kept for logging.
    pub geo_field: &'static str,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub ctp: Option<Vec<f64>>,
    pub ctt: Option<Vec<f64>>,
    /// Empty when the file carries no time field; absence is legal.
    pub time_raw: Vec<f64>,
    /// The `units` attribute of the time field, when present.
    pub time_units: Option<String>,
}

/// Reads one swath file.
///
/// Returns `Ok(None)` when no geolocation field resolves under any candidate
/// name, which the caller reports as a per-file skip. Unreadable or corrupt
/// files surface as errors for the caller to log and skip.
pub fn read_swath(path: &Path) -> Result<Option<Swath>> {
    let file = File::open(path)?;
    let source_file = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());

    let (geo_field, lat, lon) = match read_geolocation(&file)? {
        Some(geo) => geo,
        None => return Ok(None),
    };

    let (ctp_field, ctt_field) = SCIENCE_FIELDS;
    let ctp = read_flat_opt(&file, ctp_field);
    let ctt = read_flat_opt(&file, ctt_field);

    let (time_raw, time_units) = match file.dataset(TIME_FIELD) {
        Ok(dataset) => {
            let units = read_units_attr(&dataset);
            (dataset.read_raw::<f64>()?, units)
        }
        Err(_) => (Vec::new(), None),
    };

    Ok(Some(Swath {
        source_file,
        geo_field,
        lat,
        lon,
        ctp,
        ctt,
        time_raw,
        time_units,
    }))
}

fn read_geolocation(file: &File) -> Result<Option<(&'static str, Vec<f64>, Vec<f64>)>> {
    for (lat_name, lon_name) in GEO_CANDIDATES {
        if let (Ok(lat_ds), Ok(lon_ds)) = (file.dataset(lat_name), file.dataset(lon_name)) {
            let lat = lat_ds.read_raw::<f64>()?;
            let lon = lon_ds.read_raw::<f64>()?;
            return Ok(Some((lat_name, lat, lon)));
        }
    }

    Ok(None)
}

// A science variable that is absent or unreadable degrades to a missing
// column, never to an extraction failure.
fn read_flat_opt(file: &File, name: &str) -> Option<Vec<f64>> {
    file.dataset(name)
        .ok()
        .and_then(|dataset| dataset.read_raw::<f64>().ok())
}

fn read_units_attr(dataset: &Dataset) -> Option<String> {
    let attr = dataset.attr("units").ok()?;
    attr.read_scalar::<VarLenUnicode>()
        .ok()
        .map(|value| value.to_string())
}

// -- Tests -------------------------------------------------------------------
