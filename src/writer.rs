//! Gzip CSV output.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::flatten::PixelRecord;

/// Output column order; fixed so every artifact shares one schema.
pub const COLUMNS: [&str; 6] = ["source_file", "time", "lat", "lon", "CTP", "CTT"];

/// Appends batches of pixel records to one gzip CSV artifact.
///
/// The header is written exactly once, on the first batch, which also
/// creates the file. Every batch becomes a separate gzip member appended to
/// the artifact; decompressors read concatenated members back as one
/// continuous stream.
pub struct CsvGzWriter {
    path: PathBuf,
    header_written: bool,
}

impl CsvGzWriter {
    pub fn create(path: impl Into<PathBuf>) -> Self {
        CsvGzWriter {
            path: path.into(),
            header_written: false,
        }
    }

    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Writes one batch. An empty first batch still creates the artifact
    /// with its header, so downstream tooling always sees the schema.
    pub fn write_batch(&mut self, records: &[PixelRecord]) -> Result<()> {
        if self.header_written && records.is_empty() {
            return Ok(());
        }

        let file = if self.header_written {
            OpenOptions::new().append(true).open(&self.path)?
        } else {
            File::create(&self.path)?
        };

        let encoder = GzEncoder::new(file, Compression::default());
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(encoder);

        if !self.header_written {
            writer.write_record(COLUMNS)?;
            self.header_written = true;
        }

        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        let encoder = writer
            .into_inner()
            .map_err(|e| anyhow!("finishing csv batch: {}", e))?;
        encoder.finish()?;

        Ok(())
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;
    use flate2::read::MultiGzDecoder;
    use std::io::Read;
    use std::path::Path;
    use tempfile::TempDir;

    fn record(lat: f64) -> PixelRecord {
        PixelRecord {
            source_file: "swath.h5".to_string(),
            time: Some("2000-01-01T00:00:00".to_string()),
            lat,
            lon: 77.0,
            ctp: Some(950.0),
            ctt: None,
        }
    }

    fn read_decoded(path: &Path) -> String {
        let mut decoder = MultiGzDecoder::new(File::open(path).unwrap());
        let mut content = String::new();
        decoder.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn should_write_header_exactly_once_across_batches() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv.gz");
        let mut writer = CsvGzWriter::create(&path);

        writer.write_batch(&[record(10.0)]).unwrap();
        writer.write_batch(&[record(11.0), record(12.0)]).unwrap();

        let content = read_decoded(&path);
        let lines: Vec<_> = content.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "source_file,time,lat,lon,CTP,CTT");
        assert_eq!(lines[1], "swath.h5,2000-01-01T00:00:00,10.0,77.0,950.0,");
        assert_eq!(lines[2], "swath.h5,2000-01-01T00:00:00,11.0,77.0,950.0,");
        assert_eq!(lines[3], "swath.h5,2000-01-01T00:00:00,12.0,77.0,950.0,");
    }

    #[test]
    fn should_create_header_only_artifact_for_empty_batch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv.gz");
        let mut writer = CsvGzWriter::create(&path);

        writer.write_batch(&[]).unwrap();

        let content = read_decoded(&path);

        assert_eq!(content, "source_file,time,lat,lon,CTP,CTT\n");
    }

    #[test]
    fn should_match_unchunked_content_when_chunked() {
        let dir = TempDir::new().unwrap();
        let records: Vec<PixelRecord> = (0..10).map(|i| record(i as f64)).collect();

        let whole_path = dir.path().join("whole.csv.gz");
        let mut whole = CsvGzWriter::create(&whole_path);
        whole.write_batch(&records).unwrap();

        let chunked_path = dir.path().join("chunked.csv.gz");
        let mut chunked = CsvGzWriter::create(&chunked_path);
        for chunk in records.chunks(1) {
            chunked.write_batch(chunk).unwrap();
        }

        assert_eq!(read_decoded(&whole_path), read_decoded(&chunked_path));
    }
}
