//! Per-file extraction: one gzip CSV extract per swath file.
//!
//! Inputs whose extract already exists are skipped untouched, so a run
//! interrupted partway can simply be repeated.

use std::fs;
use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::{create_progress_bar, ExtractArgs};
use crate::flatten::PixelTable;
use crate::swath::{self, read_swath};
use crate::writer::CsvGzWriter;

use super::{file_label, make_output_file_name};

pub fn extract(args: &ExtractArgs) -> Result<String> {
    let files = swath::list_swath_files(&args.data_dir, "h5")?;
    if files.is_empty() {
        bail!("no .h5 files found in {}", args.data_dir.display());
    }
    fs::create_dir_all(&args.out_dir)?;

    let bar = create_progress_bar(files.len() as u64, "Extracting swath files".to_string());
    let mut processed = 0;
    let mut skipped = 0;
    let mut failed = 0;
    let mut total_rows = 0;

    for path in &files {
        let out_path = args.out_dir.join(make_output_file_name(path));

        if out_path.exists() {
            bar.println(format!("SKIP (exists): {}", file_label(path)));
            skipped += 1;
            bar.inc(1);
            continue;
        }

        match extract_file(path, &out_path, args) {
            Ok(Some((rows, geo_field))) => {
                bar.println(format!(
                    "✔ Processed: {} ({}) → rows: {}",
                    file_label(path),
                    geo_field,
                    rows
                ));
                processed += 1;
                total_rows += rows;
            }
            Ok(None) => {
                bar.println(format!("SKIP (no geo): {}", file_label(path)));
                skipped += 1;
            }
            Err(e) => {
                bar.println(format!("ERROR processing {}: {:#}", file_label(path), e));
                // Leave no partial artifact behind; the re-run skip check
                // must only see complete extracts.
                let _ = fs::remove_file(&out_path);
                failed += 1;
            }
        }
        bar.inc(1);
    }
    bar.finish_with_message("Extraction complete");

    Ok(format!(
        "{} processed, {} skipped, {} failed, {} rows → {}",
        processed,
        skipped,
        failed,
        total_rows,
        args.out_dir.display()
    ))
}

/// Extracts one swath file, reporting the row count and the geolocation
/// field that resolved. `Ok(None)` means the file has no geolocation under
/// any candidate name and was skipped.
fn extract_file(
    path: &Path,
    out_path: &Path,
    args: &ExtractArgs,
) -> Result<Option<(usize, &'static str)>> {
    let swath = match read_swath(path)? {
        Some(swath) => swath,
        None => return Ok(None),
    };
    let geo_field = swath.geo_field;

    let table = PixelTable::from_swath(swath, args.epoch)?;
    let valid = table.valid_indices(args.bbox.as_ref());

    let mut writer = CsvGzWriter::create(out_path);
    if valid.is_empty() {
        writer.write_batch(&[])?;
        return Ok(Some((0, geo_field)));
    }

    for chunk in valid.chunks(args.chunk_size.max(1)) {
        let batch = table.batch(chunk);
        writer.write_batch(&batch)?;
    }

    Ok(Some((valid.len(), geo_field)))
}

// -- Tests -------------------------------------------------------------------
