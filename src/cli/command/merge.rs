//! Concatenated extraction: one gzip CSV extract across all swath files.
//!
//! Any pre-existing output is removed at run start; the run is a single
//! clean pass with one writer, so the header appears exactly once no matter
//! which file produces the first rows.

use std::fs;
use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::{create_progress_bar, MergeArgs};
use crate::flatten::PixelTable;
use crate::swath::{self, read_swath};
use crate::writer::CsvGzWriter;

use super::file_label;

pub fn merge(args: &MergeArgs) -> Result<String> {
    let files = swath::list_swath_files(&args.data_dir, "h5")?;
    if files.is_empty() {
        bail!("no .h5 files found in {}", args.data_dir.display());
    }

    if args.out.exists() {
        fs::remove_file(&args.out)?;
    }

    let bar = create_progress_bar(files.len() as u64, "Merging swath files".to_string());
    let mut writer = CsvGzWriter::create(&args.out);
    let mut processed = 0;
    let mut skipped = 0;
    let mut failed = 0;
    let mut total_rows = 0;

    for path in &files {
        match merge_file(path, &mut writer, args) {
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
                failed += 1;
            }
        }
        bar.inc(1);
    }

    // Even a run with zero valid pixels leaves a well-formed artifact.
    if !writer.header_written() {
        writer.write_batch(&[])?;
    }
    bar.finish_with_message("Merge complete");

    Ok(format!(
        "{} processed, {} skipped, {} failed, {} rows → {}",
        processed,
        skipped,
        failed,
        total_rows,
        args.out.display()
    ))
}

fn merge_file(
    path: &Path,
    writer: &mut CsvGzWriter,
    args: &MergeArgs,
) -> Result<Option<(usize, &'static str)>> {
    let swath = match read_swath(path)? {
        Some(swath) => swath,
        None => return Ok(None),
    };
    let geo_field = swath.geo_field;

    let table = PixelTable::from_swath(swath, args.epoch)?;
    let valid = table.valid_indices(args.bbox.as_ref());

    for chunk in valid.chunks(args.chunk_size.max(1)) {
        let batch = table.batch(chunk);
        writer.write_batch(&batch)?;
    }

    Ok(Some((valid.len(), geo_field)))
}

// -- Tests -------------------------------------------------------------------
