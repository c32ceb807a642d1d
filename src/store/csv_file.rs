use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use csv::WriterBuilder;
use thiserror::Error;

use crate::model::Candle;

const HEADER: [&str; 6] = ["time", "low", "high", "open", "close", "volume"];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// De-duplicates by time, keeping the last candle seen for each, and sorts ascending.
pub fn dedup_and_sort(candles: impl IntoIterator<Item = Candle>) -> Vec<Candle> {
    let by_time: BTreeMap<i64, Candle> = candles.into_iter().map(|c| (c.time, c)).collect();
    by_time.into_values().collect()
}

/// Writes candles to `path`, replacing any existing file. Parent directories are created.
/// Rows go to a sibling `.part` file first, so a failed write leaves `path` untouched.
pub fn write_candles(candles: &[Candle], path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let rows = dedup_and_sort(candles.iter().copied());
    let part = part_path(path);

    if let Err(err) = write_rows(&rows, &part) {
        fs::remove_file(&part).ok();
        return Err(err);
    }
    fs::rename(&part, path).inspect_err(|_| {
        fs::remove_file(&part).ok();
    })?;
    Ok(())
}

// out.csv -> .out.csv.part in the same directory, so the rename stays on one filesystem.
fn part_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".part");
    path.with_file_name(name)
}

fn write_rows(rows: &[Candle], path: &Path) -> Result<(), StoreError> {
    // Header is written explicitly so an empty file still carries it.
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(HEADER)?;
    for candle in rows {
        writer.serialize(candle)?;
    }
    writer.flush()?;
    Ok(())
}
