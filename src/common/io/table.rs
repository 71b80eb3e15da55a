use std::{fs::File, path::{Path, PathBuf}};

use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReader, DataType, ParquetReader}};

use crate::{error::{Error, Result}, common::fs::require_file_exists};

/// Reads a CSV file from `path` into a Polars DataFrame.
pub(crate) fn read_from_csv(path: &Path) -> Result<DataFrame> {
    require_file_exists(path)?;
    let file = File::open(path)?;
    Ok(CsvReader::new(file).finish()?)
}

/// Reads a Parquet file from `path` into a Polars DataFrame.
pub(crate) fn read_from_parquet(path: &Path) -> Result<DataFrame> {
    require_file_exists(path)?;
    let file = File::open(path)?;
    Ok(ParquetReader::new(file).finish()?)
}

/// Reads a columnar table that may be split into partitions.
///
/// A directory is read as a partitioned Parquet dataset (every `*.parquet`/`*.parq` file, in
/// name order); a single file is read as Parquet, or as CSV when it has a `.csv` extension.
pub(crate) fn read_partitions(path: &Path) -> Result<Vec<DataFrame>> {
    if path.is_dir() {
        let mut parts: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && matches!(extension(p).as_deref(), Some("parquet" | "parq")))
            .collect();
        parts.sort();
        if parts.is_empty() {
            return Err(Error::Dataset(format!("no parquet partitions in {}", path.display())));
        }
        return parts.iter().map(|p| read_from_parquet(p)).collect();
    }

    match extension(path).as_deref() {
        Some("csv") => Ok(vec![read_from_csv(path)?]),
        _ => Ok(vec![read_from_parquet(path)?]),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase())
}

/// Column `name` as nullable floats, casting integer columns.
pub(crate) fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)
        .map_err(|_| Error::Dataset(format!("missing column {name:?}")))?
        .cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

/// Column `name` as nullable strings, casting categorical columns.
pub(crate) fn str_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)
        .map_err(|_| Error::Dataset(format!("missing column {name:?}")))?
        .cast(&DataType::String)?;
    Ok(column.str()?.into_iter().map(|s| s.map(str::to_string)).collect())
}
