use std::{fs, path::Path};

use shapefile::{dbase::{FieldValue, Record}, Reader, Shape};

use crate::{common::fs::require_file_exists, error::{Error, Result}};

/// Reads all shapes + attribute records from a given `.shp` file path.
pub(crate) fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>> {
    require_file_exists(path)?;

    let parse_error = |e: shapefile::Error| Error::Parse { path: path.to_path_buf(), reason: e.to_string() };

    let mut reader = Reader::from_path(path).map_err(parse_error)?;
    let mut items = Vec::with_capacity(reader.shape_count().map_err(parse_error)?);
    for result in reader.iter_shapes_and_records() {
        items.push(result.map_err(parse_error)?);
    }
    Ok(items)
}

/// Reads the `.prj` sidecar next to a `.shp`, if present.
pub(crate) fn read_prj(shp_path: &Path) -> Result<Option<String>> {
    let prj = shp_path.with_extension("prj");
    if !prj.is_file() { return Ok(None) }
    Ok(Some(fs::read_to_string(prj)?))
}

/// Text value of an attribute field, trimmed; `None` for missing or non-text fields.
pub(crate) fn record_text(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        FieldValue::Character(Some(s)) => Some(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => Some(format!("{n}")),
        _ => None,
    }
}
