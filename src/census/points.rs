use std::path::Path;

use polars::frame::DataFrame;
use tracing::{info, warn};

use crate::{census::ColorKey, common, error::{Error, Result}};

/// Projected census points with one demographic category each.
///
/// Loaded once at startup and shared read-only for the life of the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CensusPoints {
    easting: Vec<f64>,
    northing: Vec<f64>,
    category: Vec<u8>, // Index into the ColorKey
}

impl CensusPoints {
    /// Build from parallel columns; categories index into the color key.
    pub fn new(easting: Vec<f64>, northing: Vec<f64>, category: Vec<u8>) -> Result<Self> {
        if easting.len() != northing.len() || easting.len() != category.len() {
            return Err(Error::Dataset(format!(
                "column length mismatch: easting={} northing={} category={}",
                easting.len(), northing.len(), category.len(),
            )));
        }
        Ok(Self { easting, northing, category })
    }

    /// Read `easting`, `northing` and `race` from a Parquet file, a partitioned Parquet
    /// directory or a CSV file. Rows with nulls or codes missing from `key` are dropped.
    pub fn read(path: &Path, key: &ColorKey) -> Result<Self> {
        let mut points = Self::default();
        let mut skipped = 0usize;

        for df in common::read_partitions(path)? {
            skipped += points.append_frame(&df, key)?;
        }

        if skipped > 0 {
            warn!(skipped, "dropped census rows with missing values or unknown categories");
        }
        info!(points = points.len(), path = %path.display(), "census points loaded");
        Ok(points)
    }

    fn append_frame(&mut self, df: &DataFrame, key: &ColorKey) -> Result<usize> {
        let easting = common::f64_column(df, "easting")?;
        let northing = common::f64_column(df, "northing")?;
        let race = common::str_column(df, "race")?;

        let mut skipped = 0;
        for ((x, y), code) in easting.into_iter().zip(northing).zip(race) {
            match (x, y, code.as_deref().and_then(|c| key.index_of(c))) {
                (Some(x), Some(y), Some(cat)) if x.is_finite() && y.is_finite() => {
                    self.easting.push(x);
                    self.northing.push(y);
                    self.category.push(cat);
                }
                _ => skipped += 1,
            }
        }
        Ok(skipped)
    }

    #[inline] pub fn len(&self) -> usize { self.easting.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.easting.is_empty() }

    /// Iterate `(easting, northing, category)`.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, u8)> + '_ {
        self.easting.iter().zip(&self.northing).zip(&self.category)
            .map(|((&x, &y), &c)| (x, y, c))
    }
}
