use std::path::PathBuf;

use thiserror::Error;

use crate::district::DistrictType;

/// Errors raised while loading districts, geocoding addresses or rendering the view.
///
/// Every variant describes a failure of a single operation; none of them leave
/// the explorer in a partially updated state.
#[derive(Debug, Error)]
pub enum Error {
    /// The geocoding service returned an empty result set.
    #[error("no geocoding result for address {address:?}")]
    NotFound { address: String },

    /// A JSON response did not have the expected shape.
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: &'static str, reason: String },

    /// No division identifier matched the pattern for the district type.
    #[error("no {district_type} division found for address {address:?}")]
    NoMatch { district_type: DistrictType, address: String },

    /// The district type has no shapefile (or the key is unknown).
    #[error("unknown district type: {0}")]
    UnknownDistrictType(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// An extent was requested for geometry with no coordinates.
    #[error("cannot compute an extent from empty geometry")]
    EmptyGeometry,

    /// Bounds collapsed to a line or a point on at least one axis.
    #[error("degenerate extent: x=({x_min}, {x_max}) y=({y_min}, {y_max})")]
    DegenerateExtent { x_min: f64, x_max: f64, y_min: f64, y_max: f64 },

    #[error("district {id:?} is not part of the loaded {district_type} geometry")]
    DistrictNotFound { district_type: DistrictType, id: String },

    /// The same district number names districts in several states.
    #[error("district {id:?} matches {count} {district_type} districts; qualify it with a state, e.g. TX-{id}")]
    AmbiguousDistrict { district_type: DistrictType, id: String, count: usize },

    /// A district reference could not be parsed.
    #[error("invalid district: {0}")]
    InvalidDistrict(String),

    #[error("http error: {0}")]
    Http(String),

    #[error("projection error: {0}")]
    Projection(String),

    #[error("census dataset error: {0}")]
    Dataset(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    /// A layer kind was passed more than once to `CompositeView::compose`.
    #[error("layer {0} supplied more than once")]
    DuplicateLayer(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<polars::error::PolarsError> for Error {
    fn from(err: polars::error::PolarsError) -> Self {
        Error::Dataset(err.to_string())
    }
}
