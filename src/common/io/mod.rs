mod shp;
mod svg;
mod table;

pub use svg::Rgb;
pub(crate) use shp::*;
pub(crate) use svg::*;
pub(crate) use table::*;
