mod extent;
mod proj;

pub use extent::{Extent, ViewExtentPolicy, CONTINENTAL_US};
pub use proj::{Projector, SourceCrs};
