mod district_ref;
mod district_type;
mod geometry;
mod loader;

pub use district_ref::{state_abbr, state_fips, DistrictRef};
pub use district_type::{DistrictType, DivisionPatterns};
pub use geometry::{DistrictGeometry, DistrictShape};
pub use loader::{DistrictGeometryLoader, ShapefileLoader};
