use std::path::{Path, PathBuf};

use shapefile::Shape;
use tracing::{debug, warn};

use crate::{
    common,
    district::{DistrictGeometry, DistrictShape, DistrictType},
    error::{Error, Result},
    geom::{Projector, SourceCrs},
};

/// Census boundary files carry the state FIPS code of every district in this column.
const STATE_FIELD: &str = "STATEFP";

/// Produces the projected district outlines for a district type.
///
/// Implementations must be pure functions of `district_type`; callers cache results.
pub trait DistrictGeometryLoader: Send + Sync {
    fn load(&self, district_type: DistrictType) -> Result<DistrictGeometry>;
}

/// Loads census cartographic boundary shapefiles laid out as `<data_dir>/<name>/<name>.shp`.
#[derive(Debug, Clone)]
pub struct ShapefileLoader {
    data_dir: PathBuf,
}

impl ShapefileLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self { Self { data_dir: data_dir.into() } }

    #[inline] pub fn data_dir(&self) -> &Path { &self.data_dir }

    /// Location of the `.shp` for a district type.
    pub fn shapefile_path(&self, district_type: DistrictType) -> Result<PathBuf> {
        let name = district_type.shapefile_name()
            .ok_or_else(|| Error::UnknownDistrictType(district_type.to_string()))?;
        Ok(self.data_dir.join(name).join(format!("{name}.shp")))
    }
}

impl DistrictGeometryLoader for ShapefileLoader {
    fn load(&self, district_type: DistrictType) -> Result<DistrictGeometry> {
        let path = self.shapefile_path(district_type)?;
        debug!(%district_type, path = %path.display(), "loading district shapefile");

        let source = match common::read_prj(&path)? {
            Some(wkt) => SourceCrs::from_prj(&wkt)?,
            None => SourceCrs::Geographic,
        };
        let projector = Projector::new(source)?;
        let id_field = district_type.id_field();

        let mut districts = Vec::new();
        for (shape, record) in common::read_shapefile(&path)? {
            let polygon = match shape {
                Shape::Polygon(p) => p,
                Shape::NullShape => continue,
                other => {
                    warn!(%district_type, shape = ?other.shapetype(), "skipping non-polygon shape");
                    continue;
                }
            };

            let rings = common::shp_to_rings(&polygon).iter()
                .map(|ring| projector.project_ring(ring))
                .collect::<Result<Vec<_>>>()?;
            if rings.is_empty() { continue }

            let id = id_field.and_then(|field| common::record_text(&record, field));
            let state = common::record_text(&record, STATE_FIELD).filter(|s| !s.is_empty());
            districts.push(DistrictShape::new(id, rings).with_state(state));
        }

        debug!(%district_type, districts = districts.len(), "district shapefile loaded");
        Ok(DistrictGeometry::new(district_type, districts))
    }
}
