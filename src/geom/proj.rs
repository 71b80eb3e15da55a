use geo::{Coord, LineString};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::error::{Error, Result};

/// Longitude/latitude on the Web Mercator sphere. Census NAD83 and WGS84 coordinates are
/// used directly, which is how EPSG:3857 treats geodetic input.
const GEOGRAPHIC_PROJ4: &str = "+proj=longlat +a=6378137 +b=6378137 +no_defs +type=crs";

/// EPSG:3857 (pseudo/Web Mercator), the display projection of the map tiles.
const WEB_MERCATOR_PROJ4: &str =
    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs +type=crs";

/// WKT markers of the spherical (pseudo) Mercator. Ellipsoidal Mercator (EPSG:3395)
/// differs by kilometers at mid-latitudes and is not accepted.
const WEB_MERCATOR_MARKERS: [&str; 4] = [
    "Mercator_Auxiliary_Sphere",
    "Popular Visualisation",
    "Pseudo-Mercator",
    "Pseudo_Mercator",
];

/// Coordinate system of a source shapefile, as read from its `.prj` sidecar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCrs {
    Geographic,     // NAD83 / WGS84 degrees
    WebMercator,    // Already in display units
}

impl SourceCrs {
    /// Classify the WKT in a `.prj` file. Geographic CRSs (the census default) need
    /// reprojection; a Web Mercator PROJCS is taken as already displayable.
    pub fn from_prj(wkt: &str) -> Result<Self> {
        let wkt = wkt.trim();
        if wkt.is_empty() || wkt.starts_with("GEOGCS") || wkt.starts_with("GEOGCRS") {
            return Ok(SourceCrs::Geographic);
        }
        if WEB_MERCATOR_MARKERS.iter().any(|marker| wkt.contains(marker)) {
            return Ok(SourceCrs::WebMercator);
        }
        Err(Error::Projection(format!("unsupported source CRS: {}", wkt.chars().take(60).collect::<String>())))
    }
}

/// Reprojects source coordinates into Web Mercator meters.
pub struct Projector {
    from: Proj4,
    to: Proj4,
    source: SourceCrs,
}

impl Projector {
    pub fn new(source: SourceCrs) -> Result<Self> {
        let build = |proj_string: &str| Proj4::from_proj_string(proj_string)
            .map_err(|e| Error::Projection(format!("failed to build PROJ.4 {proj_string}: {e}")));

        Ok(Self { from: build(GEOGRAPHIC_PROJ4)?, to: build(WEB_MERCATOR_PROJ4)?, source })
    }

    #[inline] pub fn source(&self) -> SourceCrs { self.source }

    /// Project one coordinate (degrees in, meters out).
    pub fn project(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        if self.source == SourceCrs::WebMercator {
            return Ok(coord);
        }
        let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
        transform(&self.from, &self.to, &mut point)
            .map_err(|e| Error::Projection(format!("cannot project ({}, {}): {e}", coord.x, coord.y)))?;
        Ok(Coord { x: point.0, y: point.1 })
    }

    pub fn project_ring(&self, ring: &LineString<f64>) -> Result<LineString<f64>> {
        ring.0.iter()
            .map(|&coord| self.project(coord))
            .collect::<Result<Vec<_>>>()
            .map(LineString)
    }
}
