use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::{district::{DistrictGeometry, DistrictRef, DistrictType}, error::{Error, Result}};

/// Visible map range in Web Mercator meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExtent", into = "RawExtent")]
pub struct Extent {
    x: (f64, f64),
    y: (f64, f64),
}

/// Continental USA in Web Mercator.
pub const CONTINENTAL_US: Extent = Extent {
    x: (-13884029.0, -7453303.5),
    y: (2818291.5, 6335972.0),
};

impl Extent {
    /// Build an extent, rejecting empty, inverted or non-finite ranges.
    pub fn new(x: (f64, f64), y: (f64, f64)) -> Result<Self> {
        let finite = [x.0, x.1, y.0, y.1].iter().all(|v| v.is_finite());
        if !finite || x.0 >= x.1 || y.0 >= y.1 {
            return Err(Error::DegenerateExtent { x_min: x.0, x_max: x.1, y_min: y.0, y_max: y.1 });
        }
        Ok(Self { x, y })
    }

    /// Bounding range of a set of coordinates.
    pub fn from_coords<'a>(coords: impl IntoIterator<Item = &'a Coord<f64>>) -> Result<Self> {
        let (x, y) = coords.into_iter()
            .fold(None, |acc: Option<((f64, f64), (f64, f64))>, c| Some(match acc {
                None => ((c.x, c.x), (c.y, c.y)),
                Some((x, y)) => ((x.0.min(c.x), x.1.max(c.x)), (y.0.min(c.y), y.1.max(c.y))),
            }))
            .ok_or(Error::EmptyGeometry)?;
        Self::new(x, y)
    }

    #[inline] pub fn x_range(&self) -> (f64, f64) { self.x }

    #[inline] pub fn y_range(&self) -> (f64, f64) { self.y }

    #[inline] pub fn width(&self) -> f64 { self.x.1 - self.x.0 }

    #[inline] pub fn height(&self) -> f64 { self.y.1 - self.y.0 }

    #[inline]
    pub fn contains(&self, c: &Coord<f64>) -> bool {
        c.x >= self.x.0 && c.x <= self.x.1 && c.y >= self.y.0 && c.y <= self.y.1
    }

    /// Grow each side by `fraction` of the extent's size.
    pub fn padded(&self, fraction: f64) -> Self {
        let (dx, dy) = (self.width() * fraction.max(0.0), self.height() * fraction.max(0.0));
        Self { x: (self.x.0 - dx, self.x.1 + dx), y: (self.y.0 - dy, self.y.1 + dy) }
    }
}

#[derive(Serialize, Deserialize)]
struct RawExtent {
    x: (f64, f64),
    y: (f64, f64),
}

impl TryFrom<RawExtent> for Extent {
    type Error = Error;

    fn try_from(raw: RawExtent) -> Result<Self> { Extent::new(raw.x, raw.y) }
}

impl From<Extent> for RawExtent {
    fn from(extent: Extent) -> Self { RawExtent { x: extent.x, y: extent.y } }
}

/// Chooses the visible extent for a district type: a fixed default for nationwide
/// types, otherwise the bounds of the loaded geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewExtentPolicy {
    default_extent: Extent,
    nationwide: Vec<DistrictType>,
    padding: f64,
}

impl Default for ViewExtentPolicy {
    fn default() -> Self {
        Self::new(CONTINENTAL_US, vec![DistrictType::UsHouse], 0.0)
    }
}

impl ViewExtentPolicy {
    pub fn new(default_extent: Extent, nationwide: Vec<DistrictType>, padding: f64) -> Self {
        Self { default_extent, nationwide, padding }
    }

    #[inline] pub fn default_extent(&self) -> Extent { self.default_extent }

    #[inline]
    pub fn uses_default(&self, district_type: DistrictType) -> bool {
        self.nationwide.contains(&district_type)
    }

    /// Extent to show after switching to `district_type`.
    pub fn compute_extent(&self, district_type: DistrictType, geometry: Option<&DistrictGeometry>) -> Result<Extent> {
        if self.uses_default(district_type) {
            return Ok(self.default_extent);
        }
        let geometry = geometry.ok_or(Error::EmptyGeometry)?;
        Ok(Extent::from_coords(geometry.coords())?.padded(self.padding))
    }

    /// Extent framing a single district of `geometry`.
    pub fn district_extent(&self, geometry: &DistrictGeometry, wanted: &DistrictRef) -> Result<Extent> {
        let district = geometry.locate(wanted)?;
        Ok(Extent::from_coords(district.coords())?.padded(self.padding))
    }
}

#[cfg(test)]
mod tests {
    use geo::LineString;

    use super::*;
    use crate::district::DistrictShape;

    fn geometry(ty: DistrictType, points: Vec<(f64, f64)>) -> DistrictGeometry {
        DistrictGeometry::new(ty, vec![DistrictShape::new(Some("1".into()), vec![LineString::from(points)])])
    }

    #[test]
    fn nationwide_type_uses_continental_default() {
        let extent = ViewExtentPolicy::default().compute_extent(DistrictType::UsHouse, None).unwrap();
        assert_eq!(extent.x_range(), (-13884029.0, -7453303.5));
        assert_eq!(extent.y_range(), (2818291.5, 6335972.0));
    }

    #[test]
    fn nationwide_type_ignores_geometry() {
        let geometry = geometry(DistrictType::UsHouse, vec![(0.0, 0.0), (1.0, 1.0)]);
        let extent = ViewExtentPolicy::default().compute_extent(DistrictType::UsHouse, Some(&geometry)).unwrap();
        assert_eq!(extent, CONTINENTAL_US);
    }

    #[test]
    fn other_types_fit_geometry_bounds() {
        let geometry = geometry(DistrictType::StateHouse, vec![(0.0, 0.0), (10.0, 5.0), (-3.0, 8.0)]);
        let extent = ViewExtentPolicy::default().compute_extent(DistrictType::StateHouse, Some(&geometry)).unwrap();
        assert_eq!(extent.x_range(), (-3.0, 10.0));
        assert_eq!(extent.y_range(), (0.0, 8.0));
    }

    #[test]
    fn empty_geometry_is_an_error() {
        let policy = ViewExtentPolicy::default();
        let empty = DistrictGeometry::new(DistrictType::StateSenate, vec![]);

        assert!(matches!(policy.compute_extent(DistrictType::StateSenate, Some(&empty)), Err(Error::EmptyGeometry)));
        assert!(matches!(policy.compute_extent(DistrictType::StateSenate, None), Err(Error::EmptyGeometry)));
    }

    #[test]
    fn collapsed_bounds_are_rejected() {
        let line = geometry(DistrictType::StateSenate, vec![(0.0, 1.0), (5.0, 1.0)]);
        assert!(matches!(
            ViewExtentPolicy::default().compute_extent(DistrictType::StateSenate, Some(&line)),
            Err(Error::DegenerateExtent { .. }),
        ));
    }

    #[test]
    fn extent_new_validates_ranges() {
        assert!(Extent::new((0.0, 1.0), (0.0, 1.0)).is_ok());
        assert!(Extent::new((1.0, 0.0), (0.0, 1.0)).is_err());
        assert!(Extent::new((0.0, 1.0), (0.0, f64::NAN)).is_err());
    }

    #[test]
    fn padding_grows_each_side() {
        let policy = ViewExtentPolicy::new(CONTINENTAL_US, vec![], 0.1);
        let geometry = geometry(DistrictType::County, vec![(0.0, 0.0), (10.0, 20.0)]);
        let extent = policy.compute_extent(DistrictType::County, Some(&geometry)).unwrap();
        assert_eq!(extent.x_range(), (-1.0, 11.0));
        assert_eq!(extent.y_range(), (-2.0, 22.0));
    }

    #[test]
    fn district_extent_frames_one_district() {
        let geometry = DistrictGeometry::new(DistrictType::StateHouse, vec![
            DistrictShape::new(Some("01".into()), vec![LineString::from(vec![(0.0, 0.0), (2.0, 2.0)])]),
            DistrictShape::new(Some("02".into()), vec![LineString::from(vec![(10.0, 10.0), (12.0, 15.0)])]),
        ]);
        let policy = ViewExtentPolicy::default();

        let extent = policy.district_extent(&geometry, &"2".parse().unwrap()).unwrap();
        assert_eq!(extent.x_range(), (10.0, 12.0));
        assert_eq!(extent.y_range(), (10.0, 15.0));

        assert!(matches!(
            policy.district_extent(&geometry, &"3".parse().unwrap()),
            Err(Error::DistrictNotFound { .. }),
        ));
    }

    #[test]
    fn extent_deserializes_with_validation() {
        let extent: Extent = serde_json::from_str(r#"{"x":[0.0,4.0],"y":[1.0,2.0]}"#).unwrap();
        assert_eq!(extent.width(), 4.0);
        assert!(serde_json::from_str::<Extent>(r#"{"x":[4.0,0.0],"y":[1.0,2.0]}"#).is_err());
    }
}
