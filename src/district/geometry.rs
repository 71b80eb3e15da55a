use geo::{Coord, LineString};

use crate::{
    district::{DistrictRef, DistrictType},
    error::{Error, Result},
};

/// One district's outline: its rings in shapefile order (exteriors followed by their holes).
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictShape {
    pub id: Option<String>,
    /// State FIPS code, when the shapefile carries one.
    pub state: Option<String>,
    pub rings: Vec<LineString<f64>>,
}

impl DistrictShape {
    pub fn new(id: Option<String>, rings: Vec<LineString<f64>>) -> Self {
        Self { id, state: None, rings }
    }

    pub fn with_state(mut self, state: Option<String>) -> Self {
        self.state = state;
        self
    }

    /// Name that identifies this shape within its geometry: `TX-10` or just `10`.
    pub fn key(&self) -> Option<String> {
        DistrictRef::of(self).map(|r| r.to_string())
    }

    /// Iterate every coordinate of every ring.
    #[inline]
    pub fn coords(&self) -> impl Iterator<Item = &Coord<f64>> {
        self.rings.iter().flat_map(|ring| ring.0.iter())
    }
}

/// Projected district outlines for one district type.
///
/// Produced whole by a loader and replaced whole on every reload; never patched in place.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictGeometry {
    district_type: DistrictType,
    districts: Vec<DistrictShape>,
}

impl DistrictGeometry {
    pub fn new(district_type: DistrictType, districts: Vec<DistrictShape>) -> Self {
        Self { district_type, districts }
    }

    #[inline] pub fn district_type(&self) -> DistrictType { self.district_type }

    #[inline] pub fn districts(&self) -> &[DistrictShape] { &self.districts }

    #[inline] pub fn len(&self) -> usize { self.districts.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.districts.is_empty() }

    /// All rings of all districts, flattened in load order.
    #[inline]
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.districts.iter().flat_map(|district| district.rings.iter())
    }

    /// All coordinates across all rings.
    #[inline]
    pub fn coords(&self) -> impl Iterator<Item = &Coord<f64>> {
        self.districts.iter().flat_map(|district| district.coords())
    }

    /// The single district named by `wanted`. Leading zeros are ignored, so "7" finds "07".
    ///
    /// A bare number that exists in several states is ambiguous rather than resolved
    /// to whichever comes first.
    pub fn locate(&self, wanted: &DistrictRef) -> Result<&DistrictShape> {
        let mut found = self.districts.iter().filter(|district| wanted.matches(district));
        let first = found.next().ok_or_else(|| Error::DistrictNotFound {
            district_type: self.district_type,
            id: wanted.to_string(),
        })?;
        let others = found.count();
        if others > 0 {
            return Err(Error::AmbiguousDistrict {
                district_type: self.district_type,
                id: wanted.to_string(),
                count: others + 1,
            });
        }
        Ok(first)
    }

    /// Like `locate`, from text such as "07" or "TX-10".
    pub fn district(&self, id: &str) -> Option<&DistrictShape> {
        self.locate(&id.parse().ok()?).ok()
    }
}
