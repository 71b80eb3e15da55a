use std::{fmt, str::FromStr};

use regex::Regex;

use crate::{
    district::{state_fips, DistrictRef},
    error::{Error, Result},
};

/// Kind of electoral district shown on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DistrictType {
    UsHouse,        // Congressional districts, nationwide
    StateHouse,     // State legislature, lower chamber
    StateSenate,    // State legislature, upper chamber
    County,         // County council districts
    CityCouncil,    // City council districts
}

impl DistrictType {
    pub fn to_str(&self) -> &'static str {
        match self {
            DistrictType::UsHouse => "us_house",
            DistrictType::StateHouse => "state_house",
            DistrictType::StateSenate => "state_senate",
            DistrictType::County => "county",
            DistrictType::CityCouncil => "city_council",
        }
    }

    pub fn order() -> [DistrictType; 5] {
        [
            DistrictType::UsHouse,
            DistrictType::StateHouse,
            DistrictType::StateSenate,
            DistrictType::County,
            DistrictType::CityCouncil,
        ]
    }

    /// Base name of the cartographic boundary shapefile for this district type, if one ships.
    pub fn shapefile_name(&self) -> Option<&'static str> {
        match self {
            DistrictType::UsHouse => Some("cb_2015_us_cd114_5m"),
            DistrictType::StateHouse => Some("cb_2016_48_sldl_500k"),
            DistrictType::StateSenate => Some("cb_2016_48_sldu_500k"),
            DistrictType::County | DistrictType::CityCouncil => None,
        }
    }

    /// Attribute column holding the district number in the shapefile's `.dbf`.
    pub fn id_field(&self) -> Option<&'static str> {
        match self {
            DistrictType::UsHouse => Some("CD114FP"),
            DistrictType::StateHouse => Some("SLDLST"),
            DistrictType::StateSenate => Some("SLDUST"),
            DistrictType::County | DistrictType::CityCouncil => None,
        }
    }

    /// OCD division-id pattern; captures `state` (postal abbreviation) and `number`.
    fn division_pattern(&self) -> &'static str {
        match self {
            DistrictType::UsHouse => r"^ocd-division/country:us/state:(?P<state>[a-z]{2})/cd:(?P<number>[0-9]+)",
            DistrictType::StateHouse => r"^ocd-division/country:us/state:(?P<state>[a-z]{2})/sldl:(?P<number>[0-9]+)",
            DistrictType::StateSenate => r"^ocd-division/country:us/state:(?P<state>[a-z]{2})/sldu:(?P<number>[0-9]+)",
            DistrictType::County => {
                r"^ocd-division/country:us/state:(?P<state>[a-z]{2})/county:[^/]+/council_district:(?P<number>[0-9]+)"
            }
            DistrictType::CityCouncil => {
                r"^ocd-division/country:us/state:(?P<state>[a-z]{2})/place:[^/]+/council_district:(?P<number>[0-9]+)"
            }
        }
    }
}

impl fmt::Display for DistrictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for DistrictType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DistrictType::order().into_iter()
            .find(|ty| ty.to_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownDistrictType(s.to_string()))
    }
}

/// Compiled division-id patterns, one per district type.
#[derive(Debug, Clone)]
pub struct DivisionPatterns {
    patterns: Vec<(DistrictType, Regex)>,
}

impl DivisionPatterns {
    pub fn new() -> Result<Self> {
        let patterns = DistrictType::order().into_iter()
            .map(|ty| Regex::new(ty.division_pattern())
                .map(|re| (ty, re))
                .map_err(|e| Error::Config(format!("bad division pattern for {ty}: {e}"))))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    #[inline]
    pub fn get(&self, ty: DistrictType) -> &Regex {
        // `new` compiles one pattern per variant, in declaration order.
        &self.patterns[ty as usize].1
    }

    /// Extract the district number from one division id, if it matches `ty`.
    pub fn extract<'a>(&self, ty: DistrictType, division: &'a str) -> Option<&'a str> {
        self.get(ty).captures(division)
            .and_then(|caps| caps.name("number"))
            .map(|m| m.as_str())
    }

    /// The state-qualified district named by one division id, if it matches `ty`.
    pub fn extract_ref(&self, ty: DistrictType, division: &str) -> Option<DistrictRef> {
        let caps = self.get(ty).captures(division)?;
        let district = DistrictRef::new(caps.name("number")?.as_str()).ok()?;
        match caps.name("state").and_then(|state| state_fips(state.as_str())) {
            Some(fips) => Some(district.in_state(fips)),
            None => Some(district),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_str() {
        for ty in DistrictType::order() {
            assert_eq!(ty.to_str().parse::<DistrictType>().unwrap(), ty);
        }
        assert_eq!("US_HOUSE".parse::<DistrictType>().unwrap(), DistrictType::UsHouse);
        assert!(matches!("school_board".parse::<DistrictType>(), Err(Error::UnknownDistrictType(_))));
    }

    #[test]
    fn only_legislative_types_have_shapefiles() {
        assert_eq!(DistrictType::UsHouse.shapefile_name(), Some("cb_2015_us_cd114_5m"));
        assert_eq!(DistrictType::StateHouse.shapefile_name(), Some("cb_2016_48_sldl_500k"));
        assert_eq!(DistrictType::StateSenate.shapefile_name(), Some("cb_2016_48_sldu_500k"));
        assert_eq!(DistrictType::County.shapefile_name(), None);
        assert_eq!(DistrictType::CityCouncil.shapefile_name(), None);
    }

    #[test]
    fn patterns_extract_district_numbers() {
        let patterns = DivisionPatterns::new().unwrap();

        assert_eq!(patterns.extract(DistrictType::UsHouse, "ocd-division/country:us/state:tx/cd:10"), Some("10"));
        assert_eq!(patterns.extract(DistrictType::StateHouse, "ocd-division/country:us/state:tx/sldl:47"), Some("47"));
        assert_eq!(patterns.extract(DistrictType::StateSenate, "ocd-division/country:us/state:tx/sldu:14"), Some("14"));
        assert_eq!(
            patterns.extract(DistrictType::County, "ocd-division/country:us/state:tx/county:travis/council_district:3"),
            Some("3"),
        );
        assert_eq!(
            patterns.extract(DistrictType::CityCouncil, "ocd-division/country:us/state:tx/place:austin/council_district:5"),
            Some("5"),
        );
    }

    #[test]
    fn patterns_reject_other_levels() {
        let patterns = DivisionPatterns::new().unwrap();

        assert_eq!(patterns.extract(DistrictType::UsHouse, "ocd-division/country:us/state:tx"), None);
        assert_eq!(patterns.extract(DistrictType::UsHouse, "ocd-division/country:us/state:tx/sldl:47"), None);
        assert_eq!(patterns.extract(DistrictType::StateHouse, "ocd-division/country:us/state:tx/cd:10"), None);
        // anchored: a prefix before the division id does not match
        assert_eq!(patterns.extract(DistrictType::UsHouse, "x/ocd-division/country:us/state:tx/cd:10"), None);
    }

    #[test]
    fn division_ids_keep_their_state() {
        let patterns = DivisionPatterns::new().unwrap();

        let tx = patterns.extract_ref(DistrictType::UsHouse, "ocd-division/country:us/state:tx/cd:10").unwrap();
        assert_eq!((tx.state(), tx.number()), (Some("48"), "10"));
        let ca = patterns.extract_ref(DistrictType::UsHouse, "ocd-division/country:us/state:ca/cd:10").unwrap();
        assert_eq!(ca.to_string(), "CA-10");
        // territories outside the state table still yield the bare number
        let gu = patterns.extract_ref(DistrictType::UsHouse, "ocd-division/country:us/state:gu/cd:1").unwrap();
        assert_eq!((gu.state(), gu.number()), (None, "1"));
    }
}
