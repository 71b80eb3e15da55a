use std::{fmt, str::FromStr};

use crate::{
    district::DistrictShape,
    error::{Error, Result},
};

/// Postal abbreviation and FIPS code for every state, DC and Puerto Rico.
const STATES: [(&str, &str); 52] = [
    ("AL", "01"), ("AK", "02"), ("AZ", "04"), ("AR", "05"), ("CA", "06"), ("CO", "08"), ("CT", "09"),
    ("DE", "10"), ("DC", "11"), ("FL", "12"), ("GA", "13"), ("HI", "15"), ("ID", "16"), ("IL", "17"),
    ("IN", "18"), ("IA", "19"), ("KS", "20"), ("KY", "21"), ("LA", "22"), ("ME", "23"), ("MD", "24"),
    ("MA", "25"), ("MI", "26"), ("MN", "27"), ("MS", "28"), ("MO", "29"), ("MT", "30"), ("NE", "31"),
    ("NV", "32"), ("NH", "33"), ("NJ", "34"), ("NM", "35"), ("NY", "36"), ("NC", "37"), ("ND", "38"),
    ("OH", "39"), ("OK", "40"), ("OR", "41"), ("PA", "42"), ("RI", "44"), ("SC", "45"), ("SD", "46"),
    ("TN", "47"), ("TX", "48"), ("UT", "49"), ("VT", "50"), ("VA", "51"), ("WA", "53"), ("WV", "54"),
    ("WI", "55"), ("WY", "56"), ("PR", "72"),
];

/// FIPS code for a postal abbreviation, case-insensitive.
pub fn state_fips(abbr: &str) -> Option<&'static str> {
    STATES.iter().find(|(a, _)| a.eq_ignore_ascii_case(abbr.trim())).map(|&(_, fips)| fips)
}

/// Postal abbreviation for a FIPS code.
pub fn state_abbr(fips: &str) -> Option<&'static str> {
    STATES.iter().find(|(_, f)| *f == fips.trim()).map(|&(abbr, _)| abbr)
}

/// District number with leading zeros dropped; all-zero ids keep a single "0".
fn normalize(number: &str) -> &str {
    let number = number.trim();
    match number.trim_start_matches('0') {
        "" if !number.is_empty() => "0",
        rest => rest,
    }
}

/// A district number, optionally qualified by the state it lies in.
///
/// District numbers repeat across states (every state has a congressional district 1),
/// so lookups in nationwide geometry need the state to be unambiguous. Written as
/// `TX-10`, `48-10` or plain `10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistrictRef {
    state: Option<String>,
    number: String,
}

impl DistrictRef {
    pub fn new(number: &str) -> Result<Self> {
        let number = number.trim();
        if number.is_empty() {
            return Err(Error::InvalidDistrict("empty district number".into()));
        }
        Ok(Self { state: None, number: number.to_string() })
    }

    /// Qualify by state FIPS code.
    pub fn in_state(mut self, fips: impl Into<String>) -> Self {
        self.state = Some(fips.into());
        self
    }

    /// The reference that names `shape`, if it has an id.
    pub fn of(shape: &DistrictShape) -> Option<Self> {
        let number = shape.id.as_deref().filter(|id| !id.trim().is_empty())?;
        Some(Self { state: shape.state.clone(), number: number.trim().to_string() })
    }

    #[inline] pub fn state(&self) -> Option<&str> { self.state.as_deref() }

    #[inline] pub fn number(&self) -> &str { &self.number }

    /// Same district number, and the same state when both sides know theirs.
    pub fn matches(&self, shape: &DistrictShape) -> bool {
        let Some(id) = shape.id.as_deref() else { return false };
        if id.trim().is_empty() || normalize(id) != normalize(&self.number) {
            return false;
        }
        match (self.state(), shape.state.as_deref()) {
            (Some(wanted), Some(state)) => wanted.trim() == state.trim(),
            _ => true,
        }
    }
}

impl fmt::Display for DistrictRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state() {
            Some(fips) => write!(f, "{}-{}", state_abbr(fips).unwrap_or(fips), self.number),
            None => f.write_str(&self.number),
        }
    }
}

impl FromStr for DistrictRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let Some((state, number)) = s.trim().split_once('-') else { return Self::new(s) };
        let state = state.trim();
        let fips = if state.len() <= 2 && !state.is_empty() && state.bytes().all(|b| b.is_ascii_digit()) {
            format!("{state:0>2}")
        } else {
            state_fips(state)
                .ok_or_else(|| Error::InvalidDistrict(format!("unknown state {state:?} in {s:?}")))?
                .to_string()
        };
        Ok(Self::new(number)?.in_state(fips))
    }
}
