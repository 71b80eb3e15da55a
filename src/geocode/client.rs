use std::sync::Arc;

use geo::Coord;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{
    district::{DistrictRef, DistrictType, DivisionPatterns},
    error::{Error, Result},
    geom::{Projector, SourceCrs},
    geocode::HttpClient,
};

pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_CIVIC_URL: &str = "https://www.googleapis.com/civicinfo/v2/representatives";

/// A geocoded location in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    /// Position of this location in display (Web Mercator) coordinates.
    pub fn to_display(&self) -> Result<Coord<f64>> {
        Projector::new(SourceCrs::Geographic)?.project(Coord { x: self.lon, y: self.lat })
    }
}

#[derive(Deserialize)]
struct GeocodeResponse {
    results: Option<Vec<GeocodeResult>>,
    status: Option<String>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Option<GeocodeGeometry>,
}

#[derive(Deserialize)]
struct GeocodeGeometry {
    location: Option<GeocodeLocation>,
}

#[derive(Deserialize)]
struct GeocodeLocation {
    lat: Option<f64>,
    lng: Option<f64>,
}

#[derive(Deserialize)]
struct CivicResponse {
    divisions: Option<Map<String, Value>>,
}

/// Address lookups against the geocoding and civic-information web APIs.
///
/// One GET per call, no retries: transport failures surface to the caller as-is.
#[derive(Clone)]
pub struct GeocodingClient {
    http: Arc<dyn HttpClient>,
    geocode_url: String,
    civic_url: String,
    patterns: DivisionPatterns,
}

impl GeocodingClient {
    pub fn new(http: Arc<dyn HttpClient>, geocode_url: impl Into<String>, civic_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http,
            geocode_url: geocode_url.into(),
            civic_url: civic_url.into(),
            patterns: DivisionPatterns::new()?,
        })
    }

    /// Client pointed at the public Google endpoints.
    pub fn with_defaults(http: Arc<dyn HttpClient>) -> Result<Self> {
        Self::new(http, DEFAULT_GEOCODE_URL, DEFAULT_CIVIC_URL)
    }

    fn request_url(base: &str, address: &str, api_key: &str) -> Result<Url> {
        Url::parse_with_params(base, &[("address", address), ("key", api_key)])
            .map_err(|e| Error::Config(format!("invalid endpoint {base:?}: {e}")))
    }

    /// Location of the first geocoding result for `address`.
    pub fn resolve_coordinates(&self, address: &str, api_key: &str) -> Result<LatLon> {
        const ENDPOINT: &str = "geocode";
        let malformed = |reason: &str| Error::MalformedResponse { endpoint: ENDPOINT, reason: reason.to_string() };

        let url = Self::request_url(&self.geocode_url, address, api_key)?;
        let body = self.http.get(url.as_str())?;
        let response: GeocodeResponse = serde_json::from_slice(&body)
            .map_err(|e| malformed(&e.to_string()))?;

        let results = response.results
            .ok_or_else(|| malformed(&format!("missing `results` (status {:?})", response.status)))?;
        let first = results.into_iter().next()
            .ok_or_else(|| Error::NotFound { address: address.to_string() })?;

        let location = first.geometry
            .and_then(|g| g.location)
            .ok_or_else(|| malformed("missing `geometry.location`"))?;
        match (location.lat, location.lng) {
            (Some(lat), Some(lon)) => {
                debug!(lat, lon, "geocoded address");
                Ok(LatLon { lat, lon })
            }
            _ => Err(malformed("missing `lat`/`lng`")),
        }
    }

    /// District of `address` for `district_type`, qualified by the state named in the
    /// civic API's division id.
    pub fn resolve_district(&self, address: &str, district_type: DistrictType, api_key: &str) -> Result<DistrictRef> {
        let url = Self::request_url(&self.civic_url, address, api_key)?;
        let body = self.http.get(url.as_str())?;
        let district = self.district_from_response(&body, district_type)
            .map_err(|e| match e {
                Error::NoMatch { district_type, .. } => Error::NoMatch { district_type, address: address.to_string() },
                e => e,
            })?;
        info!(%district_type, %district, "resolved district for address");
        Ok(district)
    }

    /// District number alone, as printed in the division id.
    pub fn resolve_district_id(&self, address: &str, district_type: DistrictType, api_key: &str) -> Result<String> {
        self.resolve_district(address, district_type, api_key).map(|district| district.number().to_string())
    }

    /// Scan the division ids in response order. When several match, the last one wins.
    fn district_from_response(&self, body: &[u8], district_type: DistrictType) -> Result<DistrictRef> {
        let malformed = |reason: String| Error::MalformedResponse { endpoint: "civicinfo", reason };

        let response: CivicResponse = serde_json::from_slice(body).map_err(|e| malformed(e.to_string()))?;
        let divisions = response.divisions.ok_or_else(|| malformed("missing `divisions`".into()))?;

        divisions.keys()
            .filter_map(|key| self.patterns.extract_ref(district_type, key))
            .last()
            .ok_or_else(|| Error::NoMatch { district_type, address: String::new() })
    }
}
