mod client;
mod http;

pub use client::{GeocodingClient, LatLon, DEFAULT_CIVIC_URL, DEFAULT_GEOCODE_URL};
pub use http::{HttpClient, ReqwestClient};
