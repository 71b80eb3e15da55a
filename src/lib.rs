#![doc = "Districtscope public API"]
mod census;
mod common;
mod config;
mod district;
mod error;
mod explorer;
mod geocode;
mod geom;
mod session;
mod view;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use config::{AppConfig, DistrictStyle, DistrictTypeKey, GeocodeOptions, ShadeOptions, TileOptions};

#[doc(inline)]
pub use common::Rgb;

#[doc(inline)]
pub use census::{CensusPoints, ColorKey, ColorKeyEntry};

#[doc(inline)]
pub use district::{
    state_abbr, state_fips, DistrictGeometry, DistrictGeometryLoader, DistrictRef, DistrictShape, DistrictType,
    DivisionPatterns, ShapefileLoader,
};

#[doc(inline)]
pub use geom::{Extent, Projector, SourceCrs, ViewExtentPolicy, CONTINENTAL_US};

#[doc(inline)]
pub use geocode::{GeocodingClient, HttpClient, LatLon, ReqwestClient, DEFAULT_CIVIC_URL, DEFAULT_GEOCODE_URL};

#[doc(inline)]
pub use view::{
    CategoryCounts, CompositeView, DistrictLayer, Layer, LayerKind, LegendOverlay, Pixel, ShadedLayer, ShadedRaster,
    TileLayer, TilePlacement, ViewRenderer, Viewport,
};

#[doc(inline)]
pub use explorer::{BackgroundLoads, DistrictExplorer, ExplorerState, StagedTransition, SubscriptionId, ViewUpdate};

#[doc(inline)]
pub use session::{Command, Outcome, Session};
