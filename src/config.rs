use std::{fs, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

use crate::{
    census::ColorKey,
    common::Rgb,
    district::DistrictType,
    error::{Error, Result},
    geocode::{DEFAULT_CIVIC_URL, DEFAULT_GEOCODE_URL},
    geom::{Extent, ViewExtentPolicy, CONTINENTAL_US},
};

/// Satellite imagery underlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileOptions {
    /// WMTS URL template with `{Z}`, `{X}` and `{Y}` placeholders.
    pub url: String,
    pub alpha: f64,
    pub tile_size: u32,
    pub max_zoom: u8,
}

impl Default for TileOptions {
    fn default() -> Self {
        Self {
            url: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{Z}/{Y}/{X}.jpg".into(),
            alpha: 0.5,
            tile_size: 256,
            max_zoom: 19,
        }
    }
}

/// Aggregation and shading of the census points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadeOptions {
    /// Output size in pixels; also the finest aggregation grid.
    pub width: u32,
    pub height: u32,
    /// Smallest bin size in map units.
    pub x_sampling: f64,
    pub y_sampling: f64,
    /// Alpha of the least populated non-empty bin.
    pub min_alpha: u8,
}

impl Default for ShadeOptions {
    fn default() -> Self {
        Self { width: 1200, height: 682, x_sampling: 10.0, y_sampling: 10.0, min_alpha: 40 }
    }
}

/// District outline styling. Polygons are never filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistrictStyle {
    pub line_width: f64,
    pub line_color: Rgb,
    pub focus_color: Rgb,
}

impl Default for DistrictStyle {
    fn default() -> Self {
        Self { line_width: 1.5, line_color: Rgb::new(0, 0, 0), focus_color: Rgb::new(255, 255, 0) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeOptions {
    pub geocode_url: String,
    pub civic_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeocodeOptions {
    fn default() -> Self {
        Self {
            geocode_url: DEFAULT_GEOCODE_URL.into(),
            civic_url: DEFAULT_CIVIC_URL.into(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Process-wide settings, built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of `<name>/<name>.shp` district shapefiles.
    pub data_dir: PathBuf,
    pub census_path: PathBuf,
    pub initial_district_type: DistrictTypeKey,
    pub default_extent: Extent,
    /// District types shown at `default_extent` instead of fitting their geometry.
    pub nationwide: Vec<DistrictTypeKey>,
    /// Fraction of the fitted extent added on each side.
    pub extent_padding: f64,
    pub tiles: TileOptions,
    pub shade: ShadeOptions,
    pub districts: DistrictStyle,
    pub color_key: ColorKey,
    pub geocode: GeocodeOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            census_path: PathBuf::from("data/census.snappy.parq"),
            initial_district_type: DistrictTypeKey(DistrictType::UsHouse),
            default_extent: CONTINENTAL_US,
            nationwide: vec![DistrictTypeKey(DistrictType::UsHouse)],
            extent_padding: 0.0,
            tiles: TileOptions::default(),
            shade: ShadeOptions::default(),
            districts: DistrictStyle::default(),
            color_key: ColorKey::default(),
            geocode: GeocodeOptions::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; absent fields keep their defaults.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shade.width == 0 || self.shade.height == 0 {
            return Err(Error::Config("shade width and height must be positive".into()));
        }
        if !(self.shade.x_sampling > 0.0 && self.shade.y_sampling > 0.0) {
            return Err(Error::Config("shade sampling must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.tiles.alpha) {
            return Err(Error::Config(format!("tile alpha {} outside [0, 1]", self.tiles.alpha)));
        }
        if self.tiles.tile_size == 0 {
            return Err(Error::Config("tile size must be positive".into()));
        }
        if self.color_key.is_empty() || self.color_key.len() > u8::MAX as usize {
            return Err(Error::Config("color key must have between 1 and 255 entries".into()));
        }
        if !(self.extent_padding >= 0.0) {
            return Err(Error::Config("extent padding must be non-negative".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn initial_district_type(&self) -> DistrictType { self.initial_district_type.0 }

    pub fn extent_policy(&self) -> ViewExtentPolicy {
        ViewExtentPolicy::new(
            self.default_extent,
            self.nationwide.iter().map(|k| k.0).collect(),
            self.extent_padding,
        )
    }
}

/// Serde adapter for `DistrictType` using its stable string key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DistrictTypeKey(pub DistrictType);

impl TryFrom<String> for DistrictTypeKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> { s.parse().map(DistrictTypeKey) }
}

impl From<DistrictTypeKey> for String {
    fn from(key: DistrictTypeKey) -> Self { key.0.to_str().to_string() }
}
