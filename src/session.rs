use std::{path::PathBuf, sync::Arc};

use geo::Coord;
use tracing::{debug, info};

use crate::{
    census::{CensusPoints, ColorKey},
    config::AppConfig,
    district::{DistrictGeometryLoader, DistrictRef, DistrictType, ShapefileLoader},
    error::{Error, Result},
    explorer::{BackgroundLoads, DistrictExplorer},
    geocode::{GeocodingClient, HttpClient, LatLon, ReqwestClient},
    view::{CompositeView, Layer, LegendOverlay, ShadedLayer, TileLayer, ViewRenderer},
};

/// One user action on the interactive view.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// District-type selector changed.
    SelectType(DistrictType),
    /// Address submitted: find its district of the current type and zoom to it.
    SubmitAddress(String),
    /// Zoom to a district by number, optionally state-qualified (`10`, `TX-10`).
    FocusDistrict(String),
    /// Back to the extent of the whole district type.
    Reset,
    /// Redraw the current view without changing it.
    Render,
}

/// What a command did, for display.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The view changed and was redrawn.
    Updated,
    /// The command was a no-op (e.g. the type was already selected).
    Unchanged,
    /// An address was resolved and its district focused.
    Located { district: DistrictRef, location: LatLon, display: Coord<f64> },
    Rendered(PathBuf),
}

/// The interactive surface: explorer, geocoder and renderer wired to one output file.
///
/// Every command either succeeds or leaves the view as it was; errors are returned for
/// the caller to show, and the session stays usable.
///
/// Type switches may also run in the background (`request_type`). Commands handled while
/// one is still loading wait for it, so they act on the type that was asked for last.
pub struct Session {
    explorer: DistrictExplorer,
    loads: BackgroundLoads,
    geocoder: GeocodingClient,
    api_key: Option<String>,
    renderer: ViewRenderer,
}

impl Session {
    /// Open a session over the files named by `config`, rendering into `output`.
    pub fn open(config: &AppConfig, output: impl Into<PathBuf>) -> Result<Self> {
        let color_key = Arc::new(config.color_key.clone());
        let points = Arc::new(CensusPoints::read(&config.census_path, &color_key)?);
        let loader = Arc::new(ShapefileLoader::new(&config.data_dir));
        let http = Arc::new(ReqwestClient::new(config.geocode.timeout_secs)?);
        Self::new(config, loader, points, http, output)
    }

    /// Wire a session from explicit collaborators.
    pub fn new(
        config: &AppConfig,
        loader: Arc<dyn DistrictGeometryLoader>,
        points: Arc<CensusPoints>,
        http: Arc<dyn HttpClient>,
        output: impl Into<PathBuf>,
    ) -> Result<Self> {
        let renderer = ViewRenderer::new(
            static_layers(config, points, Arc::new(config.color_key.clone()))?,
            config.districts.clone(),
            output,
            config.shade.width,
            config.shade.height,
        );

        let mut explorer = DistrictExplorer::new(loader, config.extent_policy(), config.initial_district_type())?;
        explorer.subscribe(renderer.clone().into_subscriber());
        let loads = BackgroundLoads::new(&explorer);

        let geocoder = GeocodingClient::new(http, &config.geocode.geocode_url, &config.geocode.civic_url)?;
        info!(output = %renderer.output().display(), "session opened");

        Ok(Self { explorer, loads, geocoder, api_key: config.geocode.api_key.clone(), renderer })
    }

    #[inline] pub fn explorer(&self) -> &DistrictExplorer { &self.explorer }

    #[inline] pub fn renderer(&self) -> &ViewRenderer { &self.renderer }

    /// Start loading `district_type` off-thread; the newest request wins.
    pub fn request_type(&mut self, district_type: DistrictType) -> u64 {
        self.loads.request(&self.explorer, district_type)
    }

    /// True while a background type switch has not been applied yet.
    #[inline] pub fn is_loading(&self) -> bool { self.loads.is_pending() }

    /// Apply a finished background load, if any. Returns `Ok(true)` if the view changed.
    pub fn poll(&mut self) -> Result<bool> {
        self.loads.apply_ready(&mut self.explorer)
    }

    /// Block until the pending background load lands.
    pub fn finish_loading(&mut self) -> Result<bool> {
        self.loads.wait(&mut self.explorer)
    }

    pub fn handle(&mut self, command: Command) -> Result<Outcome> {
        debug!(?command, "handling command");
        if self.loads.is_pending() {
            debug!(?command, "waiting for pending type switch");
            if let Err(e) = self.loads.wait(&mut self.explorer) {
                debug!(error = %e, "pending type switch failed; command runs against the current view");
            }
        }
        match command {
            Command::SelectType(district_type) => {
                Ok(changed(self.explorer.select_district_type(district_type)?))
            }
            Command::SubmitAddress(address) => self.submit_address(&address),
            Command::FocusDistrict(id) => {
                let wanted: DistrictRef = id.parse()?;
                let before = self.explorer.state().clone();
                self.explorer.focus_district(&wanted)?;
                Ok(changed(*self.explorer.state() != before))
            }
            Command::Reset => {
                let before = self.explorer.state().clone();
                self.explorer.reset_extent()?;
                Ok(changed(*self.explorer.state() != before))
            }
            Command::Render => {
                self.renderer.render(&self.explorer.snapshot())?;
                Ok(Outcome::Rendered(self.renderer.output().to_path_buf()))
            }
        }
    }

    fn submit_address(&mut self, address: &str) -> Result<Outcome> {
        let address = address.trim();
        let api_key = self.api_key.as_deref()
            .ok_or_else(|| Error::Config("an API key is required for address lookup".into()))?;

        let district_type = self.explorer.district_type();
        let district = self.geocoder.resolve_district(address, district_type, api_key)?;
        let location = self.geocoder.resolve_coordinates(address, api_key)?;
        let display = location.to_display()?;

        self.explorer.focus_district(&district)?;
        info!(%district_type, %district, "address located");
        Ok(Outcome::Located { district, location, display })
    }
}

fn changed(changed: bool) -> Outcome {
    if changed { Outcome::Updated } else { Outcome::Unchanged }
}

/// Tiles, shaded census points and legend; the district layer is added per update.
fn static_layers(config: &AppConfig, points: Arc<CensusPoints>, color_key: Arc<ColorKey>) -> Result<CompositeView> {
    CompositeView::compose([
        Layer::Tiles(TileLayer::new(config.tiles.clone())),
        Layer::Shaded(ShadedLayer::new(points, Arc::clone(&color_key), config.shade.clone())),
        Layer::Legend(LegendOverlay::new(color_key)),
    ])
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("explorer", &self.explorer)
            .field("loading", &self.loads.is_pending())
            .field("output", &self.renderer.output())
            .finish_non_exhaustive()
    }
}
