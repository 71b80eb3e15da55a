mod compose;
mod layer;
mod renderer;
mod shade;
mod tiles;
mod viewport;

pub use compose::CompositeView;
pub use layer::{DistrictLayer, Layer, LayerKind, LegendOverlay};
pub use renderer::ViewRenderer;
pub use shade::{CategoryCounts, Pixel, ShadedLayer, ShadedRaster};
pub use tiles::{TileLayer, TilePlacement};
pub use viewport::Viewport;
