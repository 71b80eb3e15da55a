use std::io::Write;

use tracing::debug;

use crate::{
    common::SvgWriter,
    config::DistrictStyle,
    error::{Error, Result},
    geom::Extent,
    view::{layer::style_colors, DistrictLayer, Layer, LayerKind, Viewport},
};

/// Stack of map layers drawn back to front: tiles, shaded census raster, legend, districts.
///
/// Holds no state of its own beyond the layers; the district layer is swapped whenever the
/// explorer publishes a new selection.
#[derive(Debug, Clone, Default)]
pub struct CompositeView {
    layers: Vec<Layer>, // Sorted by LayerKind
}

impl CompositeView {
    /// Stack layers in the fixed drawing order, whatever order they are given in.
    /// Each kind may appear at most once; missing kinds are simply not drawn.
    pub fn compose(layers: impl IntoIterator<Item = Layer>) -> Result<Self> {
        let mut layers: Vec<Layer> = layers.into_iter().collect();
        layers.sort_by_key(Layer::kind);
        if let Some(pair) = layers.windows(2).find(|w| w[0].kind() == w[1].kind()) {
            return Err(Error::DuplicateLayer(pair[0].kind().to_str()));
        }
        Ok(Self { layers })
    }

    /// Layer kinds in drawing order.
    pub fn kinds(&self) -> Vec<LayerKind> {
        self.layers.iter().map(Layer::kind).collect()
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind() == kind)
    }

    /// Copy of this view with the district layer replaced (or added).
    pub fn with_districts(&self, districts: DistrictLayer) -> Self {
        let mut layers: Vec<Layer> = self.layers.iter()
            .filter(|l| l.kind() != LayerKind::Districts)
            .cloned()
            .collect();
        layers.push(Layer::Districts(districts));
        layers.sort_by_key(Layer::kind);
        Self { layers }
    }

    /// Render every layer into one SVG document of `width × height` pixels showing `extent`.
    pub fn render_svg<W: Write>(&self, writer: W, extent: &Extent, width: u32, height: u32) -> Result<W> {
        let viewport = Viewport::fit(extent, width, height);
        let style = match self.layer(LayerKind::Districts) {
            Some(Layer::Districts(districts)) => districts.style().clone(),
            _ => DistrictStyle::default(),
        };
        let (line_color, focus_color) = style_colors(&style);

        let mut writer = SvgWriter::new(writer);
        writer.write_header(viewport.width(), viewport.height(), viewport.extent())?;
        writer.write_styles(style.line_width, &line_color, &focus_color)?;
        for layer in &self.layers {
            layer.draw(&mut writer, &viewport)?;
        }
        writer.write_footer()?;
        writer.flush()?;

        debug!(layers = ?self.kinds(), "rendered composite view");
        Ok(writer.into_inner())
    }
}
