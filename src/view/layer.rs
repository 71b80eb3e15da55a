use std::{fmt, io::Write, sync::Arc};

use crate::{
    census::ColorKey,
    common::{self, Rgb},
    config::DistrictStyle,
    district::DistrictGeometry,
    error::Result,
    view::{ShadedLayer, TileLayer, Viewport},
};

/// Layer kinds in back-to-front drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LayerKind {
    Tiles,
    Shaded,
    Legend,
    Districts,
}

impl LayerKind {
    pub fn to_str(&self) -> &'static str {
        match self {
            LayerKind::Tiles => "tiles",
            LayerKind::Shaded => "shaded",
            LayerKind::Legend => "legend",
            LayerKind::Districts => "districts",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.to_str()) }
}

/// Category swatches with labels, drawn in the top-left corner.
#[derive(Debug, Clone)]
pub struct LegendOverlay {
    color_key: Arc<ColorKey>,
}

impl LegendOverlay {
    pub fn new(color_key: Arc<ColorKey>) -> Self { Self { color_key } }
}

/// Outlines of the currently selected district type, optionally with one district highlighted.
#[derive(Debug, Clone)]
pub struct DistrictLayer {
    geometry: Arc<DistrictGeometry>,
    focus: Option<String>,
    style: DistrictStyle,
}

impl DistrictLayer {
    pub fn new(geometry: Arc<DistrictGeometry>, focus: Option<String>, style: DistrictStyle) -> Self {
        Self { geometry, focus, style }
    }

    #[inline] pub fn geometry(&self) -> &Arc<DistrictGeometry> { &self.geometry }

    #[inline] pub fn focus(&self) -> Option<&str> { self.focus.as_deref() }

    #[inline] pub fn style(&self) -> &DistrictStyle { &self.style }
}

/// One drawable layer of the composite view.
#[derive(Debug, Clone)]
pub enum Layer {
    Tiles(TileLayer),
    Shaded(ShadedLayer),
    Legend(LegendOverlay),
    Districts(DistrictLayer),
}

impl Layer {
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Tiles(_) => LayerKind::Tiles,
            Layer::Shaded(_) => LayerKind::Shaded,
            Layer::Legend(_) => LayerKind::Legend,
            Layer::Districts(_) => LayerKind::Districts,
        }
    }

    pub(crate) fn draw(&self, writer: &mut impl Write, viewport: &Viewport) -> Result<()> {
        match self {
            Layer::Tiles(tiles) => draw_tiles(writer, tiles, viewport),
            Layer::Shaded(shaded) => draw_shaded(writer, shaded, viewport),
            Layer::Legend(legend) => draw_legend(writer, legend),
            Layer::Districts(districts) => draw_districts(writer, districts, viewport),
        }
    }
}

fn draw_tiles(writer: &mut impl Write, layer: &TileLayer, viewport: &Viewport) -> Result<()> {
    writeln!(writer, r#"<g class="tiles" opacity="{}">"#, layer.alpha())?;
    for tile in layer.tiles(viewport.extent(), viewport.width()) {
        let (x0, y0) = viewport.project(&geo::Coord { x: tile.x_range.0, y: tile.y_range.1 });
        let (x1, y1) = viewport.project(&geo::Coord { x: tile.x_range.1, y: tile.y_range.0 });
        writeln!(
            writer,
            r#"<image href="{href}" x="{x0:.3}" y="{y0:.3}" width="{w:.3}" height="{h:.3}" preserveAspectRatio="none"/>"#,
            href = common::escape_xml(&tile.url),
            w = x1 - x0,
            h = y1 - y0,
        )?;
    }
    writeln!(writer, "</g>")?;
    Ok(())
}

/// Raster bins as rectangles; horizontal runs of identical pixels are merged.
fn draw_shaded(writer: &mut impl Write, layer: &ShadedLayer, viewport: &Viewport) -> Result<()> {
    let raster = layer.shade(viewport.extent());
    let (cell_w, cell_h) = raster.cell_size();
    let (px_w, px_h) = (cell_w * viewport.scale(), cell_h * viewport.scale());

    writeln!(writer, r#"<g class="shaded" shape-rendering="crispEdges">"#)?;
    for row in 0..raster.rows() {
        let mut col = 0;
        while col < raster.cols() {
            let Some(pixel) = raster.pixel(col, row) else { col += 1; continue };
            let start = col;
            while col < raster.cols() && raster.pixel(col, row) == Some(pixel) {
                col += 1;
            }
            writeln!(
                writer,
                r#"<rect x="{x:.3}" y="{y:.3}" width="{w:.3}" height="{h:.3}" fill="{fill}" fill-opacity="{a:.3}"/>"#,
                x = start as f64 * px_w,
                y = row as f64 * px_h,
                w = (col - start) as f64 * px_w,
                h = px_h,
                fill = pixel.color,
                a = pixel.alpha as f64 / 255.0,
            )?;
        }
    }
    writeln!(writer, "</g>")?;
    Ok(())
}

fn draw_legend(writer: &mut impl Write, legend: &LegendOverlay) -> Result<()> {
    const ROW: f64 = 18.0;
    let entries = legend.color_key.entries();

    writeln!(writer, r#"<g class="legend" transform="translate(10,10)">"#)?;
    writeln!(
        writer,
        r##"<rect width="110" height="{h}" fill="#000000" fill-opacity="0.5" rx="4"/>"##,
        h = entries.len() as f64 * ROW + 8.0,
    )?;
    for (i, entry) in entries.iter().enumerate() {
        let cy = 4.0 + ROW * (i as f64 + 0.5);
        writeln!(writer, r#"<circle cx="12" cy="{cy}" r="5" fill="{}"/>"#, entry.color)?;
        writeln!(writer, r#"<text x="24" y="{y}">{}</text>"#, common::escape_xml(&entry.label), y = cy + 4.0)?;
    }
    writeln!(writer, "</g>")?;
    Ok(())
}

fn draw_districts(writer: &mut impl Write, layer: &DistrictLayer, viewport: &Viewport) -> Result<()> {
    let project = |c: &geo::Coord<f64>| viewport.project(c);
    let focused = layer.focus().and_then(|key| layer.geometry.district(key));

    writeln!(writer, r#"<g class="districts" data-type="{}">"#, layer.geometry.district_type())?;
    for district in layer.geometry.districts() {
        if focused.is_some_and(|f| std::ptr::eq(f, district)) { continue }
        write_district(writer, "dist", district.key(), &common::rings_to_path(&district.rings, &project))?;
    }
    // Highlight goes last so it sits above its neighbours' shared edges.
    if let Some(district) = focused {
        write_district(writer, "focus", district.key(), &common::rings_to_path(&district.rings, &project))?;
    }
    writeln!(writer, "</g>")?;
    Ok(())
}

fn write_district(writer: &mut impl Write, class: &str, key: Option<String>, path: &str) -> Result<()> {
    if path.is_empty() { return Ok(()) }
    let id = key.as_deref().map(common::escape_xml).unwrap_or_default();
    writeln!(writer, r#"<path class="{class}" data-district="{id}" fill-rule="evenodd" d="{path}"/>"#)?;
    Ok(())
}

/// Stroke colors as CSS for the SVG style block.
pub(crate) fn style_colors(style: &DistrictStyle) -> (String, String) {
    (Rgb::to_string(&style.line_color), Rgb::to_string(&style.focus_color))
}
