use crate::{config::TileOptions, geom::Extent};

/// Half the Web Mercator world width in meters.
const ORIGIN_SHIFT: f64 = 20_037_508.342_789_244;

/// One map tile and the map-unit square it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlacement {
    pub z: u8,
    pub x: u32,
    pub y: u32,
    pub url: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

/// WMTS imagery layer; resolves the tiles covering an extent.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    options: TileOptions,
}

impl TileLayer {
    pub fn new(options: TileOptions) -> Self { Self { options } }

    #[inline] pub fn alpha(&self) -> f64 { self.options.alpha }

    /// Lowest zoom whose tiles are at least as detailed as `width_px` pixels across `extent`.
    pub fn zoom_for(&self, extent: &Extent, width_px: f64) -> u8 {
        let meters_per_px = extent.width() / width_px.max(1.0);
        let world_px_needed = 2.0 * ORIGIN_SHIFT / meters_per_px;
        let zoom = (world_px_needed / self.options.tile_size as f64).log2().ceil();
        zoom.clamp(0.0, self.options.max_zoom as f64) as u8
    }

    /// Tiles covering `extent` at the zoom appropriate for `width_px`, row by row.
    pub fn tiles(&self, extent: &Extent, width_px: f64) -> Vec<TilePlacement> {
        let z = self.zoom_for(extent, width_px);
        let n = 1u32 << z;
        let tile_m = 2.0 * ORIGIN_SHIFT / n as f64;

        let column = |x: f64| (((x + ORIGIN_SHIFT) / tile_m).floor().max(0.0) as u32).min(n - 1);
        let row = |y: f64| (((ORIGIN_SHIFT - y) / tile_m).floor().max(0.0) as u32).min(n - 1);

        let (x_min, x_max) = extent.x_range();
        let (y_min, y_max) = extent.y_range();

        let mut tiles = Vec::new();
        for ty in row(y_max)..=row(y_min) {
            for tx in column(x_min)..=column(x_max) {
                let left = tx as f64 * tile_m - ORIGIN_SHIFT;
                let top = ORIGIN_SHIFT - ty as f64 * tile_m;
                tiles.push(TilePlacement {
                    z,
                    x: tx,
                    y: ty,
                    url: self.tile_url(z, tx, ty),
                    x_range: (left, left + tile_m),
                    y_range: (top - tile_m, top),
                });
            }
        }
        tiles
    }

    fn tile_url(&self, z: u8, x: u32, y: u32) -> String {
        self.options.url
            .replace("{Z}", &z.to_string())
            .replace("{X}", &x.to_string())
            .replace("{Y}", &y.to_string())
    }
}
