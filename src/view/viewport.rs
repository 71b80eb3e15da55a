use geo::Coord;

use crate::geom::Extent;

/// Pixel frame for an extent: the extent is widened on one axis so map units stay square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    extent: Extent,
    width: f64,
    height: f64,
    scale: f64, // pixels per map unit
}

impl Viewport {
    pub fn fit(extent: &Extent, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1) as f64, height.max(1) as f64);
        let scale = (width / extent.width()).min(height / extent.height());

        let (cx, cy) = (
            (extent.x_range().0 + extent.x_range().1) / 2.0,
            (extent.y_range().0 + extent.y_range().1) / 2.0,
        );
        let (half_w, half_h) = (width / scale / 2.0, height / scale / 2.0);
        // Widening a valid extent keeps it valid.
        let fitted = Extent::new((cx - half_w, cx + half_w), (cy - half_h, cy + half_h)).unwrap_or(*extent);

        Self { extent: fitted, width, height, scale }
    }

    #[inline] pub fn extent(&self) -> &Extent { &self.extent }

    #[inline] pub fn width(&self) -> f64 { self.width }

    #[inline] pub fn height(&self) -> f64 { self.height }

    #[inline] pub fn scale(&self) -> f64 { self.scale }

    /// Map coords -> SVG coords (Y down).
    #[inline]
    pub fn project(&self, coord: &Coord<f64>) -> (f64, f64) {
        let x = (coord.x - self.extent.x_range().0) * self.scale;
        let y = (self.extent.y_range().1 - coord.y) * self.scale; // invert vertically
        (x, y)
    }
}
