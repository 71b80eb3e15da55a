use std::sync::Arc;

use crate::{census::{CensusPoints, ColorKey}, common::Rgb, config::ShadeOptions, geom::Extent};

/// Per-bin, per-category point counts over an extent (row 0 is the top edge).
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCounts {
    cols: usize,
    rows: usize,
    categories: usize,
    counts: Vec<u32>,
}

impl CategoryCounts {
    #[inline] pub fn cols(&self) -> usize { self.cols }

    #[inline] pub fn rows(&self) -> usize { self.rows }

    /// Counts of each category in one bin.
    #[inline]
    pub fn bin(&self, col: usize, row: usize) -> &[u32] {
        let start = (row * self.cols + col) * self.categories;
        &self.counts[start..start + self.categories]
    }

    #[inline]
    pub fn total(&self, col: usize, row: usize) -> u32 { self.bin(col, row).iter().sum() }
}

/// One shaded bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    pub color: Rgb,
    pub alpha: u8,
}

/// Shaded image of the census points, covering `extent` with `cols × rows` bins.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadedRaster {
    extent: Extent,
    cols: usize,
    rows: usize,
    pixels: Vec<Option<Pixel>>,
}

impl ShadedRaster {
    #[inline] pub fn extent(&self) -> &Extent { &self.extent }

    #[inline] pub fn cols(&self) -> usize { self.cols }

    #[inline] pub fn rows(&self) -> usize { self.rows }

    #[inline]
    pub fn pixel(&self, col: usize, row: usize) -> Option<Pixel> { self.pixels[row * self.cols + col] }

    /// Size of one bin in map units.
    #[inline]
    pub fn cell_size(&self) -> (f64, f64) {
        (self.extent.width() / self.cols as f64, self.extent.height() / self.rows as f64)
    }
}

/// Census points aggregated by category and shaded for the current extent.
#[derive(Debug, Clone)]
pub struct ShadedLayer {
    points: Arc<CensusPoints>,
    color_key: Arc<ColorKey>,
    options: ShadeOptions,
}

impl ShadedLayer {
    pub fn new(points: Arc<CensusPoints>, color_key: Arc<ColorKey>, options: ShadeOptions) -> Self {
        Self { points, color_key, options }
    }

    /// Grid dimensions: the output size, coarsened so bins are no smaller than the sampling.
    pub fn grid_size(&self, extent: &Extent) -> (usize, usize) {
        let by_sampling = |span: f64, sampling: f64| (span / sampling).floor().max(1.0) as usize;
        let cols = (self.options.width.max(1) as usize).min(by_sampling(extent.width(), self.options.x_sampling));
        let rows = (self.options.height.max(1) as usize).min(by_sampling(extent.height(), self.options.y_sampling));
        (cols, rows)
    }

    /// Count points per bin and category; points outside `extent` are ignored.
    pub fn aggregate(&self, extent: &Extent) -> CategoryCounts {
        let (cols, rows) = self.grid_size(extent);
        let categories = self.color_key.len();
        let mut counts = vec![0u32; cols * rows * categories];

        let (x_min, x_max) = extent.x_range();
        let (y_min, y_max) = extent.y_range();
        let (cell_w, cell_h) = (extent.width() / cols as f64, extent.height() / rows as f64);

        for (x, y, category) in self.points.iter() {
            let category = category as usize;
            if x < x_min || x > x_max || y < y_min || y > y_max || category >= categories {
                continue;
            }
            // Points on the max edge fall into the last bin.
            let col = (((x - x_min) / cell_w) as usize).min(cols - 1);
            let row = (((y_max - y) / cell_h) as usize).min(rows - 1);
            counts[(row * cols + col) * categories + category] += 1;
        }

        CategoryCounts { cols, rows, categories, counts }
    }

    /// Aggregate then color: each bin mixes its category colors by count, with alpha rising
    /// logarithmically from `min_alpha` to opaque at the densest bin.
    pub fn shade(&self, extent: &Extent) -> ShadedRaster {
        let counts = self.aggregate(extent);
        let (cols, rows) = (counts.cols(), counts.rows());

        let max_total = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (col, row)))
            .map(|(col, row)| counts.total(col, row))
            .max()
            .unwrap_or(0);
        let min_alpha = self.options.min_alpha as f64;
        let denom = (1.0 + max_total as f64).ln();

        let mut pixels = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let bin = counts.bin(col, row);
                let total: u32 = bin.iter().sum();
                if total == 0 {
                    pixels.push(None);
                    continue;
                }
                let color = Rgb::mix(bin.iter().enumerate()
                    .filter_map(|(i, &n)| self.color_key.color(i as u8).map(|c| (c, n as f64))));
                let t = if denom > 0.0 { (1.0 + total as f64).ln() / denom } else { 1.0 };
                let alpha = (min_alpha + (255.0 - min_alpha) * t).round().clamp(0.0, 255.0) as u8;
                pixels.push(color.map(|color| Pixel { color, alpha }));
            }
        }

        ShadedRaster { extent: *extent, cols, rows, pixels }
    }
}
