use serde::{Deserialize, Serialize};

use crate::common::Rgb;

/// One demographic category: its code in the dataset, display color and legend label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorKeyEntry {
    pub code: String,
    pub color: Rgb,
    pub label: String,
}

/// Ordered category → color/label mapping shared by the shaded raster and the legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorKey {
    entries: Vec<ColorKeyEntry>,
}

impl Default for ColorKey {
    /// Race categories of the census dot map.
    fn default() -> Self {
        let entry = |code: &str, color: Rgb, label: &str| ColorKeyEntry { code: code.into(), color, label: label.into() };
        Self::new(vec![
            entry("w", Rgb::new(0, 0, 255), "White"),       // blue
            entry("b", Rgb::new(0, 128, 0), "Black"),       // green
            entry("a", Rgb::new(255, 0, 0), "Asian"),       // red
            entry("h", Rgb::new(255, 165, 0), "Hispanic"),  // orange
            entry("o", Rgb::new(139, 69, 19), "Other"),     // saddlebrown
        ])
    }
}

impl ColorKey {
    pub fn new(entries: Vec<ColorKeyEntry>) -> Self { Self { entries } }

    #[inline] pub fn entries(&self) -> &[ColorKeyEntry] { &self.entries }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Position of a category code, used as the compact per-point category.
    #[inline]
    pub fn index_of(&self, code: &str) -> Option<u8> {
        self.entries.iter().position(|e| e.code == code).map(|i| i as u8)
    }

    #[inline]
    pub fn color(&self, index: u8) -> Option<Rgb> {
        self.entries.get(index as usize).map(|e| e.color)
    }
}
