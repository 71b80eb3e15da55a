//! Color parsing and blending for SVG output.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// CSS color keywords used by the default palette and styles.
    fn named(name: &str) -> Option<Self> {
        let rgb = match name {
            "black"       => Rgb::new(0, 0, 0),
            "white"       => Rgb::new(255, 255, 255),
            "red"         => Rgb::new(255, 0, 0),
            "green"       => Rgb::new(0, 128, 0),
            "blue"        => Rgb::new(0, 0, 255),
            "orange"      => Rgb::new(255, 165, 0),
            "yellow"      => Rgb::new(255, 255, 0),
            "purple"      => Rgb::new(128, 0, 128),
            "gray" | "grey" => Rgb::new(128, 128, 128),
            "saddlebrown" => Rgb::new(139, 69, 19),
            _ => return None,
        };
        Some(rgb)
    }

    /// Count-weighted average of several colors. Returns `None` when all weights are zero.
    pub(crate) fn mix(weighted: impl IntoIterator<Item = (Rgb, f64)>) -> Option<Rgb> {
        let (mut r, mut g, mut b, mut total) = (0.0, 0.0, 0.0, 0.0);
        for (color, w) in weighted {
            r += color.r as f64 * w;
            g += color.g as f64 * w;
            b += color.b as f64 * w;
            total += w;
        }
        if total <= 0.0 { return None }
        let channel = |v: f64| (v / total).round().clamp(0.0, 255.0) as u8;
        Some(Rgb::new(channel(r), channel(g), channel(b)))
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    /// Parse `#rrggbb` or a supported CSS color keyword.
    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            let channel = |i: usize| hex.get(i..i + 2).and_then(|h| u8::from_str_radix(h, 16).ok());
            if hex.len() == 6 {
                if let (Some(r), Some(g), Some(b)) = (channel(0), channel(2), channel(4)) {
                    return Ok(Rgb::new(r, g, b));
                }
            }
        }
        Rgb::named(&s).ok_or_else(|| Error::Config(format!("unrecognized color {s:?}")))
    }
}

impl TryFrom<String> for Rgb {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Error> { s.parse() }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self { color.to_string() }
}
