mod color_key;
mod points;

pub use color_key::{ColorKey, ColorKeyEntry};
pub use points::CensusPoints;
