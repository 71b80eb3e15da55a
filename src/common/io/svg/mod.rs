mod color;
mod path;
mod writer;

pub use color::Rgb;
pub(crate) use path::*;
pub(crate) use writer::*;
