mod fs;
mod io;
mod polygon;

pub use io::Rgb;
pub(crate) use fs::*;
pub(crate) use io::*;
pub(crate) use polygon::*;
