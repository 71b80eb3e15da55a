use std::io::Write;

use crate::{error::Result, geom::Extent};

/// Thin SVG document writer over any byte sink.
pub(crate) struct SvgWriter<W: Write> {
    writer: W,
}

/// Implement std::io::Write so `write!` / `writeln!` work.
impl<W: Write> Write for SvgWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.writer.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.writer.flush() }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> { self.writer.write_all(buf) }
}

impl<W: Write> SvgWriter<W> {
    pub(crate) fn new(writer: W) -> Self { Self { writer } }

    /// Write the SVG header, including the XML declaration and opening <svg> tag.
    /// The visible map extent is recorded as data attributes for client-side tooling.
    pub(crate) fn write_header(&mut self, width: f64, height: f64, extent: &Extent) -> Result<()> {
        let (x_min, x_max) = extent.x_range();
        let (y_min, y_max) = extent.y_range();
        writeln!(self, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
        writeln!(self, r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"
            width="{width}" height="{height}"
            viewBox="0 0 {width} {height}"
            data-x-min="{x_min}" data-x-max="{x_max}"
            data-y-min="{y_min}" data-y-max="{y_max}">"##)?;
        writeln!(self, r##"<rect width="100%" height="100%" fill="#000000"/>"##)?;
        Ok(())
    }

    /// Write SVG styles for map features.
    pub(crate) fn write_styles(&mut self, line_width: f64, line_color: &str, focus_color: &str) -> Result<()> {
        writeln!(self, r##"<defs>
<style>
    .dist {{ fill: none; stroke: {line_color}; stroke-width: {line_width}; vector-effect: non-scaling-stroke; }}
    .focus {{ fill: none; stroke: {focus_color}; stroke-width: {focus_width}; vector-effect: non-scaling-stroke; }}
    .legend text {{ font: 12px sans-serif; fill: #ffffff; }}
</style>
</defs>"##, focus_width = line_width * 2.0)?;
        Ok(())
    }

    /// Write the closing </svg> tag.
    pub(crate) fn write_footer(&mut self) -> Result<()> {
        writeln!(self, "</svg>")?;
        Ok(())
    }

    pub(crate) fn into_inner(self) -> W { self.writer }
}
