use std::fmt::Write;

use geo::{Coord, LineString};

/// Projection function: map coords -> SVG coords (x,y)
pub(crate) type Projection<'a> = dyn Fn(&Coord<f64>) -> (f64, f64) + 'a;

/// Build a compact SVG path string for a LineString (ring): "M x,y L x,y ... Z"
pub(crate) fn ring_to_path(ring: &LineString<f64>, project: &Projection<'_>, out: &mut String) {
    let mut coords = ring.0.iter().map(|coord| project(coord));
    if let Some((x, y)) = coords.next() {
        let _ = write!(out, " M{x:.3},{y:.3}");
        for (x, y) in coords {
            let _ = write!(out, " L{x:.3},{y:.3}");
        }
        out.push('Z');
    }
}

/// Build one path string covering several rings (exteriors + holes, even-odd fill).
pub(crate) fn rings_to_path<'a>(rings: impl IntoIterator<Item = &'a LineString<f64>>, project: &Projection<'_>) -> String {
    let mut out = String::new();
    for ring in rings {
        ring_to_path(ring, project, &mut out);
    }
    out
}

/// Escape text for use inside SVG element content or attribute values.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_becomes_closed_subpath() {
        let ring = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        let path = rings_to_path([&ring], &|c: &Coord<f64>| (c.x * 2.0, c.y));
        assert_eq!(path, " M0.000,0.000 L2.000,0.000 L2.000,1.000Z");
    }

    #[test]
    fn projection_may_borrow_local_state() {
        let ring = LineString::from(vec![(1.0, 1.0), (2.0, 3.0)]);
        let offset = (10.0, 20.0);
        let project = |c: &Coord<f64>| (c.x + offset.0, c.y + offset.1);
        assert_eq!(rings_to_path([&ring], &project), " M11.000,21.000 L12.000,23.000Z");
    }

    #[test]
    fn empty_ring_is_skipped() {
        let ring = LineString::<f64>::new(vec![]);
        assert_eq!(rings_to_path([&ring], &|c: &Coord<f64>| (c.x, c.y)), "");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_xml("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
