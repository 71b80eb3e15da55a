use shapefile as shp;

/// Convert a shapefile polygon into closed `geo::LineString` rings, keeping the
/// shapefile's ring order (each exterior followed by its holes).
pub(crate) fn shp_to_rings(p: &shp::Polygon) -> Vec<geo::LineString<f64>> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<geo::Coord<f64>>) {
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last { coords.push(first) }
        }
    }

    p.rings().iter()
        .map(|ring| {
            let mut coords: Vec<geo::Coord<f64>> = ring.points().iter()
                .map(|pt| geo::Coord { x: pt.x, y: pt.y })
                .collect();
            ensure_closed(&mut coords);
            geo::LineString(coords)
        })
        .filter(|ring| !ring.0.is_empty())
        .collect()
}

/// Build a shapefile polygon from closed exterior rings (clockwise, per shapefile convention).
#[cfg(test)]
pub(crate) fn rings_to_shp(rings: &[Vec<(f64, f64)>]) -> shp::Polygon {
    /// Get the signed area of a ring (negative when clockwise)
    fn signed_area(pts: &[shp::Point]) -> f64 {
        pts.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
    }

    let rings = rings.iter()
        .map(|ring| {
            let mut pts = ring.iter().map(|&(x, y)| shp::Point { x, y }).collect::<Vec<_>>();
            if signed_area(&pts) > 0.0 { pts.reverse() } // make CW
            shp::PolygonRing::Outer(pts)
        })
        .collect::<Vec<_>>();
    shp::Polygon::with_rings(rings)
}
