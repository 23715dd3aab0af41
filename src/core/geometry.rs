//! Polylinien- und Polygon-Hilfsfunktionen im projizierten Raum.

use glam::DVec2;

use super::POSITION_EPSILON;

/// Treffer auf einer Polylinie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolylineHit {
    /// Punkt auf der Linie
    pub point: DVec2,
    /// Index des Segments (`points[i]` → `points[i + 1]`)
    pub segment_index: usize,
    /// Abstand des Suchpunkts zur Linie (bei Mittelpunkt-Suche 0)
    pub distance: f64,
}

/// Summe der euklidischen Segmentlängen
pub fn polyline_length(points: &[DVec2]) -> f64 {
    points.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}

/// Nächster Punkt auf dem Segment `a`–`b` zu `p`
pub fn nearest_point_on_segment(p: DVec2, a: DVec2, b: DVec2) -> DVec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Nächster Punkt auf der gesamten Polylinie; `None` bei weniger als 2 Punkten.
pub fn nearest_point_on_polyline(points: &[DVec2], p: DVec2) -> Option<PolylineHit> {
    points
        .windows(2)
        .enumerate()
        .map(|(segment_index, pair)| {
            let point = nearest_point_on_segment(p, pair[0], pair[1]);
            PolylineHit {
                point,
                segment_index,
                distance: point.distance(p),
            }
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Punkt auf halber Länge der Polylinie
pub fn point_at_half_length(points: &[DVec2]) -> Option<PolylineHit> {
    if points.len() < 2 {
        return None;
    }
    let half = polyline_length(points) * 0.5;
    let mut walked = 0.0;
    for (segment_index, pair) in points.windows(2).enumerate() {
        let seg_len = pair[0].distance(pair[1]);
        if walked + seg_len >= half && seg_len > 0.0 {
            let t = (half - walked) / seg_len;
            return Some(PolylineHit {
                point: pair[0].lerp(pair[1], t),
                segment_index,
                distance: 0.0,
            });
        }
        walked += seg_len;
    }
    // Degenerierte Linie (Länge 0)
    Some(PolylineHit {
        point: points[0],
        segment_index: 0,
        distance: 0.0,
    })
}

/// Teilt eine Polylinie am Trefferpunkt in zwei Hälften.
///
/// Beide Hälften enthalten den Teilungspunkt. Fällt er auf einen bestehenden
/// Stützpunkt, wird dieser nicht verdoppelt.
pub fn split_polyline(points: &[DVec2], hit: &PolylineHit) -> (Vec<DVec2>, Vec<DVec2>) {
    let i = hit.segment_index.min(points.len().saturating_sub(2));

    let mut first: Vec<DVec2> = points[..=i].to_vec();
    let mut second: Vec<DVec2> = Vec::with_capacity(points.len() - i + 1);

    let start = points[i];
    let end = points[i + 1];

    if points_coincide(hit.point, start) {
        // Teilung exakt auf dem Stützpunkt i
        second.extend_from_slice(&points[i..]);
    } else if points_coincide(hit.point, end) {
        first.push(end);
        second.extend_from_slice(&points[i + 1..]);
    } else {
        first.push(hit.point);
        second.push(hit.point);
        second.extend_from_slice(&points[i + 1..]);
    }

    (first, second)
}

/// Schwerpunkt eines Polygons (Stützpunkt-Mittel, schließender Punkt ignoriert)
pub fn centroid(polygon: &[DVec2]) -> Option<DVec2> {
    let ring = open_ring(polygon);
    if ring.is_empty() {
        return None;
    }
    let sum = ring.iter().fold(DVec2::ZERO, |acc, p| acc + *p);
    Some(sum / ring.len() as f64)
}

/// Punkt-in-Polygon-Test (Ray-Casting)
pub fn point_in_polygon(p: DVec2, polygon: &[DVec2]) -> bool {
    let ring = open_ring(polygon);
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Prüft zwei Positionen auf Gleichheit innerhalb von [`POSITION_EPSILON`]
pub fn points_coincide(a: DVec2, b: DVec2) -> bool {
    points_within(a, b, POSITION_EPSILON)
}

/// Prüft zwei Positionen achsenweise auf Gleichheit innerhalb von `epsilon`
pub fn points_within(a: DVec2, b: DVec2, epsilon: f64) -> bool {
    (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon
}

fn open_ring(polygon: &[DVec2]) -> &[DVec2] {
    match polygon {
        [first, .., last] if polygon.len() > 1 && points_coincide(*first, *last) => {
            &polygon[..polygon.len() - 1]
        }
        _ => polygon,
    }
}
