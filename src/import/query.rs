//! Overpass-QL-Abfrage für einen Kreis um einen Mittelpunkt.

use super::classify::{BUILDING_RULES, TRANSIT_ROUTE_KINDS};
use crate::geo::GeoPoint;

/// Timeout der Abfrage in Sekunden
pub const QUERY_TIMEOUT_S: u32 = 90;

/// Baut die Overpass-Abfrage für Straßen, ÖV-Relationen und Gebäude.
///
/// Die Antwort enthält über `(._;>;)` auch alle referenzierten Punkte und Ways.
pub fn build_overpass_query(center: GeoPoint, radius_m: f64) -> String {
    let around = format!(
        "(around:{:.0},{:.6},{:.6})",
        radius_m.max(0.0),
        center.lat,
        center.lon
    );

    let mut query = format!("[out:json][timeout:{}];\n(\n", QUERY_TIMEOUT_S);
    query.push_str(&format!("  way[\"highway\"]{};\n", around));
    query.push_str(&format!(
        "  relation[\"type\"=\"route\"][\"route\"~\"^({})$\"]{};\n",
        TRANSIT_ROUTE_KINDS.join("|"),
        around
    ));

    let mut seen: Vec<(&str, &str)> = Vec::new();
    for (key, value, _) in BUILDING_RULES {
        if seen.contains(&(*key, *value)) {
            continue;
        }
        seen.push((*key, *value));
        let filter = if *value == "*" {
            format!("[\"{}\"]", key)
        } else {
            format!("[\"{}\"=\"{}\"]", key, value)
        };
        query.push_str(&format!("  node{}{};\n", filter, around));
        query.push_str(&format!("  way{}{};\n", filter, around));
    }

    query.push_str(");\n(._;>;);\nout body;\n");
    query
}
