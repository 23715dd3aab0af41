//! Klassifizierungs-Tabellen für Straßen, ÖV-Linien und Gebäude.

use std::sync::OnceLock;

use regex::Regex;

use super::elements::Tags;
use crate::core::BuildingType;

/// `highway`-Werte, die als befahrbare Straße importiert werden
pub const ROAD_CLASSES: &[&str] = &[
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
    "residential",
    "living_street",
    "service",
    "motorway_link",
    "trunk_link",
    "primary_link",
    "secondary_link",
    "tertiary_link",
];

/// `route`-Werte, die als ÖV-Linie gelten
pub const TRANSIT_ROUTE_KINDS: &[&str] = &[
    "bus",
    "trolleybus",
    "tram",
    "light_rail",
    "subway",
    "train",
    "monorail",
    "ferry",
];

/// Geordnete Gebäude-Regeln `(key, value, typ)`; die erste passende gewinnt.
///
/// `shop=supermarket` steht vor der allgemeinen `shop`-Regel.
pub const BUILDING_RULES: &[(&str, &str, BuildingType)] = &[
    ("shop", "supermarket", BuildingType::Supermarket),
    ("amenity", "school", BuildingType::School),
    ("amenity", "kindergarten", BuildingType::Kindergarten),
    ("amenity", "parking", BuildingType::Parking),
    ("building", "apartments", BuildingType::Apartments),
    ("building", "retail", BuildingType::Retail),
    ("building", "school", BuildingType::School),
    ("building", "kindergarten", BuildingType::Kindergarten),
    ("shop", "*", BuildingType::Retail),
];

/// Straßenklasse des Ways, falls er als Straße gilt
pub fn road_class(tags: &Tags) -> Option<&str> {
    let highway = tags.get("highway")?;
    ROAD_CLASSES
        .iter()
        .any(|class| class == highway)
        .then_some(highway.as_str())
}

/// ÖV-Verkehrsmittel der Relation, falls es eine ÖV-Linie ist
pub fn transit_route_kind(tags: &Tags) -> Option<&str> {
    if tags.get("type").map(String::as_str) != Some("route") {
        return None;
    }
    let kind = tags.get("route")?;
    TRANSIT_ROUTE_KINDS
        .iter()
        .any(|k| k == kind)
        .then_some(kind.as_str())
}

/// Gebäudetyp nach [`BUILDING_RULES`]
pub fn building_type(tags: &Tags) -> Option<BuildingType> {
    BUILDING_RULES
        .iter()
        .find(|(key, value, _)| match tags.get(*key) {
            Some(actual) => *value == "*" || actual == value,
            None => false,
        })
        .map(|(_, _, kind)| *kind)
}

/// Führende Ganzzahl eines Tag-Werts (`"50 mph"` → 50, `"none"` → `None`)
pub fn parse_leading_int(value: &str) -> Option<u32> {
    static LEADING_INT: OnceLock<Option<Regex>> = OnceLock::new();
    let regex = LEADING_INT
        .get_or_init(|| Regex::new(r"^\s*(\d+)").ok())
        .as_ref()?;
    regex.captures(value)?.get(1)?.as_str().parse().ok()
}

/// `oneway` ist nur bei exakt `"yes"` gesetzt
pub fn is_oneway(tags: &Tags) -> bool {
    tags.get("oneway").map(String::as_str) == Some("yes")
}
