use super::*;
use crate::core::BuildingType;
use approx::assert_relative_eq;
use serde_json::json;

fn point(id: u64, lat: f64, lon: f64) -> serde_json::Value {
    json!({ "type": "node", "id": id, "lat": lat, "lon": lon })
}

/// Drei Punkte in Hannover (UTM 32), ein Way A-B-C
fn residential_response() -> String {
    json!({
        "elements": [
            point(1, 52.3700, 9.7300),
            point(2, 52.3705, 9.7310),
            point(3, 52.3710, 9.7320),
            {
                "type": "way",
                "id": 100,
                "nodes": [1, 2, 3],
                "tags": { "highway": "residential", "lanes": "2", "maxspeed": "50", "name": "Lindenweg" }
            }
        ]
    })
    .to_string()
}

// ── Straßen ─────────────────────────────────────────────────────────

#[test]
fn test_single_way_becomes_link_with_three_nodes() {
    let (network, report) = import_overpass_json(&residential_response()).expect("Import erwartet");

    assert_eq!(report.crs, Crs::etrs89_utm(32));
    assert_eq!(network.crs(), Crs::etrs89_utm(32));
    assert_eq!(network.link_count(), 1);
    assert_eq!(network.node_count(), 3);

    let link = network.link("link_100").expect("link_100 erwartet");
    assert_eq!(link.from, "node_1");
    assert_eq!(link.to, "node_3");
    assert_eq!(link.geometry.len(), 3);
    assert_eq!(link.origin_id, Some(100));
    assert_eq!(link.tags.road_class, "residential");
    assert_eq!(link.tags.lanes, Some(2));
    assert_eq!(link.tags.max_speed_kmh, Some(50));
    assert_eq!(link.tags.name.as_deref(), Some("Lindenweg"));
    assert!(!link.tags.oneway);

    for id in ["node_1", "node_2", "node_3"] {
        let node = network.node(id).expect("Node erwartet");
        assert!(node.degree >= 1, "{} hat Grad 0", id);
        assert!(!node.user_created);
    }
    assert_eq!(network.node("node_2").map(|n| n.degree), Some(1));
    assert!(network.is_consistent());
}

#[test]
fn test_endpoint_geometry_matches_node_positions() {
    let (network, _) = import_overpass_json(&residential_response()).expect("Import erwartet");
    let link = network.link("link_100").expect("Link erwartet");

    assert_eq!(link.first_point(), network.node("node_1").map(|n| n.position));
    assert_eq!(link.last_point(), network.node("node_3").map(|n| n.position));
}

#[test]
fn test_shared_point_counts_road_references() {
    let json = json!({
        "elements": [
            point(1, 52.0, 9.0),
            point(2, 52.001, 9.0),
            point(3, 52.002, 9.0),
            { "type": "way", "id": 10, "nodes": [1, 2], "tags": { "highway": "primary" } },
            { "type": "way", "id": 11, "nodes": [2, 3], "tags": { "highway": "primary" } },
            { "type": "way", "id": 12, "nodes": [2, 3], "tags": { "highway": "footway" } }
        ]
    })
    .to_string();

    let (network, _) = import_overpass_json(&json).expect("Import erwartet");

    assert_eq!(network.link_count(), 2);
    assert_eq!(network.node("node_2").map(|n| n.degree), Some(2));
    assert_eq!(network.node("node_1").map(|n| n.degree), Some(1));
    assert!(network.is_consistent());
}

#[test]
fn test_closed_way_counts_once_for_its_node() {
    let json = json!({
        "elements": [
            point(1, 52.0, 9.0),
            point(2, 52.001, 9.0),
            point(3, 52.001, 9.001),
            { "type": "way", "id": 20, "nodes": [1, 2, 3, 1], "tags": { "highway": "residential" } }
        ]
    })
    .to_string();

    let (network, _) = import_overpass_json(&json).expect("Import erwartet");

    let link = network.link("link_20").expect("Ringstraße erwartet");
    assert_eq!((link.from.as_str(), link.to.as_str()), ("node_1", "node_1"));
    assert_eq!(network.node("node_1").map(|n| n.degree), Some(1));
    assert!(network.is_consistent(), "{:?}", network.verify_topology());

    let mut recounted = network.clone();
    recounted.recount_degrees(["node_1"]);
    assert_eq!(recounted, network);
}

#[test]
fn test_oneway_only_for_exact_yes() {
    let json = json!({
        "elements": [
            point(1, 52.0, 9.0),
            point(2, 52.001, 9.0),
            { "type": "way", "id": 1, "nodes": [1, 2], "tags": { "highway": "primary", "oneway": "yes" } },
            { "type": "way", "id": 2, "nodes": [1, 2], "tags": { "highway": "primary", "oneway": "true" } }
        ]
    })
    .to_string();

    let (network, _) = import_overpass_json(&json).expect("Import erwartet");

    assert_eq!(network.link("link_1").map(|l| l.tags.oneway), Some(true));
    assert_eq!(network.link("link_2").map(|l| l.tags.oneway), Some(false));
}

#[test]
fn test_maxspeed_with_unit_and_none() {
    let json = json!({
        "elements": [
            point(1, 52.0, 9.0),
            point(2, 52.001, 9.0),
            { "type": "way", "id": 1, "nodes": [1, 2], "tags": { "highway": "primary", "maxspeed": "30 mph" } },
            { "type": "way", "id": 2, "nodes": [1, 2], "tags": { "highway": "primary", "maxspeed": "none" } }
        ]
    })
    .to_string();

    let (network, _) = import_overpass_json(&json).expect("Import erwartet");

    assert_eq!(network.link("link_1").and_then(|l| l.tags.max_speed_kmh), Some(30));
    assert_eq!(network.link("link_2").and_then(|l| l.tags.max_speed_kmh), None);
}

// ── Fehlertoleranz ──────────────────────────────────────────────────

#[test]
fn test_unresolvable_way_is_dropped_not_fatal() {
    let json = json!({
        "elements": [
            point(1, 52.0, 9.0),
            { "type": "way", "id": 7, "nodes": [1, 999], "tags": { "highway": "primary" } }
        ]
    })
    .to_string();

    let (network, report) = import_overpass_json(&json).expect("Import erwartet");

    assert_eq!(network.link_count(), 0);
    assert_eq!(network.node_count(), 0);
    assert_eq!(report.dropped_elements, 1);
}

#[test]
fn test_missing_interior_reference_is_skipped() {
    let json = json!({
        "elements": [
            point(1, 52.0, 9.0),
            point(3, 52.002, 9.0),
            { "type": "way", "id": 7, "nodes": [1, 2, 3], "tags": { "highway": "primary" } }
        ]
    })
    .to_string();

    let (network, report) = import_overpass_json(&json).expect("Import erwartet");

    let link = network.link("link_7").expect("Link erwartet");
    assert_eq!(link.geometry.len(), 2);
    assert_eq!(report.dropped_references, 1);
    assert!(network.is_consistent());
}

#[test]
fn test_malformed_elements_are_counted() {
    let json = json!({
        "elements": [
            point(1, 52.0, 9.0),
            point(2, 52.001, 9.0),
            { "type": "node", "id": "kaputt" },
            { "type": "area", "id": 5 },
            { "type": "node", "id": 9, "lat": 123.0, "lon": 9.0 },
            { "type": "way", "id": 1, "nodes": [1, 2], "tags": { "highway": "primary" } }
        ]
    })
    .to_string();

    let (network, report) = import_overpass_json(&json).expect("Import erwartet");

    assert_eq!(network.link_count(), 1);
    assert_eq!(report.dropped_elements, 3);
}

#[test]
fn test_structurally_invalid_response_fails() {
    let err = import_overpass_json(r#"{ "foo": [] }"#).expect_err("Fehler erwartet");
    assert!(format!("{err:#}").contains("Ungueltige Overpass-Antwort"));

    assert!(import_overpass_json("[1, 2, 3]").is_err());
    assert!(import_overpass_json("kein json").is_err());
}

#[test]
fn test_unknown_region_falls_back_to_geographic() {
    let json = json!({
        "elements": [
            point(1, -33.86, 151.20),
            point(2, -33.861, 151.201),
            { "type": "way", "id": 1, "nodes": [1, 2], "tags": { "highway": "primary" } }
        ]
    })
    .to_string();

    let (network, report) = import_overpass_json(&json).expect("Import erwartet");

    assert_eq!(report.crs, Crs::WGS84);
    let node = network.node("node_1").expect("Node erwartet");
    assert_relative_eq!(node.position.x, 151.20);
    assert_relative_eq!(node.position.y, -33.86);
}

#[test]
fn test_empty_response_gives_empty_network() {
    let (network, report) = import_overpass_json(r#"{ "elements": [] }"#).expect("Import erwartet");

    assert!(network.is_empty());
    assert_eq!(report.crs, Crs::WGS84);
    assert!(report.bounds.is_none());
}

// ── ÖV-Linien ───────────────────────────────────────────────────────

#[test]
fn test_route_relation_contributes_one_route_per_way() {
    let json = json!({
        "elements": [
            point(1, 52.0, 9.0),
            point(2, 52.001, 9.0),
            point(3, 52.002, 9.0),
            point(4, 52.003, 9.0),
            { "type": "way", "id": 10, "nodes": [1, 2], "tags": { "highway": "primary" } },
            { "type": "way", "id": 11, "nodes": [3, 4], "tags": { "railway": "tram" } },
            { "type": "way", "id": 12, "nodes": [4, 404] },
            {
                "type": "relation",
                "id": 500,
                "members": [
                    { "type": "way", "ref": 10, "role": "" },
                    { "type": "node", "ref": 1, "role": "stop" },
                    { "type": "way", "ref": 11, "role": "" },
                    { "type": "way", "ref": 12, "role": "" },
                    { "type": "way", "ref": 13, "role": "" }
                ],
                "tags": { "type": "route", "route": "tram", "ref": "4", "name": "Linie 4", "colour": "#ff0000" }
            },
            {
                "type": "relation",
                "id": 501,
                "members": [{ "type": "way", "ref": 10, "role": "" }],
                "tags": { "type": "route", "route": "hiking" }
            }
        ]
    })
    .to_string();

    let (network, report) = import_overpass_json(&json).expect("Import erwartet");

    assert_eq!(network.route_count(), 2);
    let route = network.routes().get("route_500_11").expect("Route erwartet");
    assert_eq!(route.relation_id, 500);
    assert_eq!(route.way_id, 11);
    assert_eq!(route.geometry.len(), 1);
    assert_eq!(route.geometry[0].len(), 2);
    assert_eq!(route.tags.kind, "tram");
    assert_eq!(route.tags.reference.as_deref(), Some("4"));
    assert_eq!(route.tags.colour.as_deref(), Some("#ff0000"));
    assert!(network.routes().contains_key("route_500_10"));
    assert_eq!(report.routes, 2);
    assert_eq!(report.dropped_references, 2);
}

// ── Gebäude ─────────────────────────────────────────────────────────

#[test]
fn test_buildings_from_points_and_polygons() {
    let json = json!({
        "elements": [
            { "type": "node", "id": 1, "lat": 52.0, "lon": 9.0, "tags": { "shop": "supermarket", "building": "retail" } },
            { "type": "node", "id": 2, "lat": 52.0, "lon": 9.01, "tags": { "name": "Denkmal" } },
            point(10, 52.01, 9.0),
            point(11, 52.01, 9.001),
            point(12, 52.011, 9.001),
            point(13, 52.011, 9.0),
            { "type": "way", "id": 50, "nodes": [10, 11, 12, 13, 10], "tags": { "amenity": "school" } },
            { "type": "way", "id": 51, "nodes": [10, 11], "tags": { "building": "apartments" } }
        ]
    })
    .to_string();

    let (network, report) = import_overpass_json(&json).expect("Import erwartet");

    assert_eq!(network.building_count(), 2);
    assert_eq!(report.dropped_elements, 1);

    let shop = network.buildings().get("building_node_1").expect("Supermarkt erwartet");
    assert_eq!(shop.kind, BuildingType::Supermarket);
    assert!(shop.polygon.is_none());
    assert_eq!(shop.tags.get("building").map(String::as_str), Some("retail"));

    let school = network.buildings().get("building_way_50").expect("Schule erwartet");
    assert_eq!(school.kind, BuildingType::School);
    let polygon = school.polygon.as_ref().expect("Umriss erwartet");
    assert_eq!(polygon.len(), 5);
    let expected = geometry::centroid(polygon).expect("Schwerpunkt erwartet");
    assert_relative_eq!(school.position.x, expected.x);
    assert_relative_eq!(school.position.y, expected.y);
}

#[test]
fn test_explicit_crs_is_used() {
    let (network, report) =
        import_overpass_json_with_crs(&residential_response(), Crs::WGS84).expect("Import erwartet");

    assert_eq!(report.crs, Crs::WGS84);
    let node = network.node("node_1").expect("Node erwartet");
    assert_relative_eq!(node.position.y, 52.37);

    assert!(import_overpass_json_with_crs(&residential_response(), Crs::from_epsg(1)).is_err());
}
