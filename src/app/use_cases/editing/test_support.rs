//! Gemeinsame Test-Netzwerke für die Editier-Operationen.

use glam::DVec2;

use crate::core::{Link, LinkTags, Network, Node};
use crate::geo::Crs;

/// Kleines Netz im UTM-System (Meter):
///
/// ```text
///            d (100,100)
///            |
/// a ---------b---------- c
/// (0,0)   (100,0)     (200,0)
/// ```
///
/// `link_ab` hat einen Zwischenpunkt bei (50,0).
pub(crate) fn sample_network() -> Network {
    let mut network = Network::new(Crs::etrs89_utm(32));
    network.insert_node(Node::new("a", Some(1), DVec2::new(0.0, 0.0), 1));
    network.insert_node(Node::new("b", Some(2), DVec2::new(100.0, 0.0), 3));
    network.insert_node(Node::new("c", Some(3), DVec2::new(200.0, 0.0), 1));
    network.insert_node(Node::new("d", Some(4), DVec2::new(100.0, 100.0), 1));

    network.insert_link(Link::new(
        "link_ab",
        "a",
        "b",
        vec![DVec2::new(0.0, 0.0), DVec2::new(50.0, 0.0), DVec2::new(100.0, 0.0)],
        LinkTags {
            lanes: Some(2),
            max_speed_kmh: Some(50),
            ..LinkTags::new("residential")
        },
    ));
    network.insert_link(Link::new(
        "link_bc",
        "b",
        "c",
        vec![DVec2::new(100.0, 0.0), DVec2::new(200.0, 0.0)],
        LinkTags::new("residential"),
    ));
    network.insert_link(Link::new(
        "link_bd",
        "b",
        "d",
        vec![DVec2::new(100.0, 0.0), DVec2::new(100.0, 100.0)],
        LinkTags::new("service"),
    ));
    network
}

/// Zwei parallele Ost-West-Links im geographischen Fallback (Sydney, Grad):
/// `a`–`c` auf 33,00° S und `b`–`d` auf 33,01° S, rund 1112 m voneinander.
pub(crate) fn geographic_network() -> Network {
    let mut network = Network::new(Crs::WGS84);
    let points = [
        ("a", DVec2::new(151.0, -33.0)),
        ("c", DVec2::new(151.001, -33.0)),
        ("b", DVec2::new(151.0, -33.01)),
        ("d", DVec2::new(151.001, -33.01)),
    ];
    for (id, position) in points {
        network.insert_node(Node::new(id, None, position, 1));
    }
    for (from, to) in [(0, 1), (2, 3)] {
        let (from_id, from_pos) = points[from];
        let (to_id, to_pos) = points[to];
        network.insert_link(Link::new(
            format!("link_{}{}", from_id, to_id),
            from_id,
            to_id,
            vec![from_pos, to_pos],
            LinkTags::new("residential"),
        ));
    }
    network
}

/// Bricht mit allen Verstößen ab, falls das Netz inkonsistent ist
pub(crate) fn assert_consistent(network: &Network) {
    let violations = network.verify_topology();
    assert!(violations.is_empty(), "Topologie-Verstöße: {:?}", violations);
}

/// Sortierte Grad-Verteilung (für Vergleiche bis auf Umbenennung)
pub(crate) fn degree_multiset(network: &Network) -> Vec<u32> {
    let mut degrees: Vec<u32> = network.nodes().values().map(|n| n.degree).collect();
    degrees.sort_unstable();
    degrees
}
