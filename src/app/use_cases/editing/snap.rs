//! Snap-Ziel für einen abgelegten Punkt: bestehender Node oder Punkt auf einem Link.

use glam::DVec2;

use crate::core::geometry::{nearest_point_on_polyline, points_coincide};
use crate::core::Network;

/// Ergebnis der Snap-Suche
#[derive(Debug, Clone, PartialEq)]
pub enum SnapTarget {
    /// Verschmelzen mit einem bestehenden Node
    Node { node_id: String, distance: f64 },
    /// Link an `point` teilen
    Link {
        link_id: String,
        point: DVec2,
        distance: f64,
    },
}

impl SnapTarget {
    pub fn distance(&self) -> f64 {
        match self {
            Self::Node { distance, .. } | Self::Link { distance, .. } => *distance,
        }
    }
}

/// Sucht Node- und Link-Kandidaten innerhalb von `threshold` um `point`.
///
/// Liegen beide im Radius, gewinnt der Node, wenn sein Abstand kleiner als die
/// Hälfte des Link-Abstands ist. `exclude_node` (der gezogene Node) und alle an
/// ihm hängenden Links werden ignoriert; Treffer genau auf einem Link-Endpunkt
/// zählen nicht als Link. Abstände und `threshold` sind Meter.
pub fn find_snap_target(
    network: &Network,
    point: DVec2,
    exclude_node: Option<&str>,
    threshold: f64,
) -> Option<SnapTarget> {
    let node_candidate = network
        .nodes_within_radius(point, threshold)
        .into_iter()
        .find(|m| Some(m.node_id.as_str()) != exclude_node);

    let crs = network.crs();
    let link_candidate = network
        .links()
        .values()
        .filter(|link| !exclude_node.is_some_and(|id| link.touches(id)))
        .filter_map(|link| {
            let mut hit = nearest_point_on_polyline(&link.geometry, point)?;
            hit.distance = crs.distance(point, hit.point);
            if hit.distance > threshold {
                return None;
            }
            let on_endpoint = [link.first_point(), link.last_point()]
                .into_iter()
                .flatten()
                .any(|p| points_coincide(p, hit.point));
            (!on_endpoint).then_some((link, hit))
        })
        .min_by(|(la, a), (lb, b)| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| la.id.cmp(&lb.id))
        });

    match (node_candidate, link_candidate) {
        (Some(node), Some((link, hit))) => {
            if node.distance < 0.5 * hit.distance {
                Some(SnapTarget::Node {
                    node_id: node.node_id,
                    distance: node.distance,
                })
            } else {
                Some(SnapTarget::Link {
                    link_id: link.id.clone(),
                    point: hit.point,
                    distance: hit.distance,
                })
            }
        }
        (Some(node), None) => Some(SnapTarget::Node {
            node_id: node.node_id,
            distance: node.distance,
        }),
        (None, Some((link, hit))) => Some(SnapTarget::Link {
            link_id: link.id.clone(),
            point: hit.point,
            distance: hit.distance,
        }),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::editing::test_support::sample_network;
    use crate::core::{Link, LinkTags, Node};
    use crate::geo::Crs;

    #[test]
    fn test_node_within_threshold() {
        let network = sample_network();

        let target = find_snap_target(&network, DVec2::new(203.0, 4.0), None, 10.0);

        assert_eq!(
            target,
            Some(SnapTarget::Node {
                node_id: "c".to_string(),
                distance: 5.0
            })
        );
    }

    #[test]
    fn test_link_within_threshold() {
        let network = sample_network();

        let target = find_snap_target(&network, DVec2::new(150.0, 3.0), None, 10.0)
            .expect("Treffer erwartet");

        match target {
            SnapTarget::Link { link_id, point, distance } => {
                assert_eq!(link_id, "link_bc");
                assert_eq!(point, DVec2::new(150.0, 0.0));
                assert_eq!(distance, 3.0);
            }
            other => panic!("Link erwartet, erhalten: {:?}", other),
        }
    }

    #[test]
    fn test_nothing_within_threshold() {
        let network = sample_network();
        assert!(find_snap_target(&network, DVec2::new(150.0, 50.0), None, 10.0).is_none());
    }

    #[test]
    fn test_excluded_node_and_its_links_are_ignored() {
        let network = sample_network();

        // Direkt auf c, aber c wird gezogen: link_bc hängt an c und zählt nicht
        let target = find_snap_target(&network, DVec2::new(199.0, 0.0), Some("c"), 10.0);
        assert!(target.is_none());
    }

    #[test]
    fn test_tie_break_prefers_close_node() {
        let mut network = sample_network();
        // Freistehender Link e-f parallel zu link_bc in 8 m Abstand
        network.insert_node(Node::new("e", None, DVec2::new(150.0, 8.0), 1));
        network.insert_node(Node::new("f", None, DVec2::new(250.0, 8.0), 1));
        network.insert_link(Link::new(
            "link_ef",
            "e",
            "f",
            vec![DVec2::new(150.0, 8.0), DVec2::new(250.0, 8.0)],
            LinkTags::new("service"),
        ));

        // c in 2 m, link_ef in 6 m → Node
        let target = find_snap_target(&network, DVec2::new(200.0, 2.0), None, 10.0)
            .expect("Treffer erwartet");
        assert!(matches!(target, SnapTarget::Node { ref node_id, .. } if node_id == "c"));

        // c in 5 m, link_ef in 4 m → Link
        let target = find_snap_target(&network, DVec2::new(203.0, 4.0), None, 10.0)
            .expect("Treffer erwartet");
        assert!(matches!(target, SnapTarget::Link { ref link_id, .. } if link_id == "link_ef"));
    }

    #[test]
    fn test_incident_link_wins_over_distant_endpoint() {
        let network = sample_network();

        // c in 9,06 m, das an c hängende link_bc in 1 m → Link teilen
        let target = find_snap_target(&network, DVec2::new(191.0, 1.0), Some("e"), 10.0)
            .expect("Treffer erwartet");

        match target {
            SnapTarget::Link { link_id, point, distance } => {
                assert_eq!(link_id, "link_bc");
                assert_eq!(point, DVec2::new(191.0, 0.0));
                assert_eq!(distance, 1.0);
            }
            other => panic!("Link erwartet, erhalten: {:?}", other),
        }
    }

    #[test]
    fn test_geographic_threshold_is_in_meters() {
        let mut network = Network::new(Crs::WGS84);
        network.insert_node(Node::new("a", None, DVec2::new(151.0, -33.0), 1));
        network.insert_node(Node::new("b", None, DVec2::new(151.0, -33.01), 1));
        network.insert_link(Link::new(
            "link_ab",
            "a",
            "b",
            vec![DVec2::new(151.0, -33.0), DVec2::new(151.0, -33.01)],
            LinkTags::new("residential"),
        ));

        // ~9 m östlich der Linie
        let near = find_snap_target(&network, DVec2::new(151.0001, -33.005), None, 10.0)
            .expect("Treffer erwartet");
        assert!(matches!(near, SnapTarget::Link { ref link_id, .. } if link_id == "link_ab"));
        assert!(near.distance() > 9.0 && near.distance() < 10.0);

        // ~93 m östlich: weder Node noch Link
        assert!(find_snap_target(&network, DVec2::new(151.001, -33.005), None, 10.0).is_none());
        // Node b liegt ~1112 m entfernt
        assert!(find_snap_target(&network, DVec2::new(151.0, -33.0), Some("a"), 10.0).is_none());
    }
}
