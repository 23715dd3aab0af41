//! Use-Case: Node verschieben (Drag ohne Snap).

use anyhow::{bail, Result};
use glam::DVec2;

use super::outcome::{push_unique, ChangeSet, EditOutcome, EditSettings};
use crate::core::geometry::points_within;
use crate::core::Network;

/// Verschiebt einen Node an eine neue Position.
///
/// Alle am Node endenden Links bekommen den passenden Endpunkt ersetzt.
/// Innere Stützpunkte, die auf der alten Position liegen (Durchgangs-Nodes),
/// werden ebenfalls mitgezogen.
pub fn move_node(
    network: &Network,
    node_id: &str,
    position: DVec2,
    settings: &EditSettings,
) -> Result<EditOutcome> {
    let Some(node) = network.node(node_id) else {
        bail!("Unbekannter Node: {}", node_id);
    };
    if !position.is_finite() {
        bail!("Ungueltige Zielposition für Node {}: {:?}", node_id, position);
    }
    let old_position = node.position;

    let mut next = network.clone();
    let mut changes = ChangeSet::default();

    next.set_node_position(node_id, position);
    changes.updated_nodes.push(node_id.to_string());

    let link_ids: Vec<String> = network.links().keys().cloned().collect();
    for link_id in link_ids {
        let Some(link) = network.link(&link_id) else {
            continue;
        };
        let last = link.geometry.len().saturating_sub(1);
        let mut indices: Vec<usize> = Vec::new();
        if link.from == node_id {
            indices.push(0);
        }
        if link.to == node_id && last > 0 {
            indices.push(last);
        }
        indices.extend(
            (1..last).filter(|&i| {
                points_within(link.geometry[i], old_position, settings.pass_through_epsilon)
            }),
        );
        if indices.is_empty() {
            continue;
        }

        if let Some(link) = next.link_mut(&link_id) {
            for i in indices {
                link.geometry[i] = position;
            }
        }
        push_unique(&mut changes.updated_links, link_id);
    }

    log::info!(
        "Node {} verschoben nach ({:.1}, {:.1}), {} Links angepasst",
        node_id,
        position.x,
        position.y,
        changes.updated_links.len()
    );

    Ok(EditOutcome {
        network: next,
        changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::use_cases::editing::test_support::{assert_consistent, sample_network};
    use crate::core::{Link, LinkTags, Node};

    #[test]
    fn test_move_updates_touching_link_endpoints() {
        let network = sample_network();
        let target = DVec2::new(110.0, 5.0);

        let outcome = move_node(&network, "b", target, &EditSettings::default())
            .expect("Verschieben erwartet");
        let moved = &outcome.network;

        assert_eq!(moved.node("b").map(|n| n.position), Some(target));
        assert_eq!(moved.link("link_ab").and_then(|l| l.last_point()), Some(target));
        assert_eq!(moved.link("link_bc").and_then(|l| l.first_point()), Some(target));
        assert_eq!(moved.link("link_bd").and_then(|l| l.first_point()), Some(target));
        assert_eq!(moved.node_count(), network.node_count());
        assert_eq!(outcome.changes.updated_links.len(), 3);
        assert_consistent(moved);
    }

    #[test]
    fn test_move_leaves_input_untouched() {
        let network = sample_network();
        let before = network.clone();

        let outcome = move_node(&network, "a", DVec2::new(-5.0, -5.0), &EditSettings::default())
            .expect("Verschieben erwartet");

        assert_eq!(network, before);
        assert_ne!(outcome.network, before);
        assert!(outcome.network.shares_buildings_with(&network));
    }

    #[test]
    fn test_move_drags_pass_through_vertices() {
        let mut network = sample_network();
        // Zweiter Link läuft durch die Position von b
        network.insert_node(Node::new("e", None, DVec2::new(100.0, -50.0), 1));
        network.insert_node(Node::new("f", None, DVec2::new(100.0, -100.0), 1));
        network.insert_link(Link::new(
            "link_ef",
            "e",
            "f",
            vec![
                DVec2::new(100.0, -50.0),
                DVec2::new(100.0, 0.0),
                DVec2::new(100.0, -100.0),
            ],
            LinkTags::new("service"),
        ));

        let outcome = move_node(&network, "b", DVec2::new(120.0, 0.0), &EditSettings::default())
            .expect("Verschieben erwartet");

        let link = outcome.network.link("link_ef").expect("Link erwartet");
        assert_eq!(link.geometry[1], DVec2::new(120.0, 0.0));
        assert_eq!(link.geometry[0], DVec2::new(100.0, -50.0));
        assert!(outcome.changes.updated_links.contains(&"link_ef".to_string()));
        assert_consistent(&outcome.network);
    }

    #[test]
    fn test_move_unknown_node_fails() {
        let network = sample_network();
        let err = move_node(&network, "zz", DVec2::ZERO, &EditSettings::default())
            .expect_err("Fehler erwartet");
        assert!(err.to_string().contains("Unbekannter Node"));
    }
}
