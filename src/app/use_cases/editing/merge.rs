//! Use-Case: Nodes verschmelzen (Snap beim Ablegen).

use anyhow::{bail, Result};
use glam::DVec2;

use super::outcome::{push_unique, ChangeSet, EditOutcome, EditSettings};
use crate::core::geometry::points_within;
use crate::core::Network;

/// Verschmilzt `dragged_id` in `target_id`.
///
/// Alle Links des gezogenen Nodes werden auf das Ziel umgehängt (Endpunkt-Geometrie
/// auf die Zielposition), der gezogene Node wird gelöscht und der Grad des Ziels
/// neu gezählt. Links, die dadurch zur Schleife `target → target` werden, entfallen.
pub fn merge_nodes(
    network: &Network,
    dragged_id: &str,
    target_id: &str,
    settings: &EditSettings,
) -> Result<EditOutcome> {
    if dragged_id == target_id {
        bail!("Node {} kann nicht mit sich selbst verschmolzen werden", dragged_id);
    }
    let Some(dragged) = network.node(dragged_id) else {
        bail!("Unbekannter Node: {}", dragged_id);
    };
    let Some(target) = network.node(target_id) else {
        bail!("Unbekannter Ziel-Node: {}", target_id);
    };
    let old_position = dragged.position;
    let target_position = target.position;

    let mut next = network.clone();
    let mut changes = ChangeSet::default();
    let mut touched_nodes: Vec<String> = vec![target_id.to_string()];

    let link_ids: Vec<String> = network.links().keys().cloned().collect();
    for link_id in link_ids {
        let Some(link) = network.link(&link_id) else {
            continue;
        };
        let was_loop = link.from == link.to;
        let last = link.geometry.len().saturating_sub(1);
        let interior: Vec<usize> = (1..last)
            .filter(|&i| points_within(link.geometry[i], old_position, settings.pass_through_epsilon))
            .collect();
        if !link.touches(dragged_id) && interior.is_empty() {
            continue;
        }

        let mut updated = link.clone();
        if updated.from == dragged_id {
            updated.from = target_id.to_string();
            if let Some(first) = updated.geometry.first_mut() {
                *first = target_position;
            }
        }
        if updated.to == dragged_id {
            updated.to = target_id.to_string();
            if let Some(last_point) = updated.geometry.last_mut() {
                *last_point = target_position;
            }
        }
        for i in interior {
            updated.geometry[i] = target_position;
        }

        if updated.from == updated.to && !was_loop {
            // Verbindung zwischen den beiden verschmolzenen Nodes
            let other = if link.from == dragged_id { &link.to } else { &link.from };
            touched_nodes.push(other.clone());
            next.remove_link(&link_id);
            log::debug!("Link {} nach Merge zur Schleife geworden, entfernt", link_id);
            push_unique(&mut changes.removed_links, link_id);
        } else {
            next.insert_link(updated);
            push_unique(&mut changes.updated_links, link_id);
        }
    }

    next.remove_node(dragged_id);
    changes.removed_nodes.push(dragged_id.to_string());

    touched_nodes.retain(|id| id != dragged_id);
    next.recount_degrees(touched_nodes.iter().map(String::as_str));
    for id in touched_nodes {
        push_unique(&mut changes.updated_nodes, id);
    }

    log::info!(
        "Node {} mit {} verschmolzen ({} Links umgehängt, {} entfernt)",
        dragged_id,
        target_id,
        changes.updated_links.len(),
        changes.removed_links.len()
    );

    Ok(EditOutcome {
        network: next,
        changes,
    })
}

/// Sucht den nächsten anderen Node innerhalb des Snap-Radius um `position`
pub fn find_merge_candidate(
    network: &Network,
    node_id: &str,
    position: DVec2,
    threshold: f64,
) -> Option<String> {
    network
        .nodes_within_radius(position, threshold)
        .into_iter()
        .find(|m| m.node_id != node_id)
        .map(|m| m.node_id)
}

/// Snap-Merge: verschmilzt den Node mit dem nächsten Node innerhalb des Snap-Radius.
///
/// Liefert `Ok(None)`, wenn kein Kandidat im Radius liegt; der Aufrufer kann dann
/// auf ein einfaches Verschieben zurückfallen.
pub fn snap_merge(
    network: &Network,
    node_id: &str,
    position: DVec2,
    settings: &EditSettings,
) -> Result<Option<EditOutcome>> {
    if network.node(node_id).is_none() {
        bail!("Unbekannter Node: {}", node_id);
    }
    match find_merge_candidate(network, node_id, position, settings.snap_threshold) {
        Some(target_id) => merge_nodes(network, node_id, &target_id, settings).map(Some),
        None => Ok(None),
    }
}
