//! Use-Case: Gezeichneten Link löschen.

use anyhow::{bail, Result};

use super::outcome::{ChangeSet, EditOutcome};
use crate::core::Network;

/// Löscht einen im Editor gezeichneten Link.
///
/// Importierte Links sind nicht einzeln löschbar. Gezeichnete Endpunkt-Nodes,
/// an denen danach kein Link mehr endet, werden mit entfernt.
pub fn delete_link(network: &Network, link_id: &str) -> Result<EditOutcome> {
    let Some(link) = network.link(link_id) else {
        bail!("Unbekannter Link: {}", link_id);
    };
    if !link.user_created {
        bail!(
            "Link {} stammt aus dem Import und kann nicht einzeln gelöscht werden",
            link_id
        );
    }

    let mut next = network.clone();
    let mut changes = ChangeSet {
        removed_links: vec![link_id.to_string()],
        ..ChangeSet::default()
    };
    next.remove_link(link_id);

    let mut endpoints = vec![link.from.as_str()];
    if link.to != link.from {
        endpoints.push(link.to.as_str());
    }
    next.recount_degrees(endpoints.iter().copied());

    for node_id in endpoints {
        let orphan = next
            .node(node_id)
            .is_some_and(|node| node.user_created && node.degree == 0);
        if orphan {
            next.remove_node(node_id);
            changes.removed_nodes.push(node_id.to_string());
        } else if next.node(node_id).is_some() {
            changes.updated_nodes.push(node_id.to_string());
        }
    }

    log::info!(
        "Link {} gelöscht ({} verwaiste Nodes entfernt)",
        link_id,
        changes.removed_nodes.len()
    );

    Ok(EditOutcome {
        network: next,
        changes,
    })
}
