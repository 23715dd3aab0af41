//! Use-Case: Node nach dem Ziehen ablegen (Merge, Split+Merge oder Verschieben).

use anyhow::{bail, Context, Result};
use glam::DVec2;

use super::merge::merge_nodes;
use super::move_node::move_node;
use super::outcome::{EditOutcome, EditSettings};
use super::snap::{find_snap_target, SnapTarget};
use super::split_link::split_link;
use crate::core::Network;

/// Legt einen gezogenen Node an `position` ab.
///
/// - Node im Snap-Radius → Merge in diesen Node
/// - Link im Snap-Radius → Link teilen, dann in den neuen Teilungs-Node mergen
/// - sonst → einfaches Verschieben
pub fn drop_node(
    network: &Network,
    node_id: &str,
    position: DVec2,
    settings: &EditSettings,
) -> Result<EditOutcome> {
    if network.node(node_id).is_none() {
        bail!("Unbekannter Node: {}", node_id);
    }

    match find_snap_target(network, position, Some(node_id), settings.snap_threshold) {
        Some(SnapTarget::Node { node_id: target, .. }) => {
            merge_nodes(network, node_id, &target, settings)
        }
        Some(SnapTarget::Link { link_id, point, .. }) => {
            let split = split_link(network, &link_id, Some(point))?;
            let split_node = split
                .changes
                .added_nodes
                .first()
                .cloned()
                .context("Split ohne neuen Node")?;
            let merged = merge_nodes(&split.network, node_id, &split_node, settings)?;

            let mut changes = split.changes;
            changes.absorb(merged.changes);
            Ok(EditOutcome {
                network: merged.network,
                changes,
            })
        }
        None => move_node(network, node_id, position, settings),
    }
}
