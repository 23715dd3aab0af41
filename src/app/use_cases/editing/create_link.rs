//! Use-Case: Link frei zeichnen.

use anyhow::{bail, Result};
use glam::DVec2;

use super::merge::find_merge_candidate;
use super::outcome::{ChangeSet, EditOutcome, EditSettings};
use crate::core::geometry::point_in_polygon;
use crate::core::{Link, LinkTags, Network, Node};

/// Erstellt einen neuen Link aus einer gezeichneten Punktfolge.
///
/// Der erste Punkt muss auf einem bestehenden Node einrasten. Der letzte Punkt
/// rastet auf einen anderen Node ein oder erzeugt einen neuen Node; innere
/// Punkte rasten ein, wenn ein Node im Snap-Radius liegt. Gebäude unter der
/// neuen Geometrie werden entfernt.
pub fn create_link(
    network: &Network,
    points: &[DVec2],
    tags: LinkTags,
    settings: &EditSettings,
) -> Result<EditOutcome> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        bail!("Zum Zeichnen sind mindestens 2 Punkte nötig");
    };
    if points.len() < 2 {
        bail!("Zum Zeichnen sind mindestens 2 Punkte nötig");
    }
    if tags.road_class.trim().is_empty() {
        bail!("Straßenklasse fehlt");
    }

    let threshold = settings.snap_threshold;
    let Some(start_id) = nearest_node(network, first, None, threshold) else {
        bail!(
            "Zeichnen muss an einem bestehenden Node beginnen (kein Node innerhalb {:.1} m)",
            threshold
        );
    };

    let mut next = network.clone();
    let mut changes = ChangeSet::default();

    let end_id = match nearest_node(network, last, Some(&start_id), threshold) {
        Some(id) => {
            changes.updated_nodes.push(id.clone());
            id
        }
        None => {
            let id = next.next_user_node_id();
            next.insert_node(Node::user_created(id.clone(), last));
            changes.added_nodes.push(id.clone());
            id
        }
    };
    changes.updated_nodes.insert(0, start_id.clone());

    let mut geometry: Vec<DVec2> = Vec::with_capacity(points.len());
    for (i, point) in points.iter().enumerate() {
        let position = if i == 0 {
            node_position(&next, &start_id)
        } else if i == points.len() - 1 {
            node_position(&next, &end_id)
        } else {
            nearest_node(network, *point, None, threshold)
                .and_then(|id| network.node(&id).map(|n| n.position))
        };
        geometry.push(position.unwrap_or(*point));
    }

    let link_id = next.next_user_link_id();
    let mut link = Link::new(link_id.clone(), start_id.clone(), end_id.clone(), geometry, tags);
    link.user_created = true;

    let crs = network.crs();
    changes.removed_buildings = next.remove_buildings_where(|building| {
        link.geometry.iter().any(|vertex| {
            crs.distance(building.position, *vertex) <= threshold
                || building
                    .polygon
                    .as_ref()
                    .is_some_and(|polygon| point_in_polygon(*vertex, polygon))
        })
    });

    next.insert_link(link);
    next.recount_degrees([start_id.as_str(), end_id.as_str()]);
    changes.added_links.push(link_id.clone());

    log::info!(
        "Link {} gezeichnet: {} → {} ({} Punkte, {} Gebäude entfernt)",
        link_id,
        start_id,
        end_id,
        points.len(),
        changes.removed_buildings.len()
    );

    Ok(EditOutcome {
        network: next,
        changes,
    })
}

fn nearest_node(
    network: &Network,
    point: DVec2,
    exclude: Option<&str>,
    threshold: f64,
) -> Option<String> {
    match exclude {
        Some(id) => find_merge_candidate(network, id, point, threshold),
        None => network
            .nodes_within_radius(point, threshold)
            .into_iter()
            .next()
            .map(|m| m.node_id),
    }
}

fn node_position(network: &Network, node_id: &str) -> Option<DVec2> {
    network.node(node_id).map(|n| n.position)
}
