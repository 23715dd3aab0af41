//! Use-Case: Link an einem Punkt teilen (neuer Node in der Mitte).

use anyhow::{bail, Context, Result};
use glam::DVec2;

use super::outcome::{ChangeSet, EditOutcome};
use crate::core::geometry::{
    nearest_point_on_polyline, point_at_half_length, points_coincide, split_polyline,
};
use crate::core::{Link, Network, Node};

/// Teilt einen Link in zwei Hälften und fügt am Teilungspunkt einen neuen Node ein.
///
/// Mit `click` wird der Klickpunkt auf die Geometrie projiziert, ohne `click`
/// wird auf halber Länge geteilt. Beide Hälften übernehmen die Tags des
/// Originals. Teilungen exakt auf einem Endpunkt werden abgelehnt.
pub fn split_link(network: &Network, link_id: &str, click: Option<DVec2>) -> Result<EditOutcome> {
    let Some(link) = network.link(link_id) else {
        bail!("Unbekannter Link: {}", link_id);
    };
    if link.geometry.len() < 2 {
        bail!("Link {} hat keine teilbare Geometrie", link_id);
    }

    let hit = match click {
        Some(point) => nearest_point_on_polyline(&link.geometry, point),
        None => point_at_half_length(&link.geometry),
    }
    .with_context(|| format!("Kein Teilungspunkt auf Link {}", link_id))?;

    let at_endpoint = [link.first_point(), link.last_point()]
        .into_iter()
        .flatten()
        .any(|p| points_coincide(p, hit.point));
    if at_endpoint {
        bail!("Teilung am Endpunkt von Link {} nicht möglich", link_id);
    }

    let (first_half, second_half) = split_polyline(&link.geometry, &hit);

    let mut next = network.clone();
    next.remove_link(link_id);

    let node_id = next.next_user_node_id();
    next.insert_node(Node::user_created(node_id.clone(), hit.point));

    let first_id = next.next_user_link_id();
    next.insert_link(half_of(link, &first_id, &link.from, &node_id, first_half));
    let second_id = next.next_user_link_id();
    next.insert_link(half_of(link, &second_id, &node_id, &link.to, second_half));

    let touched = [link.from.as_str(), link.to.as_str(), node_id.as_str()];
    next.recount_degrees(touched);

    log::info!(
        "Link {} an ({:.1}, {:.1}) geteilt: {} + {} über Node {}",
        link_id,
        hit.point.x,
        hit.point.y,
        first_id,
        second_id,
        node_id
    );

    let mut updated_nodes = vec![link.from.clone()];
    if link.to != link.from {
        updated_nodes.push(link.to.clone());
    }

    Ok(EditOutcome {
        network: next,
        changes: ChangeSet {
            added_nodes: vec![node_id],
            updated_nodes,
            added_links: vec![first_id, second_id],
            removed_links: vec![link_id.to_string()],
            ..ChangeSet::default()
        },
    })
}

fn half_of(original: &Link, id: &str, from: &str, to: &str, geometry: Vec<DVec2>) -> Link {
    Link {
        id: id.to_string(),
        origin_id: original.origin_id,
        geometry,
        from: from.to_string(),
        to: to.to_string(),
        tags: original.tags.clone(),
        user_created: original.user_created,
    }
}
