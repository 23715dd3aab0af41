//! Persistierter Editier-Zustand (JSON).
//!
//! Die Mappings des Netzwerks werden als Arrays von `[key, value]`-Paaren
//! gespeichert und beim Laden wieder in ein [`Network`] überführt.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Building, Link, Network, Node, TransportRoute};
use crate::geo::{Crs, GeoPoint};

/// Aktuelle Version des Zustandsformats
pub const STATE_FORMAT_VERSION: u32 = 1;

/// Metadaten des Imports (Abfragegebiet und Zeitpunkt)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportMeta {
    pub center: GeoPoint,
    pub radius_m: f64,
    pub imported_at: DateTime<Utc>,
}

impl ImportMeta {
    /// Metadaten mit aktuellem Zeitstempel
    pub fn now(center: GeoPoint, radius_m: f64) -> Self {
        Self {
            center,
            radius_m,
            imported_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
    version: u32,
    #[serde(default)]
    meta: Option<ImportMeta>,
    network: PersistedNetwork,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedNetwork {
    crs: Crs,
    nodes: Vec<(String, Node)>,
    links: Vec<(String, Link)>,
    #[serde(default)]
    routes: Vec<(String, TransportRoute)>,
    #[serde(default)]
    buildings: Vec<(String, Building)>,
}

/// Serialisiert Netzwerk und Import-Metadaten als JSON.
pub fn save_state_json(network: &Network, meta: Option<&ImportMeta>) -> Result<String> {
    let state = PersistedState {
        version: STATE_FORMAT_VERSION,
        meta: meta.cloned(),
        network: PersistedNetwork {
            crs: network.crs(),
            nodes: pairs(network.nodes()),
            links: pairs(network.links()),
            routes: pairs(network.routes()),
            buildings: pairs(network.buildings()),
        },
    };
    serde_json::to_string_pretty(&state).context("Zustand konnte nicht serialisiert werden")
}

/// Stellt Netzwerk und Import-Metadaten aus JSON wieder her.
pub fn load_state_json(json: &str) -> Result<(Network, Option<ImportMeta>)> {
    let state: PersistedState =
        serde_json::from_str(json).context("Ungueltiger Editier-Zustand")?;
    if state.version > STATE_FORMAT_VERSION {
        bail!(
            "Zustandsformat {} wird nicht unterstützt (maximal {})",
            state.version,
            STATE_FORMAT_VERSION
        );
    }

    let persisted = state.network;
    if !persisted.crs.is_supported() {
        bail!("Ungueltiger Editier-Zustand: {} wird nicht unterstützt", persisted.crs);
    }

    let mut network = Network::new(persisted.crs);
    for (key, node) in persisted.nodes {
        check_key("Node", &key, &node.id)?;
        network.insert_node(node);
    }
    for (key, link) in persisted.links {
        check_key("Link", &key, &link.id)?;
        network.insert_link(link);
    }
    for (key, route) in persisted.routes {
        check_key("Linie", &key, &route.id)?;
        network.insert_route(route);
    }
    for (key, building) in persisted.buildings {
        check_key("Gebäude", &key, &building.id)?;
        network.insert_building(building);
    }

    let violations = network.verify_topology();
    if !violations.is_empty() {
        log::warn!(
            "Wiederhergestellter Zustand hat {} Topologie-Verstöße (erster: {:?})",
            violations.len(),
            violations.first()
        );
    }
    log::info!(
        "Editier-Zustand geladen: {} Nodes, {} Links",
        network.node_count(),
        network.link_count()
    );

    Ok((network, state.meta))
}

fn pairs<T: Clone>(map: &indexmap::IndexMap<String, T>) -> Vec<(String, T)> {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

fn check_key(kind: &str, key: &str, id: &str) -> Result<()> {
    if key != id {
        bail!(
            "Ungueltiger Editier-Zustand: {}-Schlüssel {} passt nicht zur ID {}",
            kind,
            key,
            id
        );
    }
    Ok(())
}
