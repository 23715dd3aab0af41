//! Die zentrale Network-Datenstruktur mit Nodes, Links, ÖV-Linien und Gebäuden.
//!
//! Die vier Mappings liegen jeweils hinter einem `Arc`. Ein Klon des Netzwerks
//! ist damit O(1); erst die erste Mutation eines Mappings kopiert genau dieses
//! (`Arc::make_mut`). Mutations-Operationen arbeiten immer auf einem Klon und
//! geben ein neues Netzwerk zurück, unveränderte Mappings bleiben geteilt.

use std::fmt;
use std::sync::{Arc, OnceLock};

use glam::DVec2;
use indexmap::IndexMap;

use super::geometry::points_coincide;
use super::{Building, Link, Node, SpatialIndex, SpatialMatch, TransportRoute};
use crate::geo::Crs;

/// Präfix für importierte Node-IDs
pub const NODE_ID_PREFIX: &str = "node_";
/// Präfix für importierte Link-IDs
pub const LINK_ID_PREFIX: &str = "link_";
/// Präfix für gezeichnete Node-IDs
pub const USER_NODE_ID_PREFIX: &str = "user_node_";
/// Präfix für gezeichnete Link-IDs
pub const USER_LINK_ID_PREFIX: &str = "user_link_";

/// Vollständiges Straßennetz einer Import-/Editier-Sitzung
#[derive(Clone, Default)]
pub struct Network {
    nodes: Arc<IndexMap<String, Node>>,
    links: Arc<IndexMap<String, Link>>,
    routes: Arc<IndexMap<String, TransportRoute>>,
    buildings: Arc<IndexMap<String, Building>>,
    /// Projiziertes System aller gespeicherten Koordinaten
    crs: Crs,
    /// Lazy aufgebauter Spatial-Index, wird bei jeder Node-Mutation verworfen
    spatial_index: Arc<OnceLock<SpatialIndex>>,
}

impl Network {
    /// Erstellt ein leeres Netzwerk im angegebenen System
    pub fn new(crs: Crs) -> Self {
        Self {
            crs,
            ..Self::default()
        }
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn nodes(&self) -> &IndexMap<String, Node> {
        &self.nodes
    }

    pub fn links(&self) -> &IndexMap<String, Link> {
        &self.links
    }

    pub fn routes(&self) -> &IndexMap<String, TransportRoute> {
        &self.routes
    }

    pub fn buildings(&self) -> &IndexMap<String, Building> {
        &self.buildings
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Prüft ob zwei Netzwerke sich das Node-Mapping teilen (Structural Sharing)
    pub fn shares_nodes_with(&self, other: &Network) -> bool {
        Arc::ptr_eq(&self.nodes, &other.nodes)
    }

    /// Prüft ob zwei Netzwerke sich das Gebäude-Mapping teilen
    pub fn shares_buildings_with(&self, other: &Network) -> bool {
        Arc::ptr_eq(&self.buildings, &other.buildings)
    }

    // ── Mutation (nur auf eigenen Klonen) ───────────────────────────

    /// Fügt einen Node hinzu oder ersetzt ihn
    pub fn insert_node(&mut self, node: Node) {
        self.nodes_mut().insert(node.id.clone(), node);
    }

    /// Entfernt einen Node (ohne Link-Bereinigung, Reihenfolge bleibt erhalten)
    pub fn remove_node(&mut self, node_id: &str) -> Option<Node> {
        if !self.nodes.contains_key(node_id) {
            return None;
        }
        self.nodes_mut().shift_remove(node_id)
    }

    /// Setzt die Position eines bestehenden Nodes
    pub fn set_node_position(&mut self, node_id: &str, position: DVec2) -> bool {
        match self.nodes_mut().get_mut(node_id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Fügt einen Link hinzu oder ersetzt ihn
    pub fn insert_link(&mut self, link: Link) {
        Arc::make_mut(&mut self.links).insert(link.id.clone(), link);
    }

    pub fn remove_link(&mut self, link_id: &str) -> Option<Link> {
        if !self.links.contains_key(link_id) {
            return None;
        }
        Arc::make_mut(&mut self.links).shift_remove(link_id)
    }

    /// Veränderbarer Zugriff auf einen Link
    pub fn link_mut(&mut self, link_id: &str) -> Option<&mut Link> {
        if !self.links.contains_key(link_id) {
            return None;
        }
        Arc::make_mut(&mut self.links).get_mut(link_id)
    }

    pub fn insert_route(&mut self, route: TransportRoute) {
        Arc::make_mut(&mut self.routes).insert(route.id.clone(), route);
    }

    pub fn insert_building(&mut self, building: Building) {
        Arc::make_mut(&mut self.buildings).insert(building.id.clone(), building);
    }

    /// Entfernt alle Gebäude, für die `predicate` true liefert. Gibt die IDs zurück.
    pub fn remove_buildings_where<F>(&mut self, mut predicate: F) -> Vec<String>
    where
        F: FnMut(&Building) -> bool,
    {
        let doomed: Vec<String> = self
            .buildings
            .values()
            .filter(|b| predicate(b))
            .map(|b| b.id.clone())
            .collect();
        if !doomed.is_empty() {
            let buildings = Arc::make_mut(&mut self.buildings);
            for id in &doomed {
                buildings.shift_remove(id);
            }
        }
        doomed
    }

    fn nodes_mut(&mut self) -> &mut IndexMap<String, Node> {
        self.spatial_index = Arc::new(OnceLock::new());
        Arc::make_mut(&mut self.nodes)
    }

    // ── Topologie-Abfragen ──────────────────────────────────────────

    /// Alle Links, die am Node beginnen oder enden
    pub fn links_touching<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Link> + 'a {
        self.links.values().filter(move |link| link.touches(node_id))
    }

    /// Anzahl der Links, die am Node beginnen oder enden (geschlossene Links zählen einmal)
    pub fn endpoint_count(&self, node_id: &str) -> u32 {
        self.links_touching(node_id).count() as u32
    }

    /// Berechnet den Grad der angegebenen Nodes aus den Link-Endpunkten neu
    pub fn recount_degrees<'a, I>(&mut self, node_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let updates: Vec<(String, u32)> = node_ids
            .into_iter()
            .filter(|id| self.nodes.contains_key(*id))
            .map(|id| (id.to_string(), self.endpoint_count(id)))
            .collect();
        if updates.is_empty() {
            return;
        }
        let nodes = Arc::make_mut(&mut self.nodes);
        for (id, degree) in updates {
            if let Some(node) = nodes.get_mut(&id) {
                node.degree = degree;
            }
        }
    }

    /// Nächste freie ID für einen gezeichneten Node
    pub fn next_user_node_id(&self) -> String {
        next_free_id(USER_NODE_ID_PREFIX, self.nodes.keys())
    }

    /// Nächste freie ID für einen gezeichneten Link
    pub fn next_user_link_id(&self) -> String {
        next_free_id(USER_LINK_ID_PREFIX, self.links.keys())
    }

    // ── Spatial-Abfragen ────────────────────────────────────────────

    /// Read-only Spatial-Index (wird beim ersten Zugriff aufgebaut)
    pub fn spatial_index(&self) -> &SpatialIndex {
        self.spatial_index
            .get_or_init(|| SpatialIndex::from_nodes(&self.nodes, self.crs))
    }

    /// Findet den nächstgelegenen Node zur Position.
    pub fn nearest_node(&self, query: DVec2) -> Option<SpatialMatch> {
        self.spatial_index().nearest(query)
    }

    /// Findet alle Nodes innerhalb von `radius_m` Metern (aufsteigend nach Distanz).
    pub fn nodes_within_radius(&self, query: DVec2, radius_m: f64) -> Vec<SpatialMatch> {
        self.spatial_index().within_radius(query, radius_m)
    }

    // ── Konsistenz ──────────────────────────────────────────────────

    /// Prüft die Topologie-Invarianten und liefert alle Verstöße.
    ///
    /// - `from`/`to` jedes Links existieren als Node
    /// - erster/letzter Geometriepunkt liegen auf `from`/`to`
    /// - jeder Node mit mindestens einer Endpunkt-Referenz hat exakt diesen Grad
    ///
    /// Importierte Durchgangs-Stützpunkte ohne Endpunkt-Referenz behalten ihren
    /// Import-Grad und werden nicht geprüft.
    pub fn verify_topology(&self) -> Vec<TopologyViolation> {
        let mut violations = Vec::new();
        let mut endpoint_counts: IndexMap<&str, u32> = IndexMap::new();

        for link in self.links.values() {
            if link.geometry.len() < 2 {
                violations.push(TopologyViolation::ShortGeometry {
                    link_id: link.id.clone(),
                });
            }
            *endpoint_counts.entry(link.from.as_str()).or_default() += 1;
            if link.to != link.from {
                *endpoint_counts.entry(link.to.as_str()).or_default() += 1;
            }
            for (node_id, point) in [
                (&link.from, link.first_point()),
                (&link.to, link.last_point()),
            ] {
                match self.nodes.get(node_id) {
                    None => violations.push(TopologyViolation::MissingNode {
                        link_id: link.id.clone(),
                        node_id: node_id.clone(),
                    }),
                    Some(node) => {
                        if !point.is_some_and(|p| points_coincide(p, node.position)) {
                            violations.push(TopologyViolation::EndpointMismatch {
                                link_id: link.id.clone(),
                                node_id: node_id.clone(),
                            });
                        }
                    }
                }
            }
        }

        for (node_id, count) in endpoint_counts {
            if let Some(node) = self.nodes.get(node_id) {
                if node.degree != count {
                    violations.push(TopologyViolation::DegreeMismatch {
                        node_id: node_id.to_string(),
                        stored: node.degree,
                        actual: count,
                    });
                }
            }
        }

        violations
    }

    /// Kurzform: keine Topologie-Verstöße
    pub fn is_consistent(&self) -> bool {
        self.verify_topology().is_empty()
    }
}

impl PartialEq for Network {
    fn eq(&self, other: &Self) -> bool {
        self.crs == other.crs
            && self.nodes == other.nodes
            && self.links == other.links
            && self.routes == other.routes
            && self.buildings == other.buildings
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("crs", &self.crs)
            .field("nodes", &self.nodes.len())
            .field("links", &self.links.len())
            .field("routes", &self.routes.len())
            .field("buildings", &self.buildings.len())
            .finish()
    }
}

/// Ein einzelner Verstoß gegen die Topologie-Invarianten
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyViolation {
    /// Link verweist auf nicht existierenden Node
    MissingNode { link_id: String, node_id: String },
    /// Endpunkt der Geometrie liegt nicht auf dem referenzierten Node
    EndpointMismatch { link_id: String, node_id: String },
    /// Gespeicherter Grad weicht von der Zahl der Endpunkt-Referenzen ab
    DegreeMismatch {
        node_id: String,
        stored: u32,
        actual: u32,
    },
    /// Geometrie mit weniger als 2 Punkten
    ShortGeometry { link_id: String },
}

fn next_free_id<'a, I>(prefix: &str, existing: I) -> String
where
    I: Iterator<Item = &'a String>,
{
    let max = existing
        .filter_map(|id| id.strip_prefix(prefix)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{}{}", prefix, max + 1)
}
