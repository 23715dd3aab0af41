//! Spatial-Index (KD-Tree) für Node-Abfragen mit Abständen in Metern.
//!
//! Der Baum arbeitet auf den gespeicherten Koordinaten. Im geographischen
//! Fallback (Grad) wird der Meter-Radius für die Baumsuche in Grad umgerechnet
//! und jeder Kandidat anschließend per [`Crs::distance`] nachgefiltert.

use glam::DVec2;
use indexmap::IndexMap;
use kiddo::{KdTree, SquaredEuclidean};

use crate::core::Node;
use crate::geo::Crs;

/// Ergebnis einer Distanzabfrage gegen den Spatial-Index.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialMatch {
    pub node_id: String,
    /// Abstand zum Suchpunkt in Metern
    pub distance: f64,
}

/// Read-only Spatial-Index über allen Nodes eines Netzwerks.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: KdTree<f64, 2>,
    entries: Vec<(String, DVec2)>,
    crs: Crs,
}

impl SpatialIndex {
    pub fn empty(crs: Crs) -> Self {
        Self::from_nodes(&IndexMap::new(), crs)
    }

    /// Baut den Index über alle Nodes; Positionen im System `crs`.
    pub fn from_nodes(nodes: &IndexMap<String, Node>, crs: Crs) -> Self {
        let entries: Vec<(String, DVec2)> = nodes
            .values()
            .map(|node| (node.id.clone(), node.position))
            .collect();
        let points: Vec<[f64; 2]> = entries.iter().map(|(_, p)| [p.x, p.y]).collect();

        Self {
            tree: (&points).into(),
            entries,
            crs,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Nächster Node im gespeicherten Koordinatenraum, Abstand in Metern.
    pub fn nearest(&self, query: DVec2) -> Option<SpatialMatch> {
        if self.is_empty() {
            return None;
        }
        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[query.x, query.y]);
        self.to_match(result.item, query)
    }

    /// Alle Nodes mit höchstens `radius_m` Metern Abstand, aufsteigend sortiert.
    pub fn within_radius(&self, query: DVec2, radius_m: f64) -> Vec<SpatialMatch> {
        if self.is_empty() || radius_m.is_sign_negative() {
            return Vec::new();
        }

        let search = self.crs.search_radius(query, radius_m);
        let mut results: Vec<SpatialMatch> = self
            .tree
            .within::<SquaredEuclidean>(&[query.x, query.y], search * search)
            .into_iter()
            .filter_map(|entry| self.to_match(entry.item, query))
            .filter(|m| m.distance <= radius_m)
            .collect();

        results.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.node_id.cmp(&b.node_id))
        });
        results
    }

    fn to_match(&self, item: u64, query: DVec2) -> Option<SpatialMatch> {
        let (node_id, position) = self.entries.get(item as usize)?;
        Some(SpatialMatch {
            node_id: node_id.clone(),
            distance: self.crs.distance(query, *position),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_nodes() -> IndexMap<String, Node> {
        [
            Node::new("a", None, DVec2::new(0.0, 0.0), 1),
            Node::new("b", None, DVec2::new(10.0, 0.0), 1),
            Node::new("c", None, DVec2::new(4.0, 3.0), 1),
        ]
        .into_iter()
        .map(|node| (node.id.clone(), node))
        .collect()
    }

    #[test]
    fn nearest_returns_expected_node() {
        let index = SpatialIndex::from_nodes(&sample_nodes(), Crs::etrs89_utm(32));
        let nearest = index
            .nearest(DVec2::new(3.9, 2.9))
            .expect("Treffer erwartet");

        assert_eq!(nearest.node_id, "c");
        assert!(nearest.distance < 0.2);
    }

    #[test]
    fn radius_query_returns_sorted_matches() {
        let index = SpatialIndex::from_nodes(&sample_nodes(), Crs::etrs89_utm(32));
        let matches = index.within_radius(DVec2::new(0.0, 0.0), 6.0);

        let ids: Vec<String> = matches.into_iter().map(|m| m.node_id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn empty_index_has_no_entries() {
        let index = SpatialIndex::empty(Crs::WGS84);

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert!(index.nearest(DVec2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn geographic_radius_is_measured_in_meters() {
        // Sydney: b liegt ~1112 m südlich, c ~5,6 m östlich von a
        let nodes: IndexMap<String, Node> = [
            Node::new("a", None, DVec2::new(151.0, -33.0), 1),
            Node::new("b", None, DVec2::new(151.0, -33.01), 1),
            Node::new("c", None, DVec2::new(151.00006, -33.0), 1),
        ]
        .into_iter()
        .map(|node| (node.id.clone(), node))
        .collect();
        let index = SpatialIndex::from_nodes(&nodes, Crs::WGS84);

        let matches = index.within_radius(DVec2::new(151.0, -33.0), 10.0);
        let ids: Vec<&str> = matches.iter().map(|m| m.node_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(matches[1].distance > 5.0 && matches[1].distance < 6.0);

        let far = index.within_radius(DVec2::new(151.0, -33.0), 1_200.0);
        assert_eq!(far.len(), 3);
        assert!(far[2].distance > 1_100.0);
    }
}
