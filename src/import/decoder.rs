//! Decoder: Overpass-JSON → [`Network`].
//!
//! Ablauf:
//! 1. Punkte und Ways nach externer ID indizieren, Straßen-Referenzen je Punkt zählen
//! 2. Straßen-Ways → Links + Nodes (alle referenzierten Punkte, nicht nur Endpunkte)
//! 3. ÖV-Relationen → ein [`TransportRoute`] je Member-Way
//! 4. Getaggte Punkte und Nicht-Straßen-Ways → Gebäude
//!
//! Fehlerhafte Einzel-Elemente werden verworfen (debug-Log + Zähler), nur eine
//! strukturell ungültige Antwort ist ein Fehler.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use glam::DVec2;
use serde::Deserialize;

use super::classify;
use super::elements::{Element, PointElement, RelationElement, Tags, WayElement};
use crate::core::network::{LINK_ID_PREFIX, NODE_ID_PREFIX};
use crate::core::{geometry, Building, Link, LinkTags, Network, Node, RouteTags, TransportRoute};
use crate::geo::{detect_projected_crs, Crs, GeoBounds, Projection};

/// Zusammenfassung eines Imports
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// Gewähltes projiziertes System
    pub crs: Crs,
    /// Geographische Ausdehnung aller gültigen Punkte
    pub bounds: Option<GeoBounds>,
    pub links: usize,
    pub nodes: usize,
    pub routes: usize,
    pub buildings: usize,
    /// Verworfene Elemente (fehlerhaft oder zu wenig auflösbare Punkte)
    pub dropped_elements: usize,
    /// Nicht auflösbare Punkt-Referenzen in sonst gültigen Ways
    pub dropped_references: usize,
}

#[derive(Deserialize)]
struct RawResponse {
    elements: Vec<serde_json::Value>,
}

/// Zerlegt die Antwort in Elemente; liefert zusätzlich die Zahl fehlerhafter Einträge.
pub fn parse_elements(json: &str) -> Result<(Vec<Element>, usize)> {
    let raw: RawResponse = serde_json::from_str(json)
        .context("Ungueltige Overpass-Antwort: erwartet { \"elements\": [...] }")?;

    let mut malformed = 0usize;
    let elements = raw
        .elements
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Element>(value) {
            Ok(element) => Some(element),
            Err(e) => {
                log::debug!("Fehlerhaftes Element verworfen: {}", e);
                malformed += 1;
                None
            }
        })
        .collect();

    Ok((elements, malformed))
}

/// Importiert eine Overpass-Antwort; das projizierte System wird automatisch gewählt.
pub fn import_overpass_json(json: &str) -> Result<(Network, ImportReport)> {
    let (elements, malformed) = parse_elements(json)?;
    let crs = match point_bounds(&elements) {
        Some(bounds) => detect_projected_crs(&bounds),
        None => {
            log::warn!("Import ohne gültige Punkte, verwende {}", Crs::WGS84);
            Crs::WGS84
        }
    };
    finish(&elements, crs, malformed)
}

/// Importiert eine Overpass-Antwort in ein vorgegebenes System.
pub fn import_overpass_json_with_crs(json: &str, crs: Crs) -> Result<(Network, ImportReport)> {
    let (elements, malformed) = parse_elements(json)?;
    finish(&elements, crs, malformed)
}

fn finish(elements: &[Element], crs: Crs, malformed: usize) -> Result<(Network, ImportReport)> {
    let (network, mut report) = decode_elements(elements, crs)?;
    report.dropped_elements += malformed;
    log::info!(
        "Import abgeschlossen ({}): {} Links, {} Nodes, {} Linien, {} Gebäude, {} verworfen",
        report.crs,
        report.links,
        report.nodes,
        report.routes,
        report.buildings,
        report.dropped_elements
    );
    Ok((network, report))
}

/// Geographische Ausdehnung aller gültigen Punkt-Elemente
pub fn point_bounds(elements: &[Element]) -> Option<GeoBounds> {
    GeoBounds::from_points(elements.iter().filter_map(|element| match element {
        Element::Node(point) if point.has_valid_position() => Some(point.position()),
        _ => None,
    }))
}

/// Baut das Netzwerk aus bereits zerlegten Elementen.
pub fn decode_elements(elements: &[Element], crs: Crs) -> Result<(Network, ImportReport)> {
    let projection = crs
        .projection()
        .with_context(|| format!("Import in {} nicht möglich", crs))?;

    let mut decoder = Decoder::new(elements, projection);
    let mut network = Network::new(crs);

    decoder.decode_roads(&mut network);
    decoder.decode_routes(&mut network);
    decoder.decode_buildings(&mut network);

    let report = ImportReport {
        crs,
        bounds: point_bounds(elements),
        links: network.link_count(),
        nodes: network.node_count(),
        routes: network.route_count(),
        buildings: network.building_count(),
        dropped_elements: decoder.dropped_elements,
        dropped_references: decoder.dropped_references,
    };
    Ok((network, report))
}

struct Decoder<'a> {
    projection: Projection,
    /// Projizierte Positionen aller gültigen Punkte
    points: HashMap<u64, (&'a PointElement, DVec2)>,
    ways: HashMap<u64, &'a WayElement>,
    road_ways: Vec<(&'a WayElement, &'a str)>,
    other_ways: Vec<&'a WayElement>,
    relations: Vec<&'a RelationElement>,
    /// Zahl der Straßen-Ways je Punkt (wird Node-Grad)
    road_refs: HashMap<u64, u32>,
    dropped_elements: usize,
    dropped_references: usize,
}

impl<'a> Decoder<'a> {
    fn new(elements: &'a [Element], projection: Projection) -> Self {
        let mut decoder = Self {
            projection,
            points: HashMap::new(),
            ways: HashMap::new(),
            road_ways: Vec::new(),
            other_ways: Vec::new(),
            relations: Vec::new(),
            road_refs: HashMap::new(),
            dropped_elements: 0,
            dropped_references: 0,
        };

        for element in elements {
            match element {
                Element::Node(point) => {
                    if point.has_valid_position() {
                        let position = decoder.projection.forward(point.position());
                        decoder.points.insert(point.id, (point, position));
                    } else {
                        log::debug!(
                            "Punkt {} mit ungültiger Position ({}, {}) verworfen",
                            point.id,
                            point.lat,
                            point.lon
                        );
                        decoder.dropped_elements += 1;
                    }
                }
                Element::Way(way) => {
                    decoder.ways.insert(way.id, way);
                    match classify::road_class(&way.tags) {
                        Some(class) => decoder.road_ways.push((way, class)),
                        None => decoder.other_ways.push(way),
                    }
                }
                Element::Relation(relation) => decoder.relations.push(relation),
            }
        }

        for (way, _) in &decoder.road_ways {
            let unique: HashSet<u64> = way.nodes.iter().copied().collect();
            for point_id in unique {
                *decoder.road_refs.entry(point_id).or_default() += 1;
            }
        }

        decoder
    }

    /// Löst die Punkt-Referenzen eines Ways auf (nicht auflösbare werden übersprungen)
    fn resolve(&self, way: &WayElement) -> (Vec<u64>, Vec<DVec2>, usize) {
        let mut ids = Vec::with_capacity(way.nodes.len());
        let mut geometry = Vec::with_capacity(way.nodes.len());
        let mut missing = 0;
        for point_id in &way.nodes {
            match self.points.get(point_id) {
                Some((_, position)) => {
                    ids.push(*point_id);
                    geometry.push(*position);
                }
                None => missing += 1,
            }
        }
        (ids, geometry, missing)
    }

    fn decode_roads(&mut self, network: &mut Network) {
        let road_ways = std::mem::take(&mut self.road_ways);

        for (way, class) in &road_ways {
            let (ids, geometry, missing) = self.resolve(way);
            if geometry.len() < 2 {
                log::debug!(
                    "Way {} verworfen: nur {} auflösbare Punkte",
                    way.id,
                    geometry.len()
                );
                self.dropped_elements += 1;
                continue;
            }
            if missing > 0 {
                log::debug!("Way {}: {} Punkt-Referenzen nicht auflösbar", way.id, missing);
                self.dropped_references += missing;
            }

            for point_id in &ids {
                let node_id = node_id(*point_id);
                if network.node(&node_id).is_some() {
                    continue;
                }
                if let Some((_, position)) = self.points.get(point_id) {
                    let degree = self.road_refs.get(point_id).copied().unwrap_or(0).max(1);
                    network.insert_node(Node::new(node_id, Some(*point_id), *position, degree));
                }
            }

            let (Some(first), Some(last)) = (ids.first(), ids.last()) else {
                continue;
            };
            let mut link = Link::new(
                format!("{}{}", LINK_ID_PREFIX, way.id),
                node_id(*first),
                node_id(*last),
                geometry,
                link_tags(class, &way.tags),
            );
            link.origin_id = Some(way.id);
            network.insert_link(link);
        }

        self.road_ways = road_ways;
    }

    fn decode_routes(&mut self, network: &mut Network) {
        let mut dropped = 0usize;
        for relation in &self.relations {
            let Some(kind) = classify::transit_route_kind(&relation.tags) else {
                continue;
            };
            let tags = route_tags(kind, &relation.tags);

            for member in relation.members.iter().filter(|m| m.is_way()) {
                let Some(way) = self.ways.get(&member.reference) else {
                    log::debug!(
                        "Relation {}: Way {} nicht in der Antwort",
                        relation.id,
                        member.reference
                    );
                    dropped += 1;
                    continue;
                };
                let (_, geometry, _) = self.resolve(way);
                if geometry.len() < 2 {
                    dropped += 1;
                    continue;
                }
                network.insert_route(TransportRoute {
                    id: format!("route_{}_{}", relation.id, way.id),
                    relation_id: relation.id,
                    way_id: way.id,
                    geometry: vec![geometry],
                    tags: tags.clone(),
                });
            }
        }
        self.dropped_references += dropped;
    }

    fn decode_buildings(&mut self, network: &mut Network) {
        let mut points: Vec<&(&PointElement, DVec2)> = self.points.values().collect();
        points.sort_by_key(|(point, _)| point.id);

        for (point, position) in points {
            if point.tags.is_empty() {
                continue;
            }
            if let Some(kind) = classify::building_type(&point.tags) {
                network.insert_building(Building {
                    id: format!("building_node_{}", point.id),
                    origin_id: Some(point.id),
                    position: *position,
                    polygon: None,
                    kind,
                    tags: point.tags.clone(),
                });
            }
        }

        let mut dropped = 0usize;
        for way in &self.other_ways {
            if way.tags.is_empty() {
                continue;
            }
            let Some(kind) = classify::building_type(&way.tags) else {
                continue;
            };
            let (_, polygon, _) = self.resolve(way);
            let Some(position) = (polygon.len() >= 3)
                .then(|| geometry::centroid(&polygon))
                .flatten()
            else {
                log::debug!(
                    "Gebäude-Way {} verworfen: nur {} auflösbare Punkte",
                    way.id,
                    polygon.len()
                );
                dropped += 1;
                continue;
            };
            network.insert_building(Building {
                id: format!("building_way_{}", way.id),
                origin_id: Some(way.id),
                position,
                polygon: Some(polygon),
                kind,
                tags: way.tags.clone(),
            });
        }
        self.dropped_elements += dropped;
    }
}

fn node_id(point_id: u64) -> String {
    format!("{}{}", NODE_ID_PREFIX, point_id)
}

fn link_tags(class: &str, tags: &Tags) -> LinkTags {
    LinkTags {
        road_class: class.to_string(),
        lanes: tags.get("lanes").and_then(|v| classify::parse_leading_int(v)),
        max_speed_kmh: tags
            .get("maxspeed")
            .and_then(|v| classify::parse_leading_int(v)),
        oneway: classify::is_oneway(tags),
        name: tags.get("name").cloned(),
    }
}

fn route_tags(kind: &str, tags: &Tags) -> RouteTags {
    RouteTags {
        kind: kind.to_string(),
        reference: tags.get("ref").cloned(),
        name: tags.get("name").cloned(),
        operator: tags.get("operator").cloned(),
        colour: tags.get("colour").cloned(),
    }
}

#[cfg(test)]
mod tests;
