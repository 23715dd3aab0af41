//! Repräsentiert eine gerichtete Kante zwischen zwei Nodes.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geo::Crs;

/// Attribute eines Links (aus OSM-Tags oder vom Benutzer vergeben)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkTags {
    /// Straßenklasse (`highway=*`)
    pub road_class: String,
    /// Anzahl Fahrstreifen
    pub lanes: Option<u32>,
    /// Zulässige Höchstgeschwindigkeit in km/h
    pub max_speed_kmh: Option<u32>,
    /// Einbahnstraße
    pub oneway: bool,
    /// Straßenname
    pub name: Option<String>,
}

impl LinkTags {
    pub fn new(road_class: impl Into<String>) -> Self {
        Self {
            road_class: road_class.into(),
            ..Self::default()
        }
    }
}

/// Eine Kante mit geordneter Geometrie (mindestens 2 Punkte).
///
/// `geometry[0]` liegt immer auf dem `from`-Node, `geometry[last]` auf dem `to`-Node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Eindeutige ID im Netzwerk (z.B. `link_42`)
    pub id: String,
    /// ID des Ursprungs-Ways in den Rohdaten
    pub origin_id: Option<u64>,
    /// Geordnete Geometrie im projizierten System
    pub geometry: Vec<DVec2>,
    /// Start-Node-ID
    pub from: String,
    /// End-Node-ID
    pub to: String,
    pub tags: LinkTags,
    /// Im aktuellen Editier-Vorgang gezeichnet (nur solche Links sind löschbar)
    #[serde(default)]
    pub user_created: bool,
}

impl Link {
    /// Erstellt einen neuen Link
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        geometry: Vec<DVec2>,
        tags: LinkTags,
    ) -> Self {
        Self {
            id: id.into(),
            origin_id: None,
            geometry,
            from: from.into(),
            to: to.into(),
            tags,
            user_created: false,
        }
    }

    /// Prüft ob der Link am Node beginnt oder endet
    pub fn touches(&self, node_id: &str) -> bool {
        self.from == node_id || self.to == node_id
    }

    pub fn first_point(&self) -> Option<DVec2> {
        self.geometry.first().copied()
    }

    pub fn last_point(&self) -> Option<DVec2> {
        self.geometry.last().copied()
    }

    /// Physikalische Länge in Metern (Summe der Segmentlängen)
    pub fn length(&self, crs: Crs) -> f64 {
        self.geometry
            .windows(2)
            .map(|pair| crs.distance(pair[0], pair[1]))
            .sum()
    }
}
