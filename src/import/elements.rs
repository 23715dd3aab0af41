//! Rohdaten-Elemente einer Overpass-JSON-Antwort.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Tag-Bag eines Elements (`key → value`)
pub type Tags = BTreeMap<String, String>;

/// Ein einzelnes Element (`type` = `node`, `way` oder `relation`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node(PointElement),
    Way(WayElement),
    Relation(RelationElement),
}

impl Element {
    /// Externe ID des Elements
    pub fn id(&self) -> u64 {
        match self {
            Self::Node(point) => point.id,
            Self::Way(way) => way.id,
            Self::Relation(relation) => relation.id,
        }
    }
}

/// Punkt-Element mit geographischer Position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointElement {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: Tags,
}

impl PointElement {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Breite/Länge liegen im gültigen Wertebereich
    pub fn has_valid_position(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Way-Element mit geordneten Punkt-Referenzen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WayElement {
    pub id: u64,
    #[serde(default)]
    pub nodes: Vec<u64>,
    #[serde(default)]
    pub tags: Tags,
}

/// Relation-Element mit geordneten Member-Referenzen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationElement {
    pub id: u64,
    #[serde(default)]
    pub members: Vec<RelationMember>,
    #[serde(default)]
    pub tags: Tags,
}

/// Member einer Relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationMember {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "ref")]
    pub reference: u64,
    #[serde(default)]
    pub role: String,
}

impl RelationMember {
    pub fn is_way(&self) -> bool {
        self.kind == "way"
    }
}
