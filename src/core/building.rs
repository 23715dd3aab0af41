//! Klassifizierte Gebäude/POIs aus den Rohdaten (read-only).

use std::collections::BTreeMap;
use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Geschlossene Menge der unterstützten Gebäudetypen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    Retail,
    Apartments,
    Supermarket,
    School,
    Kindergarten,
    Parking,
}

impl BuildingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retail => "retail",
            Self::Apartments => "apartments",
            Self::Supermarket => "supermarket",
            Self::School => "school",
            Self::Kindergarten => "kindergarten",
            Self::Parking => "parking",
        }
    }
}

impl fmt::Display for BuildingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ein Gebäude mit repräsentativer Position und optionalem Umriss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub origin_id: Option<u64>,
    /// Repräsentative Position (Punkt oder Schwerpunkt des Umrisses)
    pub position: DVec2,
    /// Umriss im projizierten System (mindestens 3 Punkte)
    pub polygon: Option<Vec<DVec2>>,
    pub kind: BuildingType,
    /// Vollständige Roh-Tags
    pub tags: BTreeMap<String, String>,
}
