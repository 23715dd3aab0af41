//! Repräsentiert einen Knoten des Straßennetzes.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Ein Knoten (Kreuzung, Endpunkt oder Durchgangs-Stützpunkt)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Eindeutige ID im Netzwerk (z.B. `node_123`)
    pub id: String,
    /// ID des Ursprungselements in den Rohdaten (fehlt bei gezeichneten Nodes)
    pub origin_id: Option<u64>,
    /// Position im projizierten System des Netzwerks
    pub position: DVec2,
    /// Anzahl der Links, die an diesem Node enden
    pub degree: u32,
    /// Im aktuellen Editier-Vorgang erzeugt
    #[serde(default)]
    pub user_created: bool,
}

impl Node {
    /// Erstellt einen neuen importierten Node
    pub fn new(id: impl Into<String>, origin_id: Option<u64>, position: DVec2, degree: u32) -> Self {
        Self {
            id: id.into(),
            origin_id,
            position,
            degree,
            user_created: false,
        }
    }

    /// Erstellt einen im Editor gezeichneten Node
    pub fn user_created(id: impl Into<String>, position: DVec2) -> Self {
        Self {
            id: id.into(),
            origin_id: None,
            position,
            degree: 0,
            user_created: true,
        }
    }
}
