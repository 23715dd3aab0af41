//! ÖV-Linien aus Route-Relationen (read-only für den Editor).

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Attribute einer ÖV-Linie
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteTags {
    /// Verkehrsmittel (`route=bus`, `tram`, ...)
    pub kind: String,
    /// Liniennummer (`ref`)
    pub reference: Option<String>,
    pub name: Option<String>,
    pub operator: Option<String>,
    /// Linienfarbe (`colour`)
    pub colour: Option<String>,
}

/// Ein Abschnitt einer ÖV-Linie.
///
/// Eine Relation liefert pro Member-Way einen eigenen Eintrag (`route_<rel>_<way>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportRoute {
    pub id: String,
    pub relation_id: u64,
    pub way_id: u64,
    /// Linienzüge im projizierten System (ggf. mehrere disjunkte)
    pub geometry: Vec<Vec<DVec2>>,
    pub tags: RouteTags,
}
