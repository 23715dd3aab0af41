//! Core-Domänentypen: Nodes, Links, Linien, Gebäude, Netzwerk, Spatial-Index.

pub mod building;
pub mod geometry;
pub mod link;
/// Core-Datenmodelle des Straßennetzes
///
/// - Network: Container für alle Nodes, Links, ÖV-Linien und Gebäude
/// - Node: Knoten mit projizierter Position und Grad
/// - Link: Gerichtete Kante mit Geometrie und Tags
pub mod network;
pub mod node;
pub mod spatial;
pub mod transport_route;

pub use building::{Building, BuildingType};
pub use link::{Link, LinkTags};
pub use network::{Network, TopologyViolation};
pub use node::Node;
pub use spatial::{SpatialIndex, SpatialMatch};
pub use transport_route::{RouteTags, TransportRoute};

/// Toleranz für Positionsvergleiche (Durchgangs-Stützpunkte, Endpunkt-Prüfung)
pub const POSITION_EPSILON: f64 = 1e-6;
