//! OSM Network Editor Library.
//! Import von OSM-Straßendaten, topologisches Editieren und Export als
//! Simulations-Netzwerk. Core-Funktionalität als Library exportiert für Tests
//! und Wiederverwendung.

pub mod app;
pub mod core;
pub mod geo;
pub mod import;
pub mod shared;
pub mod stream;
pub mod xml;

pub use app::{EditHistory, EditorSession, ImportMeta, UndoStack};
pub use core::{Building, BuildingType, Link, LinkTags, Network, Node, TransportRoute};
pub use core::{SpatialIndex, SpatialMatch, TopologyViolation};
pub use geo::{Crs, GeoBounds, GeoPoint};
pub use import::{import_overpass_json, ImportReport};
pub use shared::EditorOptions;
pub use stream::{SimulationEvent, SseDecoder};
pub use xml::write_network_xml;
