//! XML-Export für Simulations-Netzwerke.
//!
//! Das Zielformat ist MATSim `network_v2`: Nodes mit projizierten x/y-Koordinaten,
//! Links mit Länge, Freifluss-Geschwindigkeit, Kapazität und Fahrstreifen.

pub mod writer;

pub use writer::{link_length, write_network_xml, NETWORK_V2_DOCTYPE, REVERSE_LINK_SUFFIX};
