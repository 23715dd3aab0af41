//! Koordinaten-Projektion: geographisch (WGS84) ⇔ regionale projizierte Systeme.
//!
//! Alle gespeicherten Geometrien liegen im projizierten System des Netzwerks
//! (x = Ostwert, y = Nordwert, Einheit Meter). Importer und Exporter rechnen
//! an den Grenzen um. Im geographischen Fallback gilt x = Länge, y = Breite.

pub mod bounds;
pub mod crs;
pub mod distance;
pub mod ellipsoid;
mod lambert;
mod stereographic;
mod transverse_mercator;

pub use bounds::{GeoBounds, GeoPoint};
pub use crs::{detect_projected_crs, to_geographic, to_projected, Crs, Projection};
pub use distance::{euclidean_distance, haversine_distance, EARTH_MEAN_RADIUS_M};
pub use ellipsoid::Ellipsoid;
