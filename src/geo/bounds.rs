//! Geographische Punkte und Bounding-Boxen (WGS84, Grad).

use serde::{Deserialize, Serialize};

/// Meter pro Breitengrad (Näherung für Radius-Boxen)
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Geographischer Punkt in Grad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Breite
    pub lat: f64,
    /// Länge
    pub lon: f64,
}

impl GeoPoint {
    /// Erstellt einen neuen Punkt aus Breite/Länge
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Achsenparalleles Rechteck in geographischen Koordinaten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    pub const fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Box, die genau einen Punkt umschließt
    pub fn from_point(point: GeoPoint) -> Self {
        Self::new(point.lat, point.lon, point.lat, point.lon)
    }

    /// Kleinste Box um alle Punkte; `None` bei leerer Eingabe.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Quadratische Näherungs-Box um einen Mittelpunkt mit Radius in Metern.
    pub fn from_center_radius(center: GeoPoint, radius_m: f64) -> Self {
        let dlat = radius_m / METERS_PER_DEGREE_LAT;
        let cos_lat = center.lat.to_radians().cos().max(1e-6);
        let dlon = dlat / cos_lat;
        Self::new(
            center.lat - dlat,
            center.lon - dlon,
            center.lat + dlat,
            center.lon + dlon,
        )
    }

    /// Erweitert die Box um einen Punkt
    pub fn extend(&mut self, point: GeoPoint) {
        self.min_lat = self.min_lat.min(point.lat);
        self.min_lon = self.min_lon.min(point.lon);
        self.max_lat = self.max_lat.max(point.lat);
        self.max_lon = self.max_lon.max(point.lon);
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) * 0.5,
            (self.min_lon + self.max_lon) * 0.5,
        )
    }

    /// Prüft ob ein Punkt innerhalb liegt (Ränder inklusive)
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }
}
