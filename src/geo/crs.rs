//! Koordinatenreferenzsysteme, Regionstabelle und automatische CRS-Erkennung.
//!
//! Alle regionalen Systeme sind an einer Stelle definiert ([`REGIONS`] für die
//! Erkennung, [`Crs::projection`] für die Projektionsparameter). Datumsübergänge
//! werden nicht modelliert: WGS84-Koordinaten werden direkt auf dem Ellipsoid
//! des Zielsystems projiziert.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use glam::DVec2;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::lambert::LambertConformalConic;
use super::stereographic::ObliqueStereographic;
use super::transverse_mercator::TransverseMercator;
use super::{
    euclidean_distance, haversine_distance, Ellipsoid, GeoBounds, GeoPoint, EARTH_MEAN_RADIUS_M,
};

/// Koordinatenreferenzsystem, identifiziert über seinen EPSG-Code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs(u32);

impl Crs {
    /// Geographisches WGS84 (Fallback, x = Länge, y = Breite)
    pub const WGS84: Self = Self(4326);
    /// Irish Transverse Mercator
    pub const IRISH_TM: Self = Self(2157);
    /// OSGB36 / British National Grid
    pub const BRITISH_NATIONAL_GRID: Self = Self(27700);
    /// Amersfoort / RD New
    pub const RD_NEW: Self = Self(28992);
    /// RGF93 / Lambert-93
    pub const LAMBERT_93: Self = Self(2154);
    /// ETRS89 / Portugal TM06
    pub const PORTUGAL_TM06: Self = Self(3763);
    /// RDN2008 / Italy zone
    pub const ITALY_ZONE: Self = Self(6875);

    /// Erstellt ein CRS aus einem EPSG-Code (ohne Prüfung auf Unterstützung).
    pub const fn from_epsg(code: u32) -> Self {
        Self(code)
    }

    /// ETRS89 / UTM-Zone (Europa, GRS80)
    pub const fn etrs89_utm(zone: u8) -> Self {
        Self(25800 + zone as u32)
    }

    /// WGS84 / UTM-Zone Nord
    pub const fn wgs84_utm_north(zone: u8) -> Self {
        Self(32600 + zone as u32)
    }

    pub fn epsg(&self) -> u32 {
        self.0
    }

    pub fn is_geographic(&self) -> bool {
        *self == Self::WGS84
    }

    pub fn is_supported(&self) -> bool {
        self.projection().is_ok()
    }

    /// Lesbarer Name des Systems
    pub fn name(&self) -> String {
        match self.0 {
            4326 => "WGS 84".to_string(),
            2157 => "IRENET95 / Irish Transverse Mercator".to_string(),
            27700 => "OSGB36 / British National Grid".to_string(),
            28992 => "Amersfoort / RD New".to_string(),
            2154 => "RGF93 v1 / Lambert-93".to_string(),
            3763 => "ETRS89 / Portugal TM06".to_string(),
            6875 => "RDN2008 / Italy zone".to_string(),
            code @ 25829..=25833 => format!("ETRS89 / UTM zone {}N", code - 25800),
            code @ 32601..=32660 => format!("WGS 84 / UTM zone {}N", code - 32600),
            code => format!("EPSG:{code}"),
        }
    }

    /// Projektionsparameter des Systems.
    pub fn projection(&self) -> Result<Projection> {
        let projection = match self.0 {
            4326 => Projection::Geographic,
            2157 => Projection::TransverseMercator(TransverseMercator {
                ellipsoid: Ellipsoid::GRS80,
                lat0: 53.5,
                lon0: -8.0,
                k0: 0.999_82,
                false_easting: 600_000.0,
                false_northing: 750_000.0,
            }),
            27700 => Projection::TransverseMercator(TransverseMercator {
                ellipsoid: Ellipsoid::AIRY_1830,
                lat0: 49.0,
                lon0: -2.0,
                k0: 0.999_601_271_7,
                false_easting: 400_000.0,
                false_northing: -100_000.0,
            }),
            28992 => Projection::ObliqueStereographic(ObliqueStereographic {
                ellipsoid: Ellipsoid::BESSEL_1841,
                lat0: 52.156_160_555_555_55,
                lon0: 5.387_638_888_888_89,
                k0: 0.999_907_9,
                false_easting: 155_000.0,
                false_northing: 463_000.0,
            }),
            2154 => Projection::LambertConformalConic(LambertConformalConic {
                ellipsoid: Ellipsoid::GRS80,
                lat0: 46.5,
                lon0: 3.0,
                lat1: 49.0,
                lat2: 44.0,
                false_easting: 700_000.0,
                false_northing: 6_600_000.0,
            }),
            3763 => Projection::TransverseMercator(TransverseMercator {
                ellipsoid: Ellipsoid::GRS80,
                lat0: 39.668_258_333_333_33,
                lon0: -8.133_108_333_333_33,
                k0: 1.0,
                false_easting: 0.0,
                false_northing: 0.0,
            }),
            6875 => Projection::TransverseMercator(TransverseMercator {
                ellipsoid: Ellipsoid::GRS80,
                lat0: 0.0,
                lon0: 12.5,
                k0: 0.9985,
                false_easting: 7_000_000.0,
                false_northing: 0.0,
            }),
            code @ 25829..=25833 => Projection::TransverseMercator(TransverseMercator::utm(
                Ellipsoid::GRS80,
                (code - 25800) as u8,
            )),
            code @ 32601..=32660 => Projection::TransverseMercator(TransverseMercator::utm(
                Ellipsoid::WGS84,
                (code - 32600) as u8,
            )),
            code => bail!("Nicht unterstütztes Koordinatensystem EPSG:{}", code),
        };
        Ok(projection)
    }

    /// Distanz zwischen zwei gespeicherten Koordinaten in Metern.
    ///
    /// Projizierte Systeme rechnen euklidisch, der geographische Fallback
    /// per Haversine (x = Länge, y = Breite).
    pub fn distance(&self, a: DVec2, b: DVec2) -> f64 {
        if self.is_geographic() {
            haversine_distance(GeoPoint::new(a.y, a.x), GeoPoint::new(b.y, b.x))
        } else {
            euclidean_distance(a, b)
        }
    }

    /// Suchradius in gespeicherten Einheiten, der `meters` um `at` vollständig abdeckt.
    ///
    /// Im geographischen Fallback wird der Radius über die Länge in Grad
    /// umgerechnet (der Längengrad ist zu den Polen hin kürzer als der
    /// Breitengrad, daher bestimmt er den Radius).
    pub fn search_radius(&self, at: DVec2, meters: f64) -> f64 {
        if !self.is_geographic() {
            return meters;
        }
        let meters_per_degree = EARTH_MEAN_RADIUS_M.to_radians();
        let lon_scale = at.y.to_radians().cos().abs().max(MIN_LON_SCALE);
        (meters / (meters_per_degree * lon_scale)).min(360.0)
    }
}

/// Untergrenze für cos(Breite) nahe der Pole
const MIN_LON_SCALE: f64 = 1e-3;

impl Default for Crs {
    fn default() -> Self {
        Self::WGS84
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

impl FromStr for Crs {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let code = trimmed
            .strip_prefix("EPSG:")
            .or_else(|| trimmed.strip_prefix("epsg:"))
            .unwrap_or(trimmed);
        let code = code
            .parse::<u32>()
            .with_context(|| format!("Ungueltiger CRS-Bezeichner '{}'", s))?;
        Ok(Self(code))
    }
}

impl Serialize for Crs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Crs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Konkrete Projektion eines CRS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Identität mit Achsentausch (x = Länge, y = Breite)
    Geographic,
    TransverseMercator(TransverseMercator),
    LambertConformalConic(LambertConformalConic),
    ObliqueStereographic(ObliqueStereographic),
}

impl Projection {
    /// Geographisch → projiziert
    pub fn forward(&self, geo: GeoPoint) -> DVec2 {
        match self {
            Self::Geographic => DVec2::new(geo.lon, geo.lat),
            Self::TransverseMercator(p) => p.forward(geo),
            Self::LambertConformalConic(p) => p.forward(geo),
            Self::ObliqueStereographic(p) => p.forward(geo),
        }
    }

    /// Projiziert → geographisch
    pub fn inverse(&self, projected: DVec2) -> GeoPoint {
        match self {
            Self::Geographic => GeoPoint::new(projected.y, projected.x),
            Self::TransverseMercator(p) => p.inverse(projected),
            Self::LambertConformalConic(p) => p.inverse(projected),
            Self::ObliqueStereographic(p) => p.inverse(projected),
        }
    }
}

/// Projiziert eine geographische Position in das Zielsystem.
pub fn to_projected(lat: f64, lon: f64, crs: Crs) -> Result<DVec2> {
    Ok(crs.projection()?.forward(GeoPoint::new(lat, lon)))
}

/// Rechnet eine projizierte Position in geographische Koordinaten zurück.
pub fn to_geographic(x: f64, y: f64, crs: Crs) -> Result<GeoPoint> {
    Ok(crs.projection()?.inverse(DVec2::new(x, y)))
}

/// Zuordnung einer Region zu ihrem Koordinatensystem.
#[derive(Debug, Clone, Copy)]
enum RegionCrs {
    Fixed(Crs),
    /// UTM-Zone aus dem Längengrad des Mittelpunkts (WGS84, Nord)
    UtmBand,
}

#[derive(Debug, Clone, Copy)]
struct RegionEntry {
    name: &'static str,
    bounds: GeoBounds,
    crs: RegionCrs,
}

/// Handabgestimmte Regionsrechtecke; erster Treffer gewinnt (Reihenfolge relevant
/// bei Überlappungen, z.B. Portugal vor Spanien, Niederlande vor Deutschland).
const REGIONS: &[RegionEntry] = &[
    RegionEntry {
        name: "Ireland",
        bounds: GeoBounds::new(51.3, -10.7, 55.5, -5.9),
        crs: RegionCrs::Fixed(Crs::IRISH_TM),
    },
    RegionEntry {
        name: "United Kingdom",
        bounds: GeoBounds::new(49.8, -8.7, 60.9, 1.9),
        crs: RegionCrs::Fixed(Crs::BRITISH_NATIONAL_GRID),
    },
    RegionEntry {
        name: "Netherlands",
        bounds: GeoBounds::new(50.7, 3.3, 53.6, 7.3),
        crs: RegionCrs::Fixed(Crs::RD_NEW),
    },
    RegionEntry {
        name: "Portugal",
        bounds: GeoBounds::new(36.9, -9.6, 42.2, -6.2),
        crs: RegionCrs::Fixed(Crs::PORTUGAL_TM06),
    },
    RegionEntry {
        name: "Spain",
        bounds: GeoBounds::new(35.9, -9.4, 43.8, 3.4),
        crs: RegionCrs::Fixed(Crs::etrs89_utm(30)),
    },
    RegionEntry {
        name: "France",
        bounds: GeoBounds::new(41.3, -5.2, 51.1, 9.6),
        crs: RegionCrs::Fixed(Crs::LAMBERT_93),
    },
    RegionEntry {
        name: "Germany",
        bounds: GeoBounds::new(47.2, 5.8, 55.1, 15.1),
        crs: RegionCrs::Fixed(Crs::etrs89_utm(32)),
    },
    RegionEntry {
        name: "Italy",
        bounds: GeoBounds::new(36.6, 6.6, 47.1, 18.6),
        crs: RegionCrs::Fixed(Crs::ITALY_ZONE),
    },
    RegionEntry {
        name: "Continental USA",
        bounds: GeoBounds::new(24.4, -125.0, 49.5, -66.9),
        crs: RegionCrs::UtmBand,
    },
];

/// Wählt das regionale projizierte System für eine geographische Bounding-Box.
///
/// Maßgeblich ist der Mittelpunkt der Box. Liegt er in keiner bekannten Region,
/// wird WGS84 unverändert zurückgegeben und eine Warnung geloggt.
pub fn detect_projected_crs(bounds: &GeoBounds) -> Crs {
    let center = bounds.center();

    for region in REGIONS {
        if !region.bounds.contains(center) {
            continue;
        }
        let crs = match region.crs {
            RegionCrs::Fixed(crs) => crs,
            RegionCrs::UtmBand => Crs::wgs84_utm_north(utm_zone(center.lon)),
        };
        log::info!(
            "CRS-Erkennung: Region {} → {} ({})",
            region.name,
            crs,
            crs.name()
        );
        return crs;
    }

    log::warn!(
        "CRS-Erkennung: keine Region für Mittelpunkt ({:.5}, {:.5}), verwende geographisches {}",
        center.lat,
        center.lon,
        Crs::WGS84
    );
    Crs::WGS84
}

/// UTM-Zone (1..=60) zu einem Längengrad
fn utm_zone(lon: f64) -> u8 {
    let zone = ((lon + 180.0) / 6.0).floor() as i64 + 1;
    zone.clamp(1, 60) as u8
}
