//! Transversale Mercator-Projektion (Krüger-Reihen, 3. Ordnung in n).
//!
//! Deckt ITM, British National Grid, PT-TM06, Italy Zone und alle UTM-Zonen ab.
//! Die Rückrechnung der Breite erfolgt exakt über die isometrische Breite.

use glam::DVec2;

use super::ellipsoid::{isometric_latitude, latitude_from_isometric};
use super::{Ellipsoid, GeoPoint};

/// Parameter einer TM-Projektion (Winkel in Grad).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    pub ellipsoid: Ellipsoid,
    pub lat0: f64,
    pub lon0: f64,
    pub k0: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

struct Series {
    /// Rektifizierender Radius A
    radius: f64,
    alpha: [f64; 3],
    beta: [f64; 3],
    e: f64,
    /// ξ am Ursprungsbreitengrad (verschiebt den Nordwert)
    xi0: f64,
}

impl TransverseMercator {
    /// UTM-Zone (Nordhalbkugel)
    pub fn utm(ellipsoid: Ellipsoid, zone: u8) -> Self {
        Self {
            ellipsoid,
            lat0: 0.0,
            lon0: f64::from(zone) * 6.0 - 183.0,
            k0: 0.9996,
            false_easting: 500_000.0,
            false_northing: 0.0,
        }
    }

    fn series(&self) -> Series {
        let n = self.ellipsoid.third_flattening();
        let n2 = n * n;
        let n3 = n2 * n;
        let radius = self.ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0);
        let alpha = [
            n / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3,
            13.0 / 48.0 * n2 - 3.0 / 5.0 * n3,
            61.0 / 240.0 * n3,
        ];
        let beta = [
            n / 2.0 - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3,
            n2 / 48.0 + n3 / 15.0,
            17.0 / 480.0 * n3,
        ];
        let e = self.ellipsoid.e();

        let xi0_prime = isometric_latitude(self.lat0.to_radians(), e).sinh().atan();
        let xi0 = xi0_prime
            + alpha
                .iter()
                .enumerate()
                .map(|(j, a)| a * (2.0 * (j + 1) as f64 * xi0_prime).sin())
                .sum::<f64>();

        Series {
            radius,
            alpha,
            beta,
            e,
            xi0,
        }
    }

    pub fn forward(&self, geo: GeoPoint) -> DVec2 {
        let s = self.series();
        let phi = geo.lat.to_radians();
        let dlon = (geo.lon - self.lon0).to_radians();

        // tan χ (konforme Breite)
        let t = isometric_latitude(phi, s.e).sinh();
        let xi_p = t.atan2(dlon.cos());
        let eta_p = (dlon.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, a) in s.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += a * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += a * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        let scale = self.k0 * s.radius;
        DVec2::new(
            self.false_easting + scale * eta,
            self.false_northing + scale * (xi - s.xi0),
        )
    }

    pub fn inverse(&self, projected: DVec2) -> GeoPoint {
        let s = self.series();
        let scale = self.k0 * s.radius;
        let xi = (projected.y - self.false_northing) / scale + s.xi0;
        let eta = (projected.x - self.false_easting) / scale;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, b) in s.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= b * (k * xi).sin() * (k * eta).cosh();
            eta_p -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let phi = latitude_from_isometric(chi.sin().atanh(), s.e);
        let dlon = eta_p.sinh().atan2(xi_p.cos());

        GeoPoint::new(phi.to_degrees(), self.lon0 + dlon.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn central_meridian_at_equator_maps_to_false_easting() {
        let tm = TransverseMercator::utm(Ellipsoid::WGS84, 32);
        let p = tm.forward(GeoPoint::new(0.0, 9.0));
        assert_abs_diff_eq!(p.x, 500_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn utm32_reference_point() {
        // Referenzwert: 52°N 9°E liegt in UTM 32N bei N ≈ 5 761 038 m (Mittelmeridian)
        let tm = TransverseMercator::utm(Ellipsoid::GRS80, 32);
        let p = tm.forward(GeoPoint::new(52.0, 9.0));
        assert_abs_diff_eq!(p.x, 500_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 5_761_038.0, epsilon = 2.0);
    }

    #[test]
    fn roundtrip_off_meridian() {
        let tm = TransverseMercator::utm(Ellipsoid::GRS80, 32);
        let geo = GeoPoint::new(49.5, 6.2);
        let back = tm.inverse(tm.forward(geo));
        assert_abs_diff_eq!(back.lat, geo.lat, epsilon = 1e-9);
        assert_abs_diff_eq!(back.lon, geo.lon, epsilon = 1e-9);
    }
}
