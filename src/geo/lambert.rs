//! Lambert-Schnittkegelprojektion mit zwei Standardparallelen (Lambert-93).

use glam::DVec2;

use super::ellipsoid::{isometric_latitude, latitude_from_isometric};
use super::{Ellipsoid, GeoPoint};

/// Parameter einer LCC-2SP-Projektion (Winkel in Grad).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertConformalConic {
    pub ellipsoid: Ellipsoid,
    pub lat0: f64,
    pub lon0: f64,
    pub lat1: f64,
    pub lat2: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

struct Cone {
    n: f64,
    /// a · F
    af: f64,
    /// Radius am Ursprungsbreitengrad
    r0: f64,
    e: f64,
}

impl LambertConformalConic {
    fn cone(&self) -> Cone {
        let e = self.ellipsoid.e();
        let e2 = self.ellipsoid.e2();
        let m = |lat: f64| {
            let phi = lat.to_radians();
            phi.cos() / (1.0 - e2 * phi.sin().powi(2)).sqrt()
        };
        let t = |lat: f64| (-isometric_latitude(lat.to_radians(), e)).exp();

        let (m1, m2) = (m(self.lat1), m(self.lat2));
        let (t1, t2) = (t(self.lat1), t(self.lat2));
        let n = (m1.ln() - m2.ln()) / (t1.ln() - t2.ln());
        let af = self.ellipsoid.a * m1 / (n * t1.powf(n));
        let r0 = af * t(self.lat0).powf(n);

        Cone { n, af, r0, e }
    }

    pub fn forward(&self, geo: GeoPoint) -> DVec2 {
        let c = self.cone();
        let t = (-isometric_latitude(geo.lat.to_radians(), c.e)).exp();
        let r = c.af * t.powf(c.n);
        let theta = c.n * (geo.lon - self.lon0).to_radians();
        DVec2::new(
            self.false_easting + r * theta.sin(),
            self.false_northing + c.r0 - r * theta.cos(),
        )
    }

    pub fn inverse(&self, projected: DVec2) -> GeoPoint {
        let c = self.cone();
        let sign = c.n.signum();
        let dx = projected.x - self.false_easting;
        let dy = c.r0 - (projected.y - self.false_northing);
        let r = sign * dx.hypot(dy);
        let theta = (sign * dx).atan2(sign * dy);
        let t = (r / c.af).powf(1.0 / c.n);
        let phi = latitude_from_isometric(-t.ln(), c.e);

        GeoPoint::new(phi.to_degrees(), self.lon0 + (theta / c.n).to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn lambert93() -> LambertConformalConic {
        LambertConformalConic {
            ellipsoid: Ellipsoid::GRS80,
            lat0: 46.5,
            lon0: 3.0,
            lat1: 49.0,
            lat2: 44.0,
            false_easting: 700_000.0,
            false_northing: 6_600_000.0,
        }
    }

    #[test]
    fn origin_maps_to_false_origin() {
        let p = lambert93().forward(GeoPoint::new(46.5, 3.0));
        assert_abs_diff_eq!(p.x, 700_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 6_600_000.0, epsilon = 1e-6);
    }

    #[test]
    fn paris_lands_in_expected_range() {
        // Paris liegt in Lambert-93 bei ca. (652 000, 6 862 000)
        let p = lambert93().forward(GeoPoint::new(48.8566, 2.3522));
        assert_abs_diff_eq!(p.x, 652_000.0, epsilon = 1_000.0);
        assert_abs_diff_eq!(p.y, 6_862_000.0, epsilon = 1_000.0);
    }

    #[test]
    fn roundtrip() {
        let lcc = lambert93();
        let geo = GeoPoint::new(43.6, 1.44);
        let back = lcc.inverse(lcc.forward(geo));
        assert_abs_diff_eq!(back.lat, geo.lat, epsilon = 1e-9);
        assert_abs_diff_eq!(back.lon, geo.lon, epsilon = 1e-9);
    }
}
