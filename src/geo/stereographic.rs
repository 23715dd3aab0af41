//! Schiefachsige stereographische Projektion über eine konforme Kugel (RD New).

use glam::DVec2;

use super::ellipsoid::latitude_from_isometric;
use super::{Ellipsoid, GeoPoint};

/// Parameter der schiefachsigen Stereographie (Winkel in Grad).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObliqueStereographic {
    pub ellipsoid: Ellipsoid,
    pub lat0: f64,
    pub lon0: f64,
    pub k0: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

struct ConformalSphere {
    /// Radius der konformen Kugel
    radius: f64,
    n: f64,
    c: f64,
    chi0: f64,
    e: f64,
}

impl ObliqueStereographic {
    fn sphere(&self) -> ConformalSphere {
        let e = self.ellipsoid.e();
        let e2 = self.ellipsoid.e2();
        let a = self.ellipsoid.a;
        let phi0 = self.lat0.to_radians();
        let sin0 = phi0.sin();
        let denom = 1.0 - e2 * sin0 * sin0;

        let rho0 = a * (1.0 - e2) / denom.powf(1.5);
        let nu0 = a / denom.sqrt();
        let radius = (rho0 * nu0).sqrt();
        let n = (1.0 + e2 * phi0.cos().powi(4) / (1.0 - e2)).sqrt();

        let s1 = (1.0 + sin0) / (1.0 - sin0);
        let s2 = (1.0 - e * sin0) / (1.0 + e * sin0);
        let w1 = (s1 * s2.powf(e)).powf(n);
        let sin_chi00 = (w1 - 1.0) / (w1 + 1.0);
        let c = (n + sin0) * (1.0 - sin_chi00) / ((n - sin0) * (1.0 + sin_chi00));
        let w2 = c * w1;
        let chi0 = ((w2 - 1.0) / (w2 + 1.0)).asin();

        ConformalSphere {
            radius,
            n,
            c,
            chi0,
            e,
        }
    }

    pub fn forward(&self, geo: GeoPoint) -> DVec2 {
        let s = self.sphere();
        let phi = geo.lat.to_radians();
        let sin_phi = phi.sin();
        let dlambda = s.n * (geo.lon - self.lon0).to_radians();

        let sa = (1.0 + sin_phi) / (1.0 - sin_phi);
        let sb = (1.0 - s.e * sin_phi) / (1.0 + s.e * sin_phi);
        let w = s.c * (sa * sb.powf(s.e)).powf(s.n);
        let chi = ((w - 1.0) / (w + 1.0)).asin();

        let b = 1.0 + chi.sin() * s.chi0.sin() + chi.cos() * s.chi0.cos() * dlambda.cos();
        let k = 2.0 * s.radius * self.k0 / b;

        DVec2::new(
            self.false_easting + k * chi.cos() * dlambda.sin(),
            self.false_northing
                + k * (chi.sin() * s.chi0.cos() - chi.cos() * s.chi0.sin() * dlambda.cos()),
        )
    }

    pub fn inverse(&self, projected: DVec2) -> GeoPoint {
        let s = self.sphere();
        let x = projected.x - self.false_easting;
        let y = projected.y - self.false_northing;
        let rho = x.hypot(y);

        let (chi, dlambda) = if rho < 1e-9 {
            (s.chi0, 0.0)
        } else {
            let cc = 2.0 * (rho / (2.0 * s.radius * self.k0)).atan();
            let chi = (cc.cos() * s.chi0.sin() + y * cc.sin() * s.chi0.cos() / rho).asin();
            let dlambda = (x * cc.sin())
                .atan2(rho * s.chi0.cos() * cc.cos() - y * s.chi0.sin() * cc.sin());
            (chi, dlambda)
        };

        let sin_chi = chi.sin();
        let psi = 0.5 * ((1.0 + sin_chi) / (s.c * (1.0 - sin_chi))).ln() / s.n;
        let phi = latitude_from_isometric(psi, s.e);

        GeoPoint::new(phi.to_degrees(), self.lon0 + (dlambda / s.n).to_degrees())
    }
}
