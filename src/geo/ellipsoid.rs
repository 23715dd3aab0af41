//! Referenzellipsoide und gemeinsame Breitenfunktionen der Projektionen.

use std::f64::consts::FRAC_PI_2;

/// Maximale Iterationen bei der Rückrechnung der isometrischen Breite.
const MAX_ITERATIONS: usize = 32;
/// Abbruchschwelle der Iteration (Radiant).
const CONVERGENCE_EPSILON: f64 = 1e-15;

/// Rotationsellipsoid über große Halbachse und inverse Abplattung.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Große Halbachse in Metern
    pub a: f64,
    /// Inverse Abplattung 1/f
    pub inv_f: f64,
}

impl Ellipsoid {
    /// GRS80 (ETRS89, NAD83)
    pub const GRS80: Self = Self {
        a: 6_378_137.0,
        inv_f: 298.257_222_101,
    };
    /// WGS84
    pub const WGS84: Self = Self {
        a: 6_378_137.0,
        inv_f: 298.257_223_563,
    };
    /// Airy 1830 (OSGB36, British National Grid)
    pub const AIRY_1830: Self = Self {
        a: 6_377_563.396,
        inv_f: 299.324_964_6,
    };
    /// Bessel 1841 (Amersfoort, RD New)
    pub const BESSEL_1841: Self = Self {
        a: 6_377_397.155,
        inv_f: 299.152_812_8,
    };

    /// Abplattung f
    pub fn flattening(&self) -> f64 {
        1.0 / self.inv_f
    }

    /// Quadrat der ersten Exzentrizität
    pub fn e2(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    /// Erste Exzentrizität
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    /// Dritte Abplattung n = f / (2 - f)
    pub fn third_flattening(&self) -> f64 {
        let f = self.flattening();
        f / (2.0 - f)
    }
}

/// Isometrische Breite ψ zur geodätischen Breite `phi` (Radiant).
pub(crate) fn isometric_latitude(phi: f64, e: f64) -> f64 {
    let sin_phi = phi.sin();
    sin_phi.atanh() - e * (e * sin_phi).atanh()
}

/// Geodätische Breite zur isometrischen Breite `psi` (Fixpunkt-Iteration).
pub(crate) fn latitude_from_isometric(psi: f64, e: f64) -> f64 {
    let exp_psi = psi.exp();
    let mut phi = 2.0 * exp_psi.atan() - FRAC_PI_2;
    for _ in 0..MAX_ITERATIONS {
        let es = e * phi.sin();
        let next = 2.0 * (exp_psi * ((1.0 + es) / (1.0 - es)).powf(e / 2.0)).atan() - FRAC_PI_2;
        if (next - phi).abs() < CONVERGENCE_EPSILON {
            return next;
        }
        phi = next;
    }
    phi
}
