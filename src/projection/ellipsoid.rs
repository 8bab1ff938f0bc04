//! Reference ellipsoids

use serde::Serialize;

/// A reference ellipsoid defined by its semi-major axis and inverse
/// flattening, the two quantities the calibration format carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ellipsoid {
    pub name: String,
    /// Semi-major axis (meters)
    pub semi_major: f64,
    /// Inverse flattening 1/f (dimensionless)
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    /// Creates a new ellipsoid
    pub fn new(name: impl Into<String>, semi_major: f64, inverse_flattening: f64) -> Self {
        Self {
            name: name.into(),
            semi_major,
            inverse_flattening,
        }
    }

    /// The WGS84 ellipsoid
    pub fn wgs84() -> Self {
        Self::new("WGS 84", 6378137.0, 298.257223563)
    }

    /// Flattening f
    pub fn flattening(&self) -> f64 {
        1.0 / self.inverse_flattening
    }

    /// Semi-minor axis: a * (1 - f)
    pub fn semi_minor(&self) -> f64 {
        self.semi_major * (1.0 - self.flattening())
    }

    /// First eccentricity squared: 2f - f^2
    pub fn eccentricity_squared(&self) -> f64 {
        let f = self.flattening();
        2.0 * f - f * f
    }

    /// First eccentricity
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity_squared().sqrt()
    }

    /// Second eccentricity squared: e^2 / (1 - e^2)
    pub fn second_eccentricity_squared(&self) -> f64 {
        let e2 = self.eccentricity_squared();
        e2 / (1.0 - e2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wgs84_constants() {
        let e = Ellipsoid::wgs84();
        assert_relative_eq!(e.semi_major, 6_378_137.0);
        assert_relative_eq!(e.semi_minor(), 6_356_752.314_245_179, epsilon = 0.001);
        assert_relative_eq!(e.eccentricity(), 0.081_819_190_842_622, epsilon = 1e-12);
    }

    #[test]
    fn test_derived_quantities() {
        let e = Ellipsoid::new("Clarke 1866", 6378206.4, 294.9786982);
        assert!(e.eccentricity_squared() > 0.0);
        assert!(e.second_eccentricity_squared() > e.eccentricity_squared());
        assert!(e.semi_minor() < e.semi_major);
    }
}
