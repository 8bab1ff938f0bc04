//! Forward cartographic projection formulas.
//!
//! Ellipsoidal formulas follow Snyder, *Map Projections: A Working Manual*
//! (USGS PP 1395): Mercator eq. 7-6/7-7, Transverse Mercator eq. 8-9..8-15,
//! Lambert Conformal Conic eq. 15-1..15-10, Albers eq. 14-1..14-6,
//! Sinusoidal eq. 30-8/30-9. Van der Grinten uses the spherical formulas
//! (eq. 33-1..33-11) on the semi-major axis.
//!
//! All angles are in radians; all lengths in meters.

use crate::projection::ellipsoid::Ellipsoid;

/// Meridian arc length from the equator to `lat` (Snyder eq. 3-21)
fn meridian_arc(e: &Ellipsoid, lat: f64) -> f64 {
    let e2 = e.eccentricity_squared();
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    e.semi_major
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

/// Snyder eq. 14-15: m = cos(lat) / sqrt(1 - e^2 sin^2(lat))
fn msfn(e: &Ellipsoid, lat: f64) -> f64 {
    let e2 = e.eccentricity_squared();
    let sin_lat = lat.sin();
    lat.cos() / (1.0 - e2 * sin_lat * sin_lat).sqrt()
}

/// Snyder eq. 15-9: the isometric-latitude function t
fn tsfn(e: &Ellipsoid, lat: f64) -> f64 {
    let ecc = e.eccentricity();
    let e_sin = ecc * lat.sin();
    let con = ((1.0 - e_sin) / (1.0 + e_sin)).powf(ecc / 2.0);
    (std::f64::consts::FRAC_PI_4 - lat / 2.0).tan() / con
}

/// Snyder eq. 3-12: the authalic-latitude function q
fn qsfn(e: &Ellipsoid, lat: f64) -> f64 {
    let e2 = e.eccentricity_squared();
    let ecc = e.eccentricity();
    let sin_lat = lat.sin();

    if e2 < f64::EPSILON {
        return 2.0 * sin_lat;
    }

    (1.0 - e2)
        * (sin_lat / (1.0 - e2 * sin_lat * sin_lat)
            - (1.0 / (2.0 * ecc)) * ((1.0 - ecc * sin_lat) / (1.0 + ecc * sin_lat)).ln())
}

/// Mercator (1SP)
pub fn mercator(
    e: &Ellipsoid,
    lon: f64,
    lat: f64,
    lon0: f64,
    k0: f64,
    fe: f64,
    fn_: f64,
) -> (f64, f64) {
    let a = e.semi_major;
    let x = fe + a * k0 * (lon - lon0);
    let y = fn_ - a * k0 * tsfn(e, lat).ln();
    (x, y)
}

/// Transverse Mercator
pub fn transverse_mercator(
    e: &Ellipsoid,
    lon: f64,
    lat: f64,
    lat0: f64,
    lon0: f64,
    k0: f64,
    fe: f64,
    fn_: f64,
) -> (f64, f64) {
    let e2 = e.eccentricity_squared();
    let ep2 = e.second_eccentricity_squared();
    let sin_lat = lat.sin();
    let cos_lat = lat.cos();

    let nu = e.semi_major / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let t = (sin_lat / cos_lat).powi(2);
    let c = ep2 * cos_lat * cos_lat;
    let a_term = (lon - lon0) * cos_lat;

    let a2 = a_term * a_term;
    let a3 = a2 * a_term;
    let a4 = a2 * a2;
    let a5 = a4 * a_term;
    let a6 = a4 * a2;

    let m = meridian_arc(e, lat);
    let m0 = meridian_arc(e, lat0);

    let x = fe
        + k0 * nu
            * (a_term
                + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0);

    let y = fn_
        + k0 * (m - m0
            + nu * (sin_lat / cos_lat)
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

    (x, y)
}

/// Lambert Conformal Conic (2SP; pass both parallels equal for the 1SP case)
pub fn lambert_conformal_conic(
    e: &Ellipsoid,
    lon: f64,
    lat: f64,
    lat0: f64,
    lon0: f64,
    sp1: f64,
    sp2: f64,
    fe: f64,
    fn_: f64,
) -> (f64, f64) {
    let a = e.semi_major;
    let m1 = msfn(e, sp1);
    let t1 = tsfn(e, sp1);

    let n = if (sp1 - sp2).abs() < 1e-10 {
        sp1.sin()
    } else {
        let m2 = msfn(e, sp2);
        let t2 = tsfn(e, sp2);
        (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
    };

    let f = m1 / (n * t1.powf(n));
    let rho = a * f * tsfn(e, lat).powf(n);
    let rho0 = a * f * tsfn(e, lat0).powf(n);
    let theta = n * (lon - lon0);

    (fe + rho * theta.sin(), fn_ + rho0 - rho * theta.cos())
}

/// Albers Conic Equal Area (2SP; pass both parallels equal for the 1SP case)
pub fn albers_equal_area(
    e: &Ellipsoid,
    lon: f64,
    lat: f64,
    lat0: f64,
    lon0: f64,
    sp1: f64,
    sp2: f64,
    fe: f64,
    fn_: f64,
) -> (f64, f64) {
    let a = e.semi_major;
    let m1 = msfn(e, sp1);
    let q1 = qsfn(e, sp1);

    let n = if (sp1 - sp2).abs() < 1e-10 {
        sp1.sin()
    } else {
        let m2 = msfn(e, sp2);
        let q2 = qsfn(e, sp2);
        (m1 * m1 - m2 * m2) / (q2 - q1)
    };

    let c = m1 * m1 + n * q1;
    let rho = a * (c - n * qsfn(e, lat)).max(0.0).sqrt() / n;
    let rho0 = a * (c - n * qsfn(e, lat0)).max(0.0).sqrt() / n;
    let theta = n * (lon - lon0);

    (fe + rho * theta.sin(), fn_ + rho0 - rho * theta.cos())
}

/// Sinusoidal
pub fn sinusoidal(e: &Ellipsoid, lon: f64, lat: f64, lon0: f64, fe: f64, fn_: f64) -> (f64, f64) {
    let e2 = e.eccentricity_squared();
    let sin_lat = lat.sin();

    let x = fe + e.semi_major * (lon - lon0) * lat.cos() / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let y = fn_ + meridian_arc(e, lat);

    (x, y)
}

/// Van der Grinten (spherical, on the semi-major axis)
pub fn van_der_grinten(
    e: &Ellipsoid,
    lon: f64,
    lat: f64,
    lon0: f64,
    fe: f64,
    fn_: f64,
) -> (f64, f64) {
    use std::f64::consts::PI;

    let r = e.semi_major;
    let dlon = lon - lon0;

    if lat == 0.0 {
        return (fe + r * dlon, fn_);
    }

    let theta = (2.0 * lat / PI).abs().min(1.0).asin();

    if dlon == 0.0 || (lat.abs() - PI / 2.0).abs() < 1e-10 {
        let y = PI * r * (theta / 2.0).tan();
        return (fe, fn_ + y.copysign(lat));
    }

    let big_a = 0.5 * (PI / dlon - dlon / PI).abs();
    let g = theta.cos() / (theta.sin() + theta.cos() - 1.0);
    let p = g * (2.0 / theta.sin() - 1.0);
    let q = big_a * big_a + g;

    let p2 = p * p;
    let a2 = big_a * big_a;

    let x_num = big_a * (g - p2) + ((a2 * (g - p2).powi(2)) - (p2 + a2) * (g * g - p2))
        .max(0.0)
        .sqrt();
    let y_num = p * q - big_a * ((a2 + 1.0) * (p2 + a2) - q * q).max(0.0).sqrt();

    let x = PI * r * x_num / (p2 + a2);
    let y = PI * r * y_num / (p2 + a2);

    (fe + x.copysign(dlon), fn_ + y.copysign(lat))
}
