//! Pixel-to-world affine transforms and the control-point fitting algorithm.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::CalibrationPoint;

/// Extent spans below this are considered collapsed when fitting
const EXTENT_EPS: f64 = 1.0e-12;

/// Determinants below this make an affine transform non-invertible
const DET_EPS: f64 = 1.0e-15;

/// Affine transform from pixel/line space to world coordinates.
///
/// Coefficients `[a, b, c, d, e, f]` where:
/// x = a + b * col + c * row
/// y = d + e * col + f * row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoTransform([f64; 6]);

impl GeoTransform {
    /// Creates a transform from its six coefficients
    pub fn new(coefficients: [f64; 6]) -> Self {
        Self(coefficients)
    }

    /// The six coefficients in `[a, b, c, d, e, f]` order
    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    /// Maps a pixel coordinate to a world coordinate
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let t = &self.0;
        (t[0] + t[1] * col + t[2] * row, t[3] + t[4] * col + t[5] * row)
    }

    /// Determinant of the linear part: b * f - c * e
    pub fn determinant(&self) -> f64 {
        let t = &self.0;
        t[1] * t[5] - t[2] * t[4]
    }

    /// Closed-form inverse, mapping world coordinates back to pixels.
    /// Returns `None` when the linear part is not invertible.
    pub fn invert(&self) -> Option<GeoTransform> {
        let t = &self.0;
        let det = self.determinant();

        if det.abs() < DET_EPS {
            return None;
        }

        let inv_det = 1.0 / det;

        Some(GeoTransform([
            (t[2] * t[3] - t[0] * t[5]) * inv_det,
            t[5] * inv_det,
            -t[2] * inv_det,
            (-t[1] * t[3] + t[0] * t[4]) * inv_det,
            -t[4] * inv_det,
            t[1] * inv_det,
        ]))
    }

    /// Composes two transforms: applies `self` first, then `next`.
    ///
    /// Thinking of each transform in augmented-matrix form
    /// `[[b, c, a], [e, f, d], [0, 0, 1]]`, this is the matrix product
    /// `next * self`.
    pub fn then(&self, next: &GeoTransform) -> GeoTransform {
        let s = &self.0;
        let n = &next.0;

        GeoTransform([
            n[1] * s[0] + n[2] * s[3] + n[0],
            n[1] * s[1] + n[2] * s[4],
            n[1] * s[2] + n[2] * s[5],
            n[4] * s[0] + n[5] * s[3] + n[3],
            n[4] * s[1] + n[5] * s[4],
            n[4] * s[2] + n[5] * s[5],
        ])
    }

    /// Fits the pixel-to-world transform from ground control points.
    ///
    /// Two points give the exact axis-aligned solution; more run a
    /// least-squares fit over coordinates normalized into the unit square,
    /// which keeps large pixel/world magnitudes out of the sums of squares.
    pub fn from_control_points(points: &[CalibrationPoint]) -> Result<Self> {
        let transform = match points.len() {
            0 | 1 => {
                return Err(Error::DegenerateGeometry(format!(
                    "{} usable calibration points, at least 2 required",
                    points.len()
                )))
            }
            2 => Self::fit_exact_pair(&points[0], &points[1])?,
            _ => Self::fit_least_squares(points)?,
        };

        if transform.determinant().abs() < DET_EPS {
            return Err(Error::DegenerateGeometry(
                "fitted transform is not invertible".to_string(),
            ));
        }

        Ok(transform)
    }

    /// Exact 2-point solution. Rotation and shear are not representable;
    /// both points must differ in column and in row.
    fn fit_exact_pair(cp0: &CalibrationPoint, cp1: &CalibrationPoint) -> Result<Self> {
        if cp0.col == cp1.col || cp0.row == cp1.row {
            return Err(Error::DegenerateGeometry(
                "the two calibration points share a pixel column or row".to_string(),
            ));
        }

        let x_pixel_size = (cp1.x - cp0.x) / f64::from(cp1.col - cp0.col);
        let y_pixel_size = (cp1.y - cp0.y) / f64::from(cp1.row - cp0.row);
        let x_origin = cp0.x - f64::from(cp0.col) * x_pixel_size;
        let y_origin = cp0.y - f64::from(cp0.row) * y_pixel_size;

        Ok(GeoTransform([
            x_origin,
            x_pixel_size,
            0.0,
            y_origin,
            0.0,
            y_pixel_size,
        ]))
    }

    /// Least-squares fit over N > 2 points, compatible with GDAL's
    /// GDALGCPsToGeoTransform.
    fn fit_least_squares(points: &[CalibrationPoint]) -> Result<Self> {
        let mut min_pixel = f64::from(points[0].col);
        let mut max_pixel = min_pixel;
        let mut min_line = f64::from(points[0].row);
        let mut max_line = min_line;
        let mut min_geox = points[0].x;
        let mut max_geox = min_geox;
        let mut min_geoy = points[0].y;
        let mut max_geoy = min_geoy;

        for cp in &points[1..] {
            min_pixel = min_pixel.min(f64::from(cp.col));
            max_pixel = max_pixel.max(f64::from(cp.col));
            min_line = min_line.min(f64::from(cp.row));
            max_line = max_line.max(f64::from(cp.row));
            min_geox = min_geox.min(cp.x);
            max_geox = max_geox.max(cp.x);
            min_geoy = min_geoy.min(cp.y);
            max_geoy = max_geoy.max(cp.y);
        }

        if (max_pixel - min_pixel).abs() < EXTENT_EPS
            || (max_line - min_line).abs() < EXTENT_EPS
            || (max_geox - min_geox).abs() < EXTENT_EPS
            || (max_geoy - min_geoy).abs() < EXTENT_EPS
        {
            return Err(Error::DegenerateGeometry(
                "calibration points are degenerate in at least one dimension".to_string(),
            ));
        }

        // Normalize both spaces into the unit square so the sums of squares
        // below mix comparable magnitudes.
        let pl_normalize = GeoTransform([
            -min_pixel / (max_pixel - min_pixel),
            1.0 / (max_pixel - min_pixel),
            0.0,
            -min_line / (max_line - min_line),
            0.0,
            1.0 / (max_line - min_line),
        ]);

        let geo_normalize = GeoTransform([
            -min_geox / (max_geox - min_geox),
            1.0 / (max_geox - min_geox),
            0.0,
            -min_geoy / (max_geoy - min_geoy),
            0.0,
            1.0 / (max_geoy - min_geoy),
        ]);

        let n = points.len() as f64;

        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_xx = 0.0;
        let mut sum_yy = 0.0;
        let mut sum_lon = 0.0;
        let mut sum_lonx = 0.0;
        let mut sum_lony = 0.0;
        let mut sum_lat = 0.0;
        let mut sum_latx = 0.0;
        let mut sum_laty = 0.0;

        for cp in points {
            let (pixel, line) = pl_normalize.apply(f64::from(cp.col), f64::from(cp.row));
            let (geox, geoy) = geo_normalize.apply(cp.x, cp.y);

            sum_x += pixel;
            sum_y += line;
            sum_xy += pixel * line;
            sum_xx += pixel * pixel;
            sum_yy += line * line;
            sum_lon += geox;
            sum_lonx += geox * pixel;
            sum_lony += geox * line;
            sum_lat += geoy;
            sum_latx += geoy * pixel;
            sum_laty += geoy * line;
        }

        let divisor = n * (sum_xx * sum_yy - sum_xy * sum_xy)
            + 2.0 * sum_x * sum_y * sum_xy
            - sum_y * sum_y * sum_xx
            - sum_x * sum_x * sum_yy;

        if divisor == 0.0 {
            return Err(Error::DegenerateGeometry(
                "least-squares divisor is zero, no valid solution".to_string(),
            ));
        }

        // Closed-form solve of the normal equations for the normalized
        // transform: origin, then X coefficients, then Y coefficients.
        let gt_normalized = GeoTransform([
            (sum_lon * (sum_xx * sum_yy - sum_xy * sum_xy)
                + sum_lonx * (sum_y * sum_xy - sum_x * sum_yy)
                + sum_lony * (sum_x * sum_xy - sum_y * sum_xx))
                / divisor,
            (sum_lon * (sum_y * sum_xy - sum_x * sum_yy)
                + sum_lonx * (n * sum_yy - sum_y * sum_y)
                + sum_lony * (sum_x * sum_y - sum_xy * n))
                / divisor,
            (sum_lon * (sum_x * sum_xy - sum_y * sum_xx)
                + sum_lonx * (sum_x * sum_y - n * sum_xy)
                + sum_lony * (n * sum_xx - sum_x * sum_x))
                / divisor,
            (sum_lat * (sum_xx * sum_yy - sum_xy * sum_xy)
                + sum_latx * (sum_y * sum_xy - sum_x * sum_yy)
                + sum_laty * (sum_x * sum_xy - sum_y * sum_xx))
                / divisor,
            (sum_lat * (sum_y * sum_xy - sum_x * sum_yy)
                + sum_latx * (n * sum_yy - sum_y * sum_y)
                + sum_laty * (sum_x * sum_y - sum_xy * n))
                / divisor,
            (sum_lat * (sum_x * sum_xy - sum_y * sum_xx)
                + sum_latx * (sum_x * sum_y - n * sum_xy)
                + sum_laty * (n * sum_xx - sum_x * sum_x))
                / divisor,
        ]);

        let inv_geo_normalize = geo_normalize.invert().ok_or_else(|| {
            Error::DegenerateGeometry("world normalization is not invertible".to_string())
        })?;

        // pixel -> unit square -> fitted unit square -> world
        Ok(pl_normalize.then(&gt_normalized).then(&inv_geo_normalize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn affine_points(t: &GeoTransform, pixels: &[(i32, i32)]) -> Vec<CalibrationPoint> {
        pixels
            .iter()
            .map(|&(col, row)| {
                let (x, y) = t.apply(f64::from(col), f64::from(row));
                CalibrationPoint::new(col, row, x, y)
            })
            .collect()
    }

    #[test]
    fn test_apply() {
        let t = GeoTransform::new([10.0, 2.0, 0.5, 20.0, -0.5, 3.0]);
        let (x, y) = t.apply(4.0, 2.0);
        assert_relative_eq!(x, 10.0 + 8.0 + 1.0);
        assert_relative_eq!(y, 20.0 - 2.0 + 6.0);
    }

    #[test]
    fn test_invert_round_trip() {
        let t = GeoTransform::new([100.0, 0.5, 0.1, 200.0, -0.1, -0.5]);
        let inv = t.invert().unwrap();

        let (x, y) = t.apply(37.0, 91.0);
        let (col, row) = inv.apply(x, y);
        assert_relative_eq!(col, 37.0, epsilon = 1e-9);
        assert_relative_eq!(row, 91.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invert_singular_fails() {
        let t = GeoTransform::new([0.0, 1.0, 2.0, 0.0, 2.0, 4.0]);
        assert!(t.invert().is_none());
    }

    #[test]
    fn test_then_matches_sequential_application() {
        let first = GeoTransform::new([1.0, 2.0, 0.0, -3.0, 0.0, 0.5]);
        let second = GeoTransform::new([-10.0, 0.25, 1.0, 4.0, -1.0, 2.0]);
        let composed = first.then(&second);

        let (mx, my) = first.apply(5.0, 7.0);
        let (ex, ey) = second.apply(mx, my);
        let (cx, cy) = composed.apply(5.0, 7.0);

        assert_relative_eq!(cx, ex, epsilon = 1e-12);
        assert_relative_eq!(cy, ey, epsilon = 1e-12);
    }

    #[test]
    fn test_two_point_exact_fit() {
        let points = [
            CalibrationPoint::new(0, 0, 100.0, 200.0),
            CalibrationPoint::new(100, 50, 200.0, 250.0),
        ];

        let t = GeoTransform::from_control_points(&points).unwrap();
        let [a, b, c, d, e, f] = t.coefficients();

        assert_relative_eq!(a, 100.0);
        assert_relative_eq!(b, 1.0);
        assert_relative_eq!(c, 0.0);
        assert_relative_eq!(d, 200.0);
        assert_relative_eq!(e, 0.0);
        assert_relative_eq!(f, 1.0);
    }

    #[test]
    fn test_two_point_fit_reproduces_inputs() {
        let points = [
            CalibrationPoint::new(12, 34, -122.75, 45.25),
            CalibrationPoint::new(812, 634, -122.25, 44.75),
        ];

        let t = GeoTransform::from_control_points(&points).unwrap();

        for cp in &points {
            let (x, y) = t.apply(f64::from(cp.col), f64::from(cp.row));
            assert_relative_eq!(x, cp.x, epsilon = 1e-12);
            assert_relative_eq!(y, cp.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_two_point_shared_column_fails() {
        let points = [
            CalibrationPoint::new(10, 0, 0.0, 0.0),
            CalibrationPoint::new(10, 50, 1.0, 1.0),
        ];
        let err = GeoTransform::from_control_points(&points).unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry(_)));
    }

    #[test]
    fn test_too_few_points() {
        let one = [CalibrationPoint::new(0, 0, 0.0, 0.0)];
        assert!(matches!(
            GeoTransform::from_control_points(&[]),
            Err(Error::DegenerateGeometry(_))
        ));
        assert!(matches!(
            GeoTransform::from_control_points(&one),
            Err(Error::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_least_squares_recovers_exact_affine() {
        // Points taken exactly from one affine relation come back with zero
        // residual, rotation terms included.
        let truth = GeoTransform::new([433000.0, 2.5, 0.3, 3750000.0, -0.2, -2.5]);
        let points = affine_points(
            &truth,
            &[(0, 0), (640, 0), (0, 480), (640, 480), (320, 240), (17, 401)],
        );

        let fitted = GeoTransform::from_control_points(&points).unwrap();
        let truth_c = truth.coefficients();
        let fitted_c = fitted.coefficients();

        for i in 0..6 {
            assert_relative_eq!(fitted_c[i], truth_c[i], epsilon = 1e-6);
        }

        for cp in &points {
            let (x, y) = fitted.apply(f64::from(cp.col), f64::from(cp.row));
            assert_relative_eq!(x, cp.x, epsilon = 1e-6);
            assert_relative_eq!(y, cp.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_least_squares_small_degree_magnitudes() {
        // Degree-sized world extents against thousand-pixel extents is the
        // conditioning case the normalization exists for.
        let truth = GeoTransform::new([-122.004, 0.0000215, 0.0, 45.1, 0.0, -0.0000215]);
        let points = affine_points(&truth, &[(0, 0), (4096, 0), (0, 4096), (4096, 4096), (11, 2900)]);

        let fitted = GeoTransform::from_control_points(&points).unwrap();

        for cp in &points {
            let (x, y) = fitted.apply(f64::from(cp.col), f64::from(cp.row));
            assert_relative_eq!(x, cp.x, epsilon = 1e-9);
            assert_relative_eq!(y, cp.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_least_squares_minimizes_noise() {
        // Perturbing one point pulls the fit off the exact relation, but the
        // fitted plane must stay between the clean and perturbed values.
        let truth = GeoTransform::new([1000.0, 2.0, 0.0, 500.0, 0.0, -2.0]);
        let mut points = affine_points(&truth, &[(0, 0), (100, 0), (0, 100), (100, 100)]);
        points[0].x += 4.0;

        let fitted = GeoTransform::from_control_points(&points).unwrap();

        let residual: f64 = points
            .iter()
            .map(|cp| {
                let (x, y) = fitted.apply(f64::from(cp.col), f64::from(cp.row));
                (x - cp.x).powi(2) + (y - cp.y).powi(2)
            })
            .sum();

        // The exact-relation transform has residual 16 against the noisy
        // set; the least-squares fit must do strictly better.
        assert!(residual < 16.0);
        assert!(residual > 0.0);
    }

    #[test]
    fn test_least_squares_collinear_pixels_fail() {
        // All points in one pixel column: zero pixel extent.
        let points = [
            CalibrationPoint::new(5, 0, 0.0, 0.0),
            CalibrationPoint::new(5, 10, 0.0, 10.0),
            CalibrationPoint::new(5, 20, 0.0, 20.0),
        ];
        let err = GeoTransform::from_control_points(&points).unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry(_)));
    }

    #[test]
    fn test_least_squares_constant_world_fails() {
        let points = [
            CalibrationPoint::new(0, 0, 7.0, 7.0),
            CalibrationPoint::new(10, 10, 7.0, 7.0),
            CalibrationPoint::new(20, 5, 7.0, 7.0),
        ];
        let err = GeoTransform::from_control_points(&points).unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry(_)));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let truth = GeoTransform::new([433000.0, 2.5, 0.3, 3750000.0, -0.2, -2.5]);
        let points = affine_points(&truth, &[(0, 0), (100, 3), (7, 200), (150, 150)]);

        let first = GeoTransform::from_control_points(&points).unwrap();
        let second = GeoTransform::from_control_points(&points).unwrap();
        assert_eq!(first.coefficients(), second.coefficients());
    }
}
