//! Core data types for ozimap

use serde::Serialize;

/// A ground control point: a raster pixel paired with its known world
/// coordinate in the units of the resolved CRS (degrees or meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationPoint {
    /// Pixel column
    pub col: i32,
    /// Pixel row
    pub row: i32,
    /// World x (longitude or easting)
    pub x: f64,
    /// World y (latitude or northing)
    pub y: f64,
}

impl CalibrationPoint {
    /// Creates a new calibration point
    pub fn new(col: i32, row: i32, x: f64, y: f64) -> Self {
        Self { col, row, x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_point() {
        let cp = CalibrationPoint::new(100, 50, 200.0, 250.0);
        assert_eq!(cp.col, 100);
        assert_eq!(cp.row, 50);
        assert_eq!(cp.x, 200.0);
        assert_eq!(cp.y, 250.0);
    }
}
