//! Calibration file format support

pub mod ozi;
