//! OziExplorer .MAP calibration format support

pub mod records;
pub mod reader;

pub use reader::{MapCalibration, MapReader};

/// Exact signature the first line of a calibration file must start with
pub const SIGNATURE: &str = "OziExplorer Map Data File";
