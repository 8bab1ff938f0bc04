//! ozimap - an OziExplorer .MAP calibration reader for Rust
//!
//! ozimap turns the legacy text calibration files written by OziExplorer
//! into a precise geometric model: a coordinate reference system (datum,
//! ellipsoid, optional projection) and a 6-coefficient affine transform
//! mapping raster pixels to world coordinates.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use ozimap::MapCalibration;
//!
//! let cal = MapCalibration::from_file("demo.map")?;
//!
//! println!("{} -> {}", cal.title, cal.raster_path.display());
//! let (x, y) = cal.transform.apply(0.0, 0.0);
//! println!("top-left corner of the raster sits at ({}, {})", x, y);
//! # Ok::<(), ozimap::Error>(())
//! ```
//!
//! ## Inspecting the resolved CRS
//!
//! ```no_run
//! use ozimap::{Crs, MapCalibration};
//!
//! let cal = MapCalibration::from_file("demo.map")?;
//!
//! match &cal.crs {
//!     Crs::Geographic(geo) => {
//!         println!("geographic, datum {}", geo.datum.name);
//!     }
//!     Crs::Projected { method, params, .. } => {
//!         println!("projected via {}", method.name());
//!         for p in params {
//!             println!("  {} = {}", p.name, p.value);
//!         }
//!     }
//! }
//! # Ok::<(), ozimap::Error>(())
//! ```

pub mod error;
pub mod formats;
pub mod geotransform;
pub mod projection;
pub mod types;

pub use error::{Error, Result};
pub use formats::ozi::{MapCalibration, MapReader, SIGNATURE};
pub use geotransform::GeoTransform;
pub use projection::{
    Coordinate, Crs, DatumShift, Ellipsoid, GeodeticDatum, GeographicCrs, ProjectionMethod,
    ProjectionParam, ProjectionSetup, Transformer,
};
pub use types::CalibrationPoint;
