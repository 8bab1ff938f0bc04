//! Coordinate reference systems, datums and projection math

pub mod coordinate;
pub mod crs;
pub mod datum;
pub mod ellipsoid;
pub mod forward;
pub mod transformer;

pub use coordinate::Coordinate;
pub use crs::{resolve, Crs, GeographicCrs, ProjectionMethod, ProjectionParam, ProjectionSetup, UtmZone};
pub use datum::{lookup_datum, DatumShift, GeodeticDatum};
pub use ellipsoid::Ellipsoid;
pub use transformer::Transformer;
