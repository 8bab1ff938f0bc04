//! Error types for ozimap

use std::fmt;
use std::io;

/// Result type for ozimap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading a calibration file
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(io::Error),

    /// Structurally broken calibration file (too few lines, bad signature,
    /// missing mandatory line)
    MalformedFile(String),

    /// A name or path the file refers to cannot be resolved (raster file,
    /// datum name, projection name, UTM zone)
    UnresolvedReference(String),

    /// The control points do not determine an invertible transform
    DegenerateGeometry(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::MalformedFile(msg) => write!(f, "Malformed map file: {}", msg),
            Error::UnresolvedReference(msg) => write!(f, "Unresolved reference: {}", msg),
            Error::DegenerateGeometry(msg) => write!(f, "Degenerate geometry: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}
