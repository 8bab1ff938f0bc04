//! Reader for OziExplorer .MAP calibration files.
//!
//! The file is a windows-1251 text file: fixed positions for the signature,
//! title, raster filename and datum line, then prefix-matched lines for the
//! projection, its setup parameters, calibration points and border hints.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1251;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::formats::ozi::records::{
    parse_border_pair, parse_projection_setup, split_fields, DatumRecord, PointRecord,
};
use crate::formats::ozi::SIGNATURE;
use crate::geotransform::GeoTransform;
use crate::projection::coordinate::Coordinate;
use crate::projection::crs::{resolve, Crs, ProjectionSetup, UtmZone};
use crate::projection::datum::{lookup_datum, GeodeticDatum};
use crate::projection::transformer::Transformer;
use crate::types::CalibrationPoint;

const TITLE_LINE: usize = 1;
const RASTER_LINE: usize = 2;
const DATUM_LINE: usize = 4;

/// Fixed line positions 0..=4 must exist
const MIN_LINES: usize = 5;

/// The fully resolved calibration of one map file: CRS, pixel-to-world
/// transform, and the raster it calibrates. Immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct MapCalibration {
    pub title: String,
    pub raster_path: PathBuf,
    pub crs: Crs,
    pub transform: GeoTransform,
    pub control_points: Vec<CalibrationPoint>,
    /// Pixel border corners from MMPXY lines, file order
    pub border_pixels: Vec<(f64, f64)>,
    /// Geographic border corners from MMPLL lines, file order
    pub border_geo: Vec<(f64, f64)>,
}

impl MapCalibration {
    /// Reads and resolves a calibration file in one step
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        MapReader::open(path)?.read()
    }

    /// World-space bounding box of the pixel border corners, when the file
    /// carries them.
    ///
    /// Returns (min_x, min_y, max_x, max_y).
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        let mut corners = self.border_pixels.iter();
        let first = corners.next()?;
        let (x0, y0) = self.transform.apply(first.0, first.1);

        let mut bbox = (x0, y0, x0, y0);
        for corner in corners {
            let (x, y) = self.transform.apply(corner.0, corner.1);
            bbox.0 = bbox.0.min(x);
            bbox.1 = bbox.1.min(y);
            bbox.2 = bbox.2.max(x);
            bbox.3 = bbox.3.max(y);
        }

        Some(bbox)
    }
}

/// Scanned-anywhere records, gathered in one pass over the line list
#[derive(Debug, Default)]
struct ScannedRecords {
    projection_name: Option<String>,
    setup: Option<ProjectionSetup>,
    points: Vec<PointRecord>,
    utm: Option<UtmZone>,
    border_pixels: Vec<(f64, f64)>,
    border_geo: Vec<(f64, f64)>,
}

/// Calibration file reader
pub struct MapReader {
    path: PathBuf,
    lines: Vec<String>,
}

impl MapReader {
    /// Opens a calibration file: reads it, decodes windows-1251 and checks
    /// the structural signature
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let bytes = fs::read(&path)?;
        let (text, _, _) = WINDOWS_1251.decode(&bytes);
        let lines: Vec<String> = text.lines().map(str::to_owned).collect();

        if lines.len() < MIN_LINES {
            return Err(Error::MalformedFile(format!(
                "only {} lines, at least {} required",
                lines.len(),
                MIN_LINES
            )));
        }

        if !lines[0].starts_with(SIGNATURE) {
            return Err(Error::MalformedFile(
                "first line does not carry the OziExplorer map signature".to_string(),
            ));
        }

        Ok(Self { path, lines })
    }

    /// Resolves the file into a CRS, a geotransform and the raster path
    pub fn read(&self) -> Result<MapCalibration> {
        let title = self.lines[TITLE_LINE].trim().to_string();
        let raster_path = self.resolve_raster_path()?;
        let datum = self.resolve_datum()?;

        let scan = self.scan_records()?;

        let projection_name = scan
            .projection_name
            .ok_or_else(|| Error::MalformedFile("no Map Projection line".to_string()))?;

        let setup = match scan.setup {
            Some(setup) => setup,
            // Latitude/Longitude needs no parameters; everything else does.
            None if projection_name == "Latitude/Longitude" => ProjectionSetup::default(),
            None => {
                return Err(Error::MalformedFile(
                    "no Projection Setup line".to_string(),
                ))
            }
        };

        let crs = resolve(&projection_name, datum, &setup, scan.utm)?;
        let control_points = collect_control_points(&crs, &scan.points);
        let transform = GeoTransform::from_control_points(&control_points)?;

        Ok(MapCalibration {
            title,
            raster_path,
            crs,
            transform,
            control_points,
            border_pixels: scan.border_pixels,
            border_geo: scan.border_geo,
        })
    }

    /// Line 2 names the raster. Try the literal path first, then its
    /// basename next to the calibration file. Windows separators are
    /// honored when extracting the basename.
    fn resolve_raster_path(&self) -> Result<PathBuf> {
        let line = &self.lines[RASTER_LINE];
        let name = split_fields(line)[0];

        if name.is_empty() {
            return Err(Error::MalformedFile(
                "raster filename line is empty".to_string(),
            ));
        }

        let literal = PathBuf::from(name);
        if literal.exists() {
            return Ok(literal);
        }

        let basename = name.rsplit(['\\', '/']).next().unwrap_or(name);
        let sibling = match self.path.parent() {
            Some(dir) => dir.join(basename),
            None => PathBuf::from(basename),
        };

        if sibling.exists() {
            return Ok(sibling);
        }

        Err(Error::UnresolvedReference(format!(
            "raster file not found: {}",
            name
        )))
    }

    /// Line 4 names the datum; the target datum field must be WGS 84
    fn resolve_datum(&self) -> Result<GeodeticDatum> {
        let fields = split_fields(&self.lines[DATUM_LINE]);
        let record = DatumRecord::parse(&fields)?;

        if record.target_datum != "WGS 84" {
            return Err(Error::UnresolvedReference(format!(
                "unsupported target datum: {}",
                record.target_datum
            )));
        }

        // "WGS 84" resolves to the identity shift without a catalog lookup.
        let datum = if record.name == "WGS 84" {
            GeodeticDatum::wgs84()
        } else {
            lookup_datum(&record.name).ok_or_else(|| {
                Error::UnresolvedReference(format!("unknown datum: {}", record.name))
            })?
        };

        Ok(match record.inline_ellipsoid {
            Some(ellipsoid) => datum.with_ellipsoid(ellipsoid),
            None => datum,
        })
    }

    /// Gathers the prefix-matched records below the fixed lines. The UTM
    /// zone comes from the first point that carries both zone and
    /// hemisphere.
    fn scan_records(&self) -> Result<ScannedRecords> {
        let mut scan = ScannedRecords::default();

        for line in &self.lines[MIN_LINES..] {
            let fields = split_fields(line);
            let key = fields[0];

            if key.starts_with("Map Projection") {
                let name = fields.get(1).copied().unwrap_or("");
                if name.is_empty() {
                    return Err(Error::MalformedFile(
                        "Map Projection line has no projection name".to_string(),
                    ));
                }
                scan.projection_name = Some(name.to_string());
            } else if key.starts_with("Projection Setup") {
                scan.setup = Some(parse_projection_setup(&fields));
            } else if key.starts_with("Point") {
                let record = PointRecord::parse(&fields);
                if scan.utm.is_none() {
                    scan.utm = record.utm;
                }
                scan.points.push(record);
            } else if key.starts_with("MMPXY") {
                if let Some(pair) = parse_border_pair(&fields) {
                    scan.border_pixels.push(pair);
                }
            } else if key.starts_with("MMPLL") {
                if let Some(pair) = parse_border_pair(&fields) {
                    scan.border_geo.push(pair);
                }
            }
        }

        Ok(scan)
    }
}

/// Turns the surviving point records into calibration points, reprojecting
/// the DMS form through the resolved CRS. File order is preserved; points
/// without a pixel or a world form, and points the projection cannot place,
/// are dropped.
fn collect_control_points(crs: &Crs, points: &[PointRecord]) -> Vec<CalibrationPoint> {
    let transformer = Transformer::new(crs);

    points
        .iter()
        .filter_map(|record| {
            let (col, row) = record.pixel?;

            let world = if let Some((lon, lat)) = record.latlon {
                let projected = transformer.transform(Coordinate::from_lonlat(lon, lat));
                if !projected.is_finite() {
                    return None;
                }
                projected
            } else if let Some((x, y)) = record.grid_xy {
                Coordinate::new(x, y)
            } else {
                return None;
            };

            Some(CalibrationPoint::new(col, row, world.x, world.y))
        })
        .collect()
}
