//! Typed records parsed from the calibration file's comma-separated lines.
//!
//! Individual malformed numeric fields are tolerated everywhere: the
//! affected optional value simply comes back absent. Only structural
//! problems (a datum line with too few fields, an empty name) are errors.

use crate::error::{Error, Result};
use crate::projection::crs::{ProjectionSetup, UtmZone};
use crate::projection::ellipsoid::Ellipsoid;

/// Splits a line on commas, trimming every field
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

/// Field accessor that treats missing trailing fields as empty
fn field<'a>(fields: &[&'a str], index: usize) -> &'a str {
    fields.get(index).copied().unwrap_or("")
}

/// Tolerant float parse: empty or malformed means absent
fn numeric(fields: &[&str], index: usize) -> Option<f64> {
    let s = field(fields, index);
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

/// Tolerant integer parse, accepting integral-valued floats
fn integer(fields: &[&str], index: usize) -> Option<i32> {
    let s = field(fields, index);
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i32>() {
        return Some(v);
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.round() as i32)
}

/// Line 4: source datum, optional inline ellipsoid, target datum
#[derive(Debug, Clone, PartialEq)]
pub struct DatumRecord {
    pub name: String,
    pub inline_ellipsoid: Option<Ellipsoid>,
    pub target_datum: String,
}

impl DatumRecord {
    /// Parses the datum line. The inline ellipsoid is honored only when its
    /// name and both numeric fields are usable.
    pub fn parse(fields: &[&str]) -> Result<Self> {
        if fields.len() < 5 {
            return Err(Error::MalformedFile(
                "datum line has fewer than 5 fields".to_string(),
            ));
        }

        let name = field(fields, 0);
        if name.is_empty() {
            return Err(Error::MalformedFile("datum line has no datum name".to_string()));
        }

        let ellipsoid_name = field(fields, 1);
        let inline_ellipsoid = if ellipsoid_name.is_empty() {
            None
        } else {
            match (numeric(fields, 2), numeric(fields, 3)) {
                (Some(a), Some(invf)) => Some(Ellipsoid::new(ellipsoid_name, a, invf)),
                _ => None,
            }
        };

        Ok(Self {
            name: name.to_string(),
            inline_ellipsoid,
            target_datum: field(fields, 4).to_string(),
        })
    }
}

/// Parses the ten numeric slots of a `Projection Setup` line
pub fn parse_projection_setup(fields: &[&str]) -> ProjectionSetup {
    ProjectionSetup {
        latitude_of_origin: numeric(fields, 1),
        central_meridian: numeric(fields, 2),
        scale_factor: numeric(fields, 3),
        false_easting: numeric(fields, 4),
        false_northing: numeric(fields, 5),
        standard_parallel_1: numeric(fields, 6),
        standard_parallel_2: numeric(fields, 7),
        height: numeric(fields, 8),
        sat: numeric(fields, 9),
        path: numeric(fields, 10),
    }
}

/// One `Point##` line: pixel coordinate plus one of the two world forms
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    /// Pixel column/row
    pub pixel: Option<(i32, i32)>,
    /// WGS84 longitude/latitude in decimal degrees, from the DMS fields
    pub latlon: Option<(f64, f64)>,
    /// Direct projected (x, y), used only when the DMS form is absent
    pub grid_xy: Option<(f64, f64)>,
    /// UTM zone and hemisphere from the grid section
    pub utm: Option<UtmZone>,
}

impl PointRecord {
    /// Parses a point line. Never fails; unusable values come back absent.
    pub fn parse(fields: &[&str]) -> Self {
        let pixel = match (integer(fields, 2), integer(fields, 3)) {
            (Some(col), Some(row)) => Some((col, row)),
            _ => None,
        };

        let latlon = match (
            numeric(fields, 6),
            numeric(fields, 7),
            numeric(fields, 9),
            numeric(fields, 10),
        ) {
            (Some(lat_deg), Some(lat_min), Some(lon_deg), Some(lon_min)) => {
                let mut lat = lat_deg + lat_min / 60.0;
                let mut lon = lon_deg + lon_min / 60.0;

                if field(fields, 8) == "S" {
                    lat = -lat;
                }
                if field(fields, 11) == "W" {
                    lon = -lon;
                }

                Some((lon, lat))
            }
            _ => None,
        };

        let grid_xy = match (numeric(fields, 14), numeric(fields, 15)) {
            (Some(y), Some(x)) => Some((x, y)),
            _ => None,
        };

        let utm = match (integer(fields, 13), field(fields, 16)) {
            (Some(zone), hemisphere @ ("N" | "S")) if zone > 0 => Some(UtmZone {
                number: zone as u32,
                southern: hemisphere == "S",
            }),
            _ => None,
        };

        Self {
            pixel,
            latlon,
            grid_xy,
            utm,
        }
    }
}

/// Parses a border corner from an `MMPXY` (pixel) or `MMPLL` (geographic)
/// line; both carry the pair in fields 2 and 3
pub fn parse_border_pair(fields: &[&str]) -> Option<(f64, f64)> {
    match (numeric(fields, 2), numeric(fields, 3)) {
        (Some(a), Some(b)) => Some((a, b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields_trims() {
        let fields = split_fields("Point01,xy,  170 , 317 ,in, deg");
        assert_eq!(fields[0], "Point01");
        assert_eq!(fields[2], "170");
        assert_eq!(fields[3], "317");
    }

    #[test]
    fn test_datum_record_plain() {
        let fields = split_fields("NAD27 Central,,,,WGS 84");
        let record = DatumRecord::parse(&fields).unwrap();
        assert_eq!(record.name, "NAD27 Central");
        assert!(record.inline_ellipsoid.is_none());
        assert_eq!(record.target_datum, "WGS 84");
    }

    #[test]
    fn test_datum_record_inline_ellipsoid() {
        let fields = split_fields("Pulkovo 1942 (1),Krassovsky,6378245.0,298.3,WGS 84");
        let record = DatumRecord::parse(&fields).unwrap();
        let ellipsoid = record.inline_ellipsoid.unwrap();
        assert_eq!(ellipsoid.name, "Krassovsky");
        assert_eq!(ellipsoid.semi_major, 6378245.0);
        assert_eq!(ellipsoid.inverse_flattening, 298.3);
    }

    #[test]
    fn test_datum_record_bad_inline_number_is_absorbed() {
        let fields = split_fields("Tokyo,Bessel 1841,not-a-number,299.1528128,WGS 84");
        let record = DatumRecord::parse(&fields).unwrap();
        assert!(record.inline_ellipsoid.is_none());
        assert_eq!(record.name, "Tokyo");
    }

    #[test]
    fn test_datum_record_too_few_fields() {
        let fields = split_fields("WGS 84,WGS 84");
        assert!(DatumRecord::parse(&fields).is_err());
    }

    #[test]
    fn test_projection_setup_blanks_are_absent() {
        let fields = split_fields("Projection Setup,,,,,,,,,,");
        let setup = parse_projection_setup(&fields);
        assert_eq!(setup, ProjectionSetup::default());
    }

    #[test]
    fn test_projection_setup_values() {
        let fields =
            split_fields("Projection Setup, 0.000000000, -117.474540000,1.000000000, 0.0, 0.0,33,45,,,");
        let setup = parse_projection_setup(&fields);
        assert_eq!(setup.latitude_of_origin, Some(0.0));
        assert_eq!(setup.central_meridian, Some(-117.47454));
        assert_eq!(setup.scale_factor, Some(1.0));
        assert_eq!(setup.false_easting, Some(0.0));
        assert_eq!(setup.false_northing, Some(0.0));
        assert_eq!(setup.standard_parallel_1, Some(33.0));
        assert_eq!(setup.standard_parallel_2, Some(45.0));
        assert_eq!(setup.height, None);
    }

    #[test]
    fn test_point_record_dms_form() {
        let fields = split_fields(
            "Point01,xy,  170,  317,in, deg,  45,  30.0,N,  122,  30.0,W, grid,   ,        ,        ,N",
        );
        let record = PointRecord::parse(&fields);
        assert_eq!(record.pixel, Some((170, 317)));
        let (lon, lat) = record.latlon.unwrap();
        assert_eq!(lat, 45.5);
        assert_eq!(lon, -122.5);
        assert!(record.grid_xy.is_none());
        assert!(record.utm.is_none());
    }

    #[test]
    fn test_point_record_southern_hemisphere_signs() {
        let fields = split_fields(
            "Point02,xy,  10,  20,in, deg,  12,  15.0,S,  45,  45.0,E, grid,   ,        ,        ,N",
        );
        let record = PointRecord::parse(&fields);
        let (lon, lat) = record.latlon.unwrap();
        assert_eq!(lat, -12.25);
        assert_eq!(lon, 45.75);
    }

    #[test]
    fn test_point_record_grid_form() {
        let fields = split_fields(
            "Point03,xy,  512,  512,in, deg,    ,        ,N,    ,        ,W, grid,  11,  3762345.0,   445678.0,N",
        );
        let record = PointRecord::parse(&fields);
        assert!(record.latlon.is_none());
        // Field 14 is Y, field 15 is X.
        assert_eq!(record.grid_xy, Some((445678.0, 3762345.0)));
        let utm = record.utm.unwrap();
        assert_eq!(utm.number, 11);
        assert!(!utm.southern);
    }

    #[test]
    fn test_point_record_southern_utm_zone() {
        let fields = split_fields(
            "Point04,xy,  1,  2,in, deg,    ,        ,S,    ,        ,E, grid,  34,  6100000.0,   500000.0,S",
        );
        let record = PointRecord::parse(&fields);
        let utm = record.utm.unwrap();
        assert_eq!(utm.number, 34);
        assert!(utm.southern);
    }

    #[test]
    fn test_point_record_bad_minutes_dropped() {
        let fields = split_fields(
            "Point05,xy,  10,  20,in, deg,  45,  xx.0,N,  122,  30.0,W, grid,   ,        ,        ,N",
        );
        let record = PointRecord::parse(&fields);
        assert!(record.latlon.is_none());
        assert_eq!(record.pixel, Some((10, 20)));
    }

    #[test]
    fn test_point_record_empty_tail() {
        let fields = split_fields("Point30,xy,,,in, deg,,,N,,,W, grid,,,,N");
        let record = PointRecord::parse(&fields);
        assert!(record.pixel.is_none());
        assert!(record.latlon.is_none());
        assert!(record.grid_xy.is_none());
    }

    #[test]
    fn test_border_pairs() {
        assert_eq!(
            parse_border_pair(&split_fields("MMPXY,1,0,0")),
            Some((0.0, 0.0))
        );
        assert_eq!(
            parse_border_pair(&split_fields("MMPLL,2, -117.1234,  33.5678")),
            Some((-117.1234, 33.5678))
        );
        assert_eq!(parse_border_pair(&split_fields("MMPXY,3,oops,0")), None);
    }
}
