//! Transforms WGS84 geographic coordinates into a resolved CRS.

use crate::projection::coordinate::Coordinate;
use crate::projection::crs::{parameter, Crs, ProjectionMethod};
use crate::projection::forward;

/// Forward transform from WGS84 longitude/latitude (degrees) into a CRS:
/// the 3-parameter datum shift followed by the projection formula.
pub struct Transformer<'a> {
    crs: &'a Crs,
}

impl<'a> Transformer<'a> {
    /// Creates a transformer targeting the given CRS
    pub fn new(crs: &'a Crs) -> Self {
        Self { crs }
    }

    /// Transforms a WGS84 coordinate into the target CRS.
    ///
    /// Returns degrees for a geographic target, meters for a projected one.
    /// The result can be non-finite when the point lies outside the
    /// projection's domain (e.g. a pole under Mercator); callers decide
    /// whether to drop such points.
    pub fn transform(&self, lonlat: Coordinate) -> Coordinate {
        let datum = self.crs.datum();
        let (lon, lat) = datum.from_wgs84(lonlat.x, lonlat.y);

        let (base, method) = match self.crs {
            Crs::Geographic(_) => return Coordinate::new(lon, lat),
            Crs::Projected { base, method, .. } => (base, method),
        };

        let e = &base.datum.ellipsoid;
        let lon_r = lon.to_radians();
        let lat_r = lat.to_radians();

        let param = |name: &str| self.crs.param(name);
        let lat0 = param(parameter::LATITUDE_OF_ORIGIN).unwrap_or(0.0).to_radians();
        let lon0 = param(parameter::CENTRAL_MERIDIAN).unwrap_or(0.0).to_radians();
        let k0 = param(parameter::SCALE_FACTOR).unwrap_or(1.0);
        let fe = param(parameter::FALSE_EASTING).unwrap_or(0.0);
        let fn_ = param(parameter::FALSE_NORTHING).unwrap_or(0.0);

        // Absent standard parallels collapse onto the latitude of origin.
        let sp1 = param(parameter::STANDARD_PARALLEL_1)
            .map(f64::to_radians)
            .unwrap_or(lat0);
        let sp2 = param(parameter::STANDARD_PARALLEL_2)
            .map(f64::to_radians)
            .unwrap_or(sp1);

        let (x, y) = match method {
            ProjectionMethod::Mercator => forward::mercator(e, lon_r, lat_r, lon0, k0, fe, fn_),
            ProjectionMethod::TransverseMercator => {
                forward::transverse_mercator(e, lon_r, lat_r, lat0, lon0, k0, fe, fn_)
            }
            ProjectionMethod::LambertConformalConic => {
                forward::lambert_conformal_conic(e, lon_r, lat_r, lat0, lon0, sp1, sp2, fe, fn_)
            }
            ProjectionMethod::AlbersEqualArea => {
                forward::albers_equal_area(e, lon_r, lat_r, lat0, lon0, sp1, sp2, fe, fn_)
            }
            ProjectionMethod::Sinusoidal => forward::sinusoidal(e, lon_r, lat_r, lon0, fe, fn_),
            ProjectionMethod::VanDerGrinten => {
                forward::van_der_grinten(e, lon_r, lat_r, lon0, fe, fn_)
            }
        };

        Coordinate::new(x, y)
    }
}
