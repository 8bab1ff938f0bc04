//! Coordinate reference system model and the projection resolver.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::projection::datum::GeodeticDatum;

/// Well-known projection parameter names
pub mod parameter {
    pub const LATITUDE_OF_ORIGIN: &str = "latitude_of_origin";
    pub const CENTRAL_MERIDIAN: &str = "central_meridian";
    pub const SCALE_FACTOR: &str = "scale_factor";
    pub const FALSE_EASTING: &str = "false_easting";
    pub const FALSE_NORTHING: &str = "false_northing";
    pub const STANDARD_PARALLEL_1: &str = "standard_parallel_1";
    pub const STANDARD_PARALLEL_2: &str = "standard_parallel_2";
}

/// The closed set of projection methods the calibration format can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectionMethod {
    Mercator,
    TransverseMercator,
    LambertConformalConic,
    AlbersEqualArea,
    Sinusoidal,
    VanDerGrinten,
}

impl ProjectionMethod {
    /// WKT-style method name
    pub fn name(&self) -> &'static str {
        match self {
            ProjectionMethod::Mercator => "Mercator_1SP",
            ProjectionMethod::TransverseMercator => "Transverse_Mercator",
            ProjectionMethod::LambertConformalConic => "Lambert_Conformal_Conic_2SP",
            ProjectionMethod::AlbersEqualArea => "Albers_Conic_Equal_Area",
            ProjectionMethod::Sinusoidal => "Sinusoidal",
            ProjectionMethod::VanDerGrinten => "VanDerGrinten",
        }
    }
}

/// A named projection parameter (angles in degrees, lengths in meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionParam {
    pub name: &'static str,
    pub value: f64,
}

impl ProjectionParam {
    pub fn new(name: &'static str, value: f64) -> Self {
        Self { name, value }
    }
}

/// A geographic (longitude/latitude) CRS: just a datum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographicCrs {
    pub datum: GeodeticDatum,
}

/// A coordinate reference system: geographic, or a projection over a
/// geographic base
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Crs {
    Geographic(GeographicCrs),
    Projected {
        base: GeographicCrs,
        method: ProjectionMethod,
        params: Vec<ProjectionParam>,
    },
}

impl Crs {
    /// The datum underlying this CRS
    pub fn datum(&self) -> &GeodeticDatum {
        match self {
            Crs::Geographic(g) => &g.datum,
            Crs::Projected { base, .. } => &base.datum,
        }
    }

    /// Returns true for projected systems
    pub fn is_projected(&self) -> bool {
        matches!(self, Crs::Projected { .. })
    }

    /// Looks up a projection parameter by name; `None` for geographic CRSs
    /// and for parameters the setup left absent
    pub fn param(&self, name: &str) -> Option<f64> {
        match self {
            Crs::Geographic(_) => None,
            Crs::Projected { params, .. } => {
                params.iter().find(|p| p.name == name).map(|p| p.value)
            }
        }
    }
}

/// Numeric slots of a `Projection Setup` line. Every slot is
/// present-or-absent; nothing is defaulted here.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectionSetup {
    pub latitude_of_origin: Option<f64>,
    pub central_meridian: Option<f64>,
    pub scale_factor: Option<f64>,
    pub false_easting: Option<f64>,
    pub false_northing: Option<f64>,
    pub standard_parallel_1: Option<f64>,
    pub standard_parallel_2: Option<f64>,
    pub height: Option<f64>,
    pub sat: Option<f64>,
    pub path: Option<f64>,
}

/// UTM zone inferred from a calibration point's grid fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmZone {
    pub number: u32,
    pub southern: bool,
}

/// Resolves a projection name and its setup parameters against a datum into
/// a full CRS.
///
/// `utm` supplies the zone inferred from the point records; it is consulted
/// only for the UTM projection name.
pub fn resolve(
    projection_name: &str,
    datum: GeodeticDatum,
    setup: &ProjectionSetup,
    utm: Option<UtmZone>,
) -> Result<Crs> {
    let base = GeographicCrs { datum };

    let crs = match projection_name {
        "Latitude/Longitude" => Crs::Geographic(base),
        "Mercator" => Crs::Projected {
            base,
            method: ProjectionMethod::Mercator,
            params: cylindrical_params(setup),
        },
        "Transverse Mercator" => Crs::Projected {
            base,
            method: ProjectionMethod::TransverseMercator,
            params: cylindrical_params(setup),
        },
        "(UTM) Universal Transverse Mercator" => {
            let zone = utm.ok_or_else(|| {
                Error::UnresolvedReference("cannot infer UTM zone from point records".to_string())
            })?;

            if zone.southern {
                return Err(Error::UnresolvedReference(
                    "southern-hemisphere UTM is not supported by the map format".to_string(),
                ));
            }

            if !(1..=60).contains(&zone.number) {
                return Err(Error::UnresolvedReference(format!(
                    "UTM zone {} out of range",
                    zone.number
                )));
            }

            Crs::Projected {
                base,
                method: ProjectionMethod::TransverseMercator,
                params: vec![
                    ProjectionParam::new(parameter::LATITUDE_OF_ORIGIN, 0.0),
                    ProjectionParam::new(
                        parameter::CENTRAL_MERIDIAN,
                        f64::from(zone.number) * 6.0 - 183.0,
                    ),
                    ProjectionParam::new(parameter::SCALE_FACTOR, 0.9996),
                    ProjectionParam::new(parameter::FALSE_EASTING, 500000.0),
                    ProjectionParam::new(parameter::FALSE_NORTHING, 0.0),
                ],
            }
        }
        "Lambert Conformal Conic" => Crs::Projected {
            base,
            method: ProjectionMethod::LambertConformalConic,
            params: conic_params(setup),
        },
        "Albers Equal Area" => Crs::Projected {
            base,
            method: ProjectionMethod::AlbersEqualArea,
            params: conic_params(setup),
        },
        "Sinusoidal" => Crs::Projected {
            base,
            method: ProjectionMethod::Sinusoidal,
            params: world_params(setup),
        },
        "Van der Grinten" => Crs::Projected {
            base,
            method: ProjectionMethod::VanDerGrinten,
            params: world_params(setup),
        },
        other => {
            return Err(Error::UnresolvedReference(format!(
                "unrecognized projection: {}",
                other
            )))
        }
    };

    Ok(crs)
}

/// Mercator and Transverse Mercator parameter set. A blank scale factor
/// defaults to 1, the only silent default the format allows.
fn cylindrical_params(setup: &ProjectionSetup) -> Vec<ProjectionParam> {
    let mut params = Vec::new();

    if let Some(v) = setup.latitude_of_origin {
        params.push(ProjectionParam::new(parameter::LATITUDE_OF_ORIGIN, v));
    }
    if let Some(v) = setup.central_meridian {
        params.push(ProjectionParam::new(parameter::CENTRAL_MERIDIAN, v));
    }
    params.push(ProjectionParam::new(
        parameter::SCALE_FACTOR,
        setup.scale_factor.unwrap_or(1.0),
    ));
    if let Some(v) = setup.false_easting {
        params.push(ProjectionParam::new(parameter::FALSE_EASTING, v));
    }
    if let Some(v) = setup.false_northing {
        params.push(ProjectionParam::new(parameter::FALSE_NORTHING, v));
    }

    params
}

/// Lambert Conformal Conic and Albers parameter set
fn conic_params(setup: &ProjectionSetup) -> Vec<ProjectionParam> {
    let mut params = Vec::new();

    if let Some(v) = setup.latitude_of_origin {
        params.push(ProjectionParam::new(parameter::LATITUDE_OF_ORIGIN, v));
    }
    if let Some(v) = setup.central_meridian {
        params.push(ProjectionParam::new(parameter::CENTRAL_MERIDIAN, v));
    }
    if let Some(v) = setup.standard_parallel_1 {
        params.push(ProjectionParam::new(parameter::STANDARD_PARALLEL_1, v));
    }
    if let Some(v) = setup.standard_parallel_2 {
        params.push(ProjectionParam::new(parameter::STANDARD_PARALLEL_2, v));
    }
    if let Some(v) = setup.false_easting {
        params.push(ProjectionParam::new(parameter::FALSE_EASTING, v));
    }
    if let Some(v) = setup.false_northing {
        params.push(ProjectionParam::new(parameter::FALSE_NORTHING, v));
    }

    params
}

/// Sinusoidal and Van der Grinten parameter set: no latitude of origin
fn world_params(setup: &ProjectionSetup) -> Vec<ProjectionParam> {
    let mut params = Vec::new();

    if let Some(v) = setup.central_meridian {
        params.push(ProjectionParam::new(parameter::CENTRAL_MERIDIAN, v));
    }
    if let Some(v) = setup.false_easting {
        params.push(ProjectionParam::new(parameter::FALSE_EASTING, v));
    }
    if let Some(v) = setup.false_northing {
        params.push(ProjectionParam::new(parameter::FALSE_NORTHING, v));
    }

    params
}
