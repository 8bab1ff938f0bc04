//! Geodetic datums and the built-in datum catalog.
//!
//! The calibration format names datums by the fixed strings OziExplorer
//! ships with. The catalog below maps each name to its reference ellipsoid
//! and the 3-parameter geocentric translation to WGS84.

use serde::Serialize;

use crate::projection::ellipsoid::Ellipsoid;

/// 3-parameter geocentric translation (meters) from a local datum to WGS84
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatumShift {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl DatumShift {
    /// Creates a new shift
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    /// Returns true when the shift moves nothing
    pub fn is_identity(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0 && self.dz == 0.0
    }
}

/// A geodetic datum: a named ellipsoid plus an optional shift to WGS84.
/// `shift == None` means the datum is treated as coincident with WGS84.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeodeticDatum {
    pub name: String,
    pub ellipsoid: Ellipsoid,
    pub shift: Option<DatumShift>,
}

impl GeodeticDatum {
    /// Creates a datum, normalizing an all-zero shift to the identity
    pub fn new(name: impl Into<String>, ellipsoid: Ellipsoid, shift: DatumShift) -> Self {
        Self {
            name: name.into(),
            ellipsoid,
            shift: if shift.is_identity() { None } else { Some(shift) },
        }
    }

    /// The WGS84 datum
    pub fn wgs84() -> Self {
        Self {
            name: "WGS 84".to_string(),
            ellipsoid: Ellipsoid::wgs84(),
            shift: None,
        }
    }

    /// Returns a copy of this datum with a different ellipsoid, keeping the
    /// datum shift. Used when the datum line carries an inline ellipsoid.
    pub fn with_ellipsoid(&self, ellipsoid: Ellipsoid) -> Self {
        Self {
            name: self.name.clone(),
            ellipsoid,
            shift: self.shift,
        }
    }

    /// Converts WGS84 longitude/latitude (degrees) into this datum via the
    /// geocentric translation. Identity shifts pass coordinates through
    /// unchanged.
    pub fn from_wgs84(&self, lon: f64, lat: f64) -> (f64, f64) {
        let shift = match self.shift {
            None => return (lon, lat),
            Some(s) => s,
        };

        let wgs84 = Ellipsoid::wgs84();
        let (x, y, z) = geodetic_to_geocentric(&wgs84, lon.to_radians(), lat.to_radians());

        // The catalog stores local -> WGS84, so going the other way subtracts.
        let shifted = (x - shift.dx, y - shift.dy, z - shift.dz);

        let (lon_r, lat_r) = geocentric_to_geodetic(&self.ellipsoid, shifted);
        (lon_r.to_degrees(), lat_r.to_degrees())
    }
}

/// Geodetic (radians, zero height) to geocentric cartesian (meters)
fn geodetic_to_geocentric(e: &Ellipsoid, lon: f64, lat: f64) -> (f64, f64, f64) {
    let e2 = e.eccentricity_squared();
    let sin_lat = lat.sin();
    let nu = e.semi_major / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    (
        nu * lat.cos() * lon.cos(),
        nu * lat.cos() * lon.sin(),
        nu * (1.0 - e2) * sin_lat,
    )
}

/// Geocentric cartesian (meters) to geodetic (radians), iterating the
/// latitude until it settles
fn geocentric_to_geodetic(e: &Ellipsoid, (x, y, z): (f64, f64, f64)) -> (f64, f64) {
    let e2 = e.eccentricity_squared();
    let lon = y.atan2(x);
    let p = (x * x + y * y).sqrt();

    let mut lat = z.atan2(p * (1.0 - e2));

    for _ in 0..10 {
        let sin_lat = lat.sin();
        let nu = e.semi_major / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (z + e2 * nu * sin_lat).atan2(p);

        if (next - lat).abs() < 1e-14 {
            lat = next;
            break;
        }

        lat = next;
    }

    (lon, lat)
}

type EllipsoidDef = (&'static str, f64, f64);

const AIRY_1830: EllipsoidDef = ("Airy 1830", 6377563.396, 299.3249646);
const MODIFIED_AIRY: EllipsoidDef = ("Modified Airy", 6377340.189, 299.3249646);
const AUSTRALIAN_NATIONAL: EllipsoidDef = ("Australian National", 6378160.0, 298.25);
const BESSEL_1841: EllipsoidDef = ("Bessel 1841", 6377397.155, 299.1528128);
const BESSEL_1841_NAMIBIA: EllipsoidDef = ("Bessel 1841 (Namibia)", 6377483.865, 299.1528128);
const BESSEL_1841_NORWAY: EllipsoidDef = ("Bessel 1841 (Norway)", 6377492.0176, 299.1528);
const CLARKE_1866: EllipsoidDef = ("Clarke 1866", 6378206.4, 294.9786982);
const CLARKE_1880: EllipsoidDef = ("Clarke 1880", 6378249.145, 293.465);
const CLARKE_1880_IGN: EllipsoidDef = ("Clarke 1880 IGN", 6378249.2, 293.466021);
const CLARKE_1880_PALESTINE: EllipsoidDef = ("Clarke 1880 Palestine", 6378300.789, 293.466);
const EVEREST_INDIA_1830: EllipsoidDef = ("Everest (India 1830)", 6377276.345, 300.8017);
const EVEREST_1948: EllipsoidDef = ("Everest (1948)", 6377304.063, 300.8017);
const GRS_80: EllipsoidDef = ("GRS 80", 6378137.0, 298.257222101);
const HELMERT_1906: EllipsoidDef = ("Helmert 1906", 6378200.0, 298.3);
const HOUGH_1960: EllipsoidDef = ("Hough 1960", 6378270.0, 297.0);
const INTERNATIONAL_1924: EllipsoidDef = ("International 1924", 6378388.0, 297.0);
const KRASSOVSKY_1940: EllipsoidDef = ("Krassovsky 1940", 6378245.0, 298.3);
const MODIFIED_FISCHER_1960: EllipsoidDef = ("Modified Fischer 1960", 6378155.0, 298.3);
const SOUTH_AMERICAN_1969: EllipsoidDef = ("South American 1969", 6378160.0, 298.25);
const WGS_72: EllipsoidDef = ("WGS 72", 6378135.0, 298.26);
const WGS_84: EllipsoidDef = ("WGS 84", 6378137.0, 298.257223563);

/// Datum rows: name, ellipsoid, shift to WGS84 (dx, dy, dz)
static DATUM_TABLE: &[(&str, EllipsoidDef, f64, f64, f64)] = &[
    ("Adindan", CLARKE_1880, -162.0, -12.0, 206.0),
    ("Afgooye", KRASSOVSKY_1940, -43.0, -163.0, 45.0),
    ("Ain el Abd 1970", INTERNATIONAL_1924, -150.0, -251.0, -2.0),
    ("Anna 1 Astro 1965", AUSTRALIAN_NATIONAL, -491.0, -22.0, 435.0),
    ("Arc 1950", CLARKE_1880, -143.0, -90.0, -294.0),
    ("Arc 1960", CLARKE_1880, -160.0, -8.0, -300.0),
    ("Ascension Island 1958", INTERNATIONAL_1924, -207.0, 107.0, 52.0),
    ("Astro B4 Sorol Atoll", INTERNATIONAL_1924, 114.0, -116.0, -333.0),
    ("Astro Beacon 1945", INTERNATIONAL_1924, 145.0, 75.0, -272.0),
    ("Astro DOS 71/4", INTERNATIONAL_1924, -320.0, 550.0, -494.0),
    ("Astronomic Stn 1952", INTERNATIONAL_1924, 124.0, -234.0, -25.0),
    ("Australian Geodetic 1966", AUSTRALIAN_NATIONAL, -133.0, -48.0, 148.0),
    ("Australian Geodetic 1984", AUSTRALIAN_NATIONAL, -134.0, -48.0, 149.0),
    ("Australian Geocentric 1994 (GDA94)", GRS_80, 0.0, 0.0, 0.0),
    ("Austrian", BESSEL_1841, 594.0, 84.0, 471.0),
    ("Bellevue (IGN)", INTERNATIONAL_1924, -127.0, -769.0, 472.0),
    ("Bermuda 1957", CLARKE_1866, -73.0, 213.0, 296.0),
    ("Bogota Observatory", INTERNATIONAL_1924, 307.0, 304.0, -318.0),
    ("Campo Inchauspe", INTERNATIONAL_1924, -148.0, 136.0, 90.0),
    ("Canton Astro 1966", INTERNATIONAL_1924, 298.0, -304.0, -375.0),
    ("Cape", CLARKE_1880, -136.0, -108.0, -292.0),
    ("Cape Canaveral", CLARKE_1866, -2.0, 150.0, 181.0),
    ("Carthage", CLARKE_1880, -263.0, 6.0, 431.0),
    ("CH-1903", BESSEL_1841, 674.0, 15.0, 405.0),
    ("Chatham 1971", INTERNATIONAL_1924, 175.0, -38.0, 113.0),
    ("Chua Astro", INTERNATIONAL_1924, -134.0, 229.0, -29.0),
    ("Corrego Alegre", INTERNATIONAL_1924, -206.0, 172.0, -6.0),
    ("Djakarta (Batavia)", BESSEL_1841, -377.0, 681.0, -50.0),
    ("DOS 1968", INTERNATIONAL_1924, 230.0, -199.0, -752.0),
    ("Easter Island 1967", INTERNATIONAL_1924, 211.0, 147.0, 111.0),
    ("Egypt", INTERNATIONAL_1924, -130.0, -117.0, -151.0),
    ("European 1950", INTERNATIONAL_1924, -87.0, -98.0, -121.0),
    ("European 1950 (Mean France)", INTERNATIONAL_1924, -87.0, -96.0, -120.0),
    ("European 1950 (Spain and Portugal)", INTERNATIONAL_1924, -84.0, -107.0, -120.0),
    ("European 1979", INTERNATIONAL_1924, -86.0, -98.0, -119.0),
    ("Finland Hayford", INTERNATIONAL_1924, -78.0, -231.0, -97.0),
    ("Gandajika Base", INTERNATIONAL_1924, -133.0, -321.0, 50.0),
    ("Geodetic Datum 1949", INTERNATIONAL_1924, 84.0, -22.0, 209.0),
    ("GGRS 87", GRS_80, -199.87, 74.79, 246.62),
    ("Guam 1963", CLARKE_1866, -100.0, -248.0, 259.0),
    ("GUX 1 Astro", INTERNATIONAL_1924, 252.0, -209.0, -751.0),
    ("Hartebeeshoek94", WGS_84, 0.0, 0.0, 0.0),
    ("Hermannskogel", BESSEL_1841, 653.0, -212.0, 449.0),
    ("Hjorsey 1955", INTERNATIONAL_1924, -73.0, 46.0, -86.0),
    ("Hong Kong 1963", INTERNATIONAL_1924, -156.0, -271.0, -189.0),
    ("Hu-Tzu-Shan", INTERNATIONAL_1924, -634.0, -549.0, -201.0),
    ("Indian Bangladesh", EVEREST_INDIA_1830, 289.0, 734.0, 257.0),
    ("Indian Thailand", EVEREST_INDIA_1830, 214.0, 836.0, 303.0),
    ("Israeli", CLARKE_1880_PALESTINE, -235.0, -85.0, 264.0),
    ("Ireland 1965", MODIFIED_AIRY, 506.0, -122.0, 611.0),
    ("ISTS 073 Astro 1969", INTERNATIONAL_1924, 208.0, -435.0, -229.0),
    ("Johnston Island", INTERNATIONAL_1924, 191.0, -77.0, -204.0),
    ("Kandawala", EVEREST_INDIA_1830, -97.0, 787.0, 86.0),
    ("Kerguelen Island", INTERNATIONAL_1924, 145.0, -187.0, 103.0),
    ("Kertau 1948", EVEREST_1948, -11.0, 851.0, 5.0),
    ("L.C. 5 Astro", CLARKE_1866, 42.0, 124.0, 147.0),
    ("Liberia 1964", CLARKE_1880, -90.0, 40.0, 88.0),
    ("Luzon Mindanao", CLARKE_1866, -133.0, -79.0, -72.0),
    ("Luzon Philippines", CLARKE_1866, -133.0, -77.0, -51.0),
    ("Mahe 1971", CLARKE_1880, 41.0, -220.0, -134.0),
    ("Marco Astro", INTERNATIONAL_1924, -289.0, -124.0, 60.0),
    ("Massawa", BESSEL_1841, 639.0, 405.0, 60.0),
    ("Merchich", CLARKE_1880, 31.0, 146.0, 47.0),
    ("Midway Astro 1961", INTERNATIONAL_1924, 912.0, -58.0, 1227.0),
    ("Minna", CLARKE_1880, -92.0, -93.0, 122.0),
    ("NAD27 Alaska", CLARKE_1866, -5.0, 135.0, 172.0),
    ("NAD27 Bahamas", CLARKE_1866, -4.0, 154.0, 178.0),
    ("NAD27 Canada", CLARKE_1866, -10.0, 158.0, 187.0),
    ("NAD27 Canal Zone", CLARKE_1866, 0.0, 125.0, 201.0),
    ("NAD27 Caribbean", CLARKE_1866, -7.0, 152.0, 178.0),
    ("NAD27 Central", CLARKE_1866, 0.0, 125.0, 194.0),
    ("NAD27 CONUS", CLARKE_1866, -8.0, 160.0, 176.0),
    ("NAD27 Cuba", CLARKE_1866, -9.0, 152.0, 178.0),
    ("NAD27 Greenland", CLARKE_1866, 11.0, 114.0, 195.0),
    ("NAD27 Mexico", CLARKE_1866, -12.0, 130.0, 190.0),
    ("NAD27 San Salvador", CLARKE_1866, 1.0, 140.0, 165.0),
    ("NAD83", GRS_80, 0.0, 0.0, 0.0),
    ("Nahrwn Masirah Ilnd", CLARKE_1880, -247.0, -148.0, 369.0),
    ("Nahrwn Saudi Arbia", CLARKE_1880, -231.0, -196.0, 482.0),
    ("Nahrwn United Arab", CLARKE_1880, -249.0, -156.0, 381.0),
    ("Naparima BWI", INTERNATIONAL_1924, -2.0, 374.0, 172.0),
    ("NGO1948", BESSEL_1841_NORWAY, 315.0, -217.0, 528.0),
    ("NTF France", CLARKE_1880_IGN, -168.0, -60.0, 320.0),
    ("Norsk", BESSEL_1841_NORWAY, 278.0, 93.0, 474.0),
    ("NZGD1949", INTERNATIONAL_1924, 84.0, -22.0, 209.0),
    ("NZGD2000", WGS_84, 0.0, 0.0, 0.0),
    ("Observatorio 1966", INTERNATIONAL_1924, -425.0, -169.0, 81.0),
    ("Old Egyptian", HELMERT_1906, -130.0, 110.0, -13.0),
    ("Old Hawaiian", CLARKE_1866, 61.0, -285.0, -181.0),
    ("Oman", CLARKE_1880, -346.0, -1.0, 224.0),
    ("Ord Srvy Grt Britn", AIRY_1830, 375.0, -111.0, 431.0),
    ("Pico De Las Nieves", INTERNATIONAL_1924, -307.0, -92.0, 127.0),
    ("Pitcairn Astro 1967", INTERNATIONAL_1924, 185.0, 165.0, 42.0),
    ("Potsdam Rauenberg DHDN", BESSEL_1841, 606.0, 23.0, 413.0),
    ("Prov So Amrican 1956", INTERNATIONAL_1924, -288.0, 175.0, -376.0),
    ("Prov So Chilean 1963", INTERNATIONAL_1924, 16.0, 196.0, 93.0),
    ("Puerto Rico", CLARKE_1866, 11.0, 72.0, -101.0),
    ("Pulkovo 1942 (1)", KRASSOVSKY_1940, 28.0, -130.0, -95.0),
    ("Pulkovo 1942 (2)", KRASSOVSKY_1940, 28.0, -130.0, -95.0),
    ("Qatar National", INTERNATIONAL_1924, -128.0, -283.0, 22.0),
    ("Qornoq", INTERNATIONAL_1924, 164.0, 138.0, -189.0),
    ("Reunion", INTERNATIONAL_1924, 94.0, -948.0, -1262.0),
    ("Rijksdriehoeksmeting", BESSEL_1841, 593.0, 26.0, 478.0),
    ("Rome 1940", INTERNATIONAL_1924, -225.0, -65.0, 9.0),
    ("RT 90", BESSEL_1841, 498.0, -36.0, 568.0),
    ("S42", KRASSOVSKY_1940, 28.0, -121.0, -77.0),
    ("Santo (DOS)", INTERNATIONAL_1924, 170.0, 42.0, 84.0),
    ("Sao Braz", INTERNATIONAL_1924, -203.0, 141.0, 53.0),
    ("Sapper Hill 1943", INTERNATIONAL_1924, -355.0, 16.0, 74.0),
    ("Schwarzeck", BESSEL_1841_NAMIBIA, 616.0, 97.0, -251.0),
    ("South American 1969", SOUTH_AMERICAN_1969, -57.0, 1.0, -41.0),
    ("South Asia", MODIFIED_FISCHER_1960, 7.0, -10.0, -26.0),
    ("Southeast Base", INTERNATIONAL_1924, -499.0, -249.0, 314.0),
    ("Southwest Base", INTERNATIONAL_1924, -104.0, 167.0, -38.0),
    ("Timbalai 1948", EVEREST_INDIA_1830, -689.0, 691.0, -46.0),
    ("Tokyo", BESSEL_1841, -128.0, 481.0, 664.0),
    ("Tristan Astro 1968", INTERNATIONAL_1924, -632.0, 438.0, -609.0),
    ("Viti Levu 1916", CLARKE_1880, 51.0, 391.0, -36.0),
    ("Wake-Eniwetok 1960", HOUGH_1960, 101.0, 52.0, -39.0),
    ("WGS 72", WGS_72, 0.0, 0.0, 5.0),
    ("Yacare", INTERNATIONAL_1924, -155.0, 171.0, 37.0),
    ("Zanderij", INTERNATIONAL_1924, -265.0, 120.0, -358.0),
];

/// Looks up a datum by its exact OziExplorer name. `"WGS 84"` short-circuits
/// to the identity datum; any other name must match a catalog row.
pub fn lookup_datum(name: &str) -> Option<GeodeticDatum> {
    if name == "WGS 84" {
        return Some(GeodeticDatum::wgs84());
    }

    DATUM_TABLE
        .iter()
        .find(|row| row.0 == name)
        .map(|&(n, (ell_name, a, invf), dx, dy, dz)| {
            GeodeticDatum::new(n, Ellipsoid::new(ell_name, a, invf), DatumShift::new(dx, dy, dz))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lookup_nad27_central() {
        let datum = lookup_datum("NAD27 Central").unwrap();
        assert_eq!(datum.ellipsoid.name, "Clarke 1866");
        assert_relative_eq!(datum.ellipsoid.semi_major, 6378206.4);
        let shift = datum.shift.unwrap();
        assert_eq!((shift.dx, shift.dy, shift.dz), (0.0, 125.0, 194.0));
    }

    #[test]
    fn test_lookup_unknown_name() {
        assert!(lookup_datum("Nonexistent Datum").is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(lookup_datum("nad27 central").is_none());
    }

    #[test]
    fn test_wgs84_short_circuit() {
        let datum = lookup_datum("WGS 84").unwrap();
        assert!(datum.shift.is_none());
        assert_eq!(datum.ellipsoid.name, "WGS 84");
    }

    #[test]
    fn test_zero_shift_normalizes_to_identity() {
        let datum = lookup_datum("NAD83").unwrap();
        assert!(datum.shift.is_none());
        assert_eq!(datum.ellipsoid.name, "GRS 80");
    }

    #[test]
    fn test_identity_shift_passes_through() {
        let datum = GeodeticDatum::wgs84();
        let (lon, lat) = datum.from_wgs84(-117.47454, 33.25);
        assert_eq!(lon, -117.47454);
        assert_eq!(lat, 33.25);
    }

    #[test]
    fn test_shifted_datum_moves_coordinates() {
        let datum = lookup_datum("NAD27 Central").unwrap();
        let (lon, lat) = datum.from_wgs84(-117.0, 34.0);
        // A ~230 m translation moves geographic coordinates by a few
        // arcseconds, never by whole degrees.
        assert!(lon != -117.0 || lat != 34.0);
        assert!((lon + 117.0).abs() < 0.01);
        assert!((lat - 34.0).abs() < 0.01);
    }

    #[test]
    fn test_geocentric_round_trip() {
        let e = Ellipsoid::wgs84();
        let (lon0, lat0) = (0.5_f64, 0.9_f64);
        let xyz = geodetic_to_geocentric(&e, lon0, lat0);
        let (lon1, lat1) = geocentric_to_geodetic(&e, xyz);
        assert_relative_eq!(lon0, lon1, epsilon = 1e-12);
        assert_relative_eq!(lat0, lat1, epsilon = 1e-12);
    }

    #[test]
    fn test_with_ellipsoid_keeps_shift() {
        let datum = lookup_datum("NAD27 Central").unwrap();
        let custom = datum.with_ellipsoid(Ellipsoid::new("User Defined", 6378000.0, 298.0));
        assert_eq!(custom.ellipsoid.name, "User Defined");
        assert_eq!(custom.shift, datum.shift);
    }
}
