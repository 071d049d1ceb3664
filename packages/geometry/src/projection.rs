//! Geographic → planar projection for distance computation.
//!
//! Distances in angular degrees are not metrically meaningful, so all
//! nearest-neighbour work happens in a UTM-style transverse Mercator
//! projection (WGS84 ellipsoid, scale factor 0.9996, 500 km false
//! easting). The zone is picked from the data's longitude, which keeps
//! distortion well under a metre per kilometre for city-scale regions.
//!
//! Forward projection only: outputs stay in geographic coordinates, so
//! nothing ever needs to come back. No false northing is applied — the
//! northing is signed relative to the equator, and distances are
//! invariant to that constant offset.

use geo::Point;

/// WGS84 semi-major axis, metres.
const SEMI_MAJOR: f64 = 6_378_137.0;
/// WGS84 flattening.
const FLATTENING: f64 = 1.0 / 298.257_223_563;
/// UTM central scale factor.
const SCALE: f64 = 0.9996;
/// UTM false easting, metres.
const FALSE_EASTING: f64 = 500_000.0;

/// A fixed transverse Mercator projection for one UTM zone.
#[derive(Debug, Clone, Copy)]
pub struct UtmProjection {
    zone: u8,
    central_meridian_rad: f64,
}

impl UtmProjection {
    /// Creates the projection for the UTM zone containing `longitude`.
    #[must_use]
    pub fn for_longitude(longitude: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let zone = (((longitude + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u8;
        let central_meridian = f64::from(zone - 1).mul_add(6.0, -180.0) + 3.0;
        Self {
            zone,
            central_meridian_rad: central_meridian.to_radians(),
        }
    }

    /// Returns the UTM zone number.
    #[must_use]
    pub const fn zone(&self) -> u8 {
        self.zone
    }

    /// Projects a geographic point (longitude, latitude in degrees) to
    /// planar `[easting, northing]` in metres.
    #[must_use]
    pub fn project(&self, point: Point<f64>) -> [f64; 2] {
        let lat = point.y().to_radians();
        let lon = point.x().to_radians();

        let e2 = FLATTENING * (2.0 - FLATTENING);
        let ep2 = e2 / (1.0 - e2);

        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let tan_lat = lat.tan();

        let n = SEMI_MAJOR / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let t = tan_lat * tan_lat;
        let c = ep2 * cos_lat * cos_lat;
        let a = (lon - self.central_meridian_rad) * cos_lat;

        let m = meridian_arc(lat, e2);

        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a3 * a;
        let a5 = a4 * a;
        let a6 = a5 * a;

        let easting = FALSE_EASTING
            + SCALE
                * n
                * (a + (1.0 - t + c) * a3 / 6.0
                    + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a5 / 120.0);

        let northing = SCALE
            * (m + n
                * tan_lat
                * (a2 / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a6 / 720.0));

        [easting, northing]
    }
}

/// Meridian arc length from the equator to `lat`, on the WGS84 ellipsoid.
fn meridian_arc(lat: f64, e2: f64) -> f64 {
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    SEMI_MAJOR
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}
