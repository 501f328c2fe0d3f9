use crate::geo::traits::GeoPoint;

/// Reference body the geographic coordinates are given on.
///
/// Only a spherical approximation is used: all calculations take [`Datum::radius`] as the radius of
/// the sphere and ignore flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    radius: f64,
}

impl Datum {
    /// Earth as a sphere with the mean radius of 6,371,000 meters.
    pub const MEAN_SPHERE: Self = Datum {
        radius: 6_371_000.0,
    };

    /// Creates a spherical datum with the given radius in meters.
    pub const fn sphere(radius: f64) -> Self {
        Self { radius }
    }

    /// Radius of the sphere in meters.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Angular distance in radians that corresponds to `meters` along a great circle.
    pub fn angular_distance(&self, meters: f64) -> f64 {
        meters / self.radius
    }

    /// Distance in meters between two points along the great circle (haversine formula).
    pub fn great_circle_distance(
        &self,
        a: &impl GeoPoint<Num = f64>,
        b: &impl GeoPoint<Num = f64>,
    ) -> f64 {
        let d_lat = b.lat_rad() - a.lat_rad();
        let d_lon = b.lon_rad() - a.lon_rad();

        let h = (d_lat / 2.0).sin().powi(2)
            + a.lat_rad().cos() * b.lat_rad().cos() * (d_lon / 2.0).sin().powi(2);

        2.0 * self.radius * h.sqrt().min(1.0).asin()
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::MEAN_SPHERE
    }
}
