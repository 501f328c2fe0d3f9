//! Geodesic circles on the spherical Earth.

use crate::geo::{Coordinate, Datum, GeoPoint, NewGeoPoint};
use serde::{Deserialize, Serialize};

/// Angular step between two consecutive vertices of a circle, in degrees.
pub const STEP_DEGREES: usize = 8;

/// Number of vertices in a generated circle.
pub const VERTEX_COUNT: usize = 360 / STEP_DEGREES;

/// Polygon approximating the locus of points at a fixed great-circle distance from a center.
///
/// The ring is not explicitly closed: the last vertex is not equal to the first one. Use
/// [`CirclePolygon::closed_ring`] if the consumer needs the closing vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CirclePolygon {
    center: Coordinate,
    radius: f64,
    vertices: Vec<Coordinate>,
}

impl CirclePolygon {
    /// Creates a circle of `radius` meters around `center` on the [mean sphere](Datum::MEAN_SPHERE).
    pub fn new(center: &impl GeoPoint<Num = f64>, radius: f64) -> Self {
        Self::with_datum(center, radius, &Datum::MEAN_SPHERE)
    }

    /// Creates a circle of `radius` meters around `center` on the given datum.
    ///
    /// Vertices are sampled every [`STEP_DEGREES`] of bearing starting from north (bearing 0),
    /// going clockwise.
    pub fn with_datum(center: &impl GeoPoint<Num = f64>, radius: f64, datum: &Datum) -> Self {
        let center = Coordinate::from_point(center);
        let vertices = (0..360)
            .step_by(STEP_DEGREES)
            .map(|bearing| offset(&center, (bearing as f64).to_radians(), radius, datum))
            .collect();

        Self {
            center,
            radius,
            vertices,
        }
    }

    /// Center of the circle.
    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Radius of the circle in meters.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Vertices of the ring in bearing order.
    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    /// Vertices of the ring with the first vertex repeated at the end.
    pub fn closed_ring(&self) -> Vec<Coordinate> {
        let mut ring = self.vertices.clone();
        if let Some(first) = self.vertices.first() {
            ring.push(*first);
        }

        ring
    }

    /// Consumes the polygon returning its vertices.
    pub fn into_vertices(self) -> Vec<Coordinate> {
        self.vertices
    }
}

/// Point at `distance` meters from `center` along the great circle with the initial `bearing`
/// (radians, clockwise from north).
pub fn offset(center: &Coordinate, bearing: f64, distance: f64, datum: &Datum) -> Coordinate {
    let d = datum.angular_distance(distance);
    let lat = center.lat_rad();
    let lon = center.lon_rad();

    let point_lat = (lat.sin() * d.cos() + lat.cos() * d.sin() * bearing.cos()).asin();
    let point_lon = lon
        + (bearing.sin() * d.sin() * lat.cos()).atan2(d.cos() - lat.sin() * point_lat.sin());

    Coordinate::latlon_rad(point_lat, point_lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latlon;
    use approx::assert_abs_diff_eq;

    #[test]
    fn vertex_count() {
        let circle = CirclePolygon::new(&latlon!(37.566, 126.9784), 1000.0);
        assert_eq!(circle.vertices().len(), 45);
        assert_eq!(VERTEX_COUNT, 45);
    }

    #[test]
    fn vertices_are_at_radius() {
        let datum = Datum::MEAN_SPHERE;
        for center in [latlon!(0.0, 0.0), latlon!(45.0, 12.5), latlon!(-70.0, -150.0)] {
            for radius in [1.0, 110.0, 50_000.0] {
                let circle = CirclePolygon::new(&center, radius);
                for vertex in circle.vertices() {
                    assert_abs_diff_eq!(
                        datum.great_circle_distance(&center, vertex),
                        radius,
                        epsilon = 1e-6 * radius.max(1.0)
                    );
                }
            }
        }
    }

    #[test]
    fn vertices_are_spaced_by_step() {
        let center = latlon!(10.0, 20.0);
        let circle = CirclePolygon::new(&center, 5000.0);

        for (index, vertex) in circle.vertices().iter().enumerate() {
            let expected = (index * STEP_DEGREES) as f64;
            let bearing = initial_bearing(&center, vertex);
            let diff = (bearing - expected + 540.0) % 360.0 - 180.0;
            assert_abs_diff_eq!(diff, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn zero_radius_collapses_to_center() {
        let center = latlon!(45.0, 12.5);
        let circle = CirclePolygon::new(&center, 0.0);

        assert_eq!(circle.vertices().len(), 45);
        for vertex in circle.vertices() {
            assert_abs_diff_eq!(vertex.lat(), center.lat(), epsilon = 1e-12);
            assert_abs_diff_eq!(vertex.lon(), center.lon(), epsilon = 1e-12);
        }
    }

    #[test]
    fn first_vertex_is_due_north() {
        let center = latlon!(0.0, 0.0);
        let circle = CirclePolygon::new(&center, 6_371_000.0 * 1f64.to_radians());
        let first = circle.vertices()[0];

        assert_abs_diff_eq!(first.lat(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(first.lon(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn ring_is_open() {
        let circle = CirclePolygon::new(&latlon!(45.0, 12.5), 100.0);
        assert_ne!(circle.vertices().first(), circle.vertices().last());

        let closed = circle.closed_ring();
        assert_eq!(closed.len(), 46);
        assert_eq!(closed.first(), closed.last());
    }

    fn initial_bearing(from: &Coordinate, to: &Coordinate) -> f64 {
        let d_lon = to.lon_rad() - from.lon_rad();
        let y = d_lon.sin() * to.lat_rad().cos();
        let x = from.lat_rad().cos() * to.lat_rad().sin()
            - from.lat_rad().sin() * to.lat_rad().cos() * d_lon.cos();

        (y.atan2(x).to_degrees() + 360.0) % 360.0
    }
}
