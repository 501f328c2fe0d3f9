//! Conversions between `circlemap` geometries and the [`geojson`] crate types.

mod point;

pub use point::GeoJsonPoint;

use crate::circle::CirclePolygon;
use crate::geo::{Coordinate, GeoPoint};
use geojson::{Geometry, Position, Value};

fn position(point: &Coordinate) -> Position {
    vec![point.lon(), point.lat()]
}

impl From<Coordinate> for Geometry {
    fn from(value: Coordinate) -> Self {
        Geometry::new(Value::Point(position(&value)))
    }
}

impl From<&CirclePolygon> for Geometry {
    fn from(value: &CirclePolygon) -> Self {
        let ring = value.closed_ring().iter().map(position).collect();
        Geometry::new(Value::Polygon(vec![ring]))
    }
}
