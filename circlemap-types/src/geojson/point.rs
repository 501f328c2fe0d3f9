use crate::error::CircleMapTypesError;
use crate::geo::{Coordinate, GeoPoint, NewGeoPoint};
use geojson::Position;

/// GeoJSON position that is guaranteed to have at least longitude and latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonPoint(Position);

impl TryFrom<Position> for GeoJsonPoint {
    type Error = CircleMapTypesError;

    fn try_from(value: Position) -> Result<Self, Self::Error> {
        if value.len() < 2 {
            Err(CircleMapTypesError::Conversion(
                "point must contain at least 2 dimensions".to_string(),
            ))
        } else {
            Ok(GeoJsonPoint(value))
        }
    }
}

impl GeoPoint for GeoJsonPoint {
    type Num = f64;

    fn lat(&self) -> Self::Num {
        self.0[1]
    }

    fn lon(&self) -> Self::Num {
        self.0[0]
    }
}

impl NewGeoPoint for GeoJsonPoint {
    fn latlon(lat: f64, lon: f64) -> Self {
        Self(vec![lon, lat])
    }
}

impl From<GeoJsonPoint> for Coordinate {
    fn from(value: GeoJsonPoint) -> Self {
        Coordinate::from_point(&value)
    }
}
