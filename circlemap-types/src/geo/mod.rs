//! Points in geographic coordinates (latitude and longitude) and the sphere they live on.

mod datum;
mod point;
mod traits;

pub use datum::Datum;
pub use point::Coordinate;
pub use traits::{GeoPoint, NewGeoPoint};
