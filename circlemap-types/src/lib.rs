//! Geometry primitives used by `circlemap`: geographic points (see [`geo::GeoPoint`]), the spherical
//! [`Datum`](geo::Datum) used for distance calculations and [geodesic circles](circle::CirclePolygon).
//!
//! The crate does no I/O. Everything here is plain value types and math, so it can be used from the
//! rendering thread, a background task or a test without any runtime.

pub mod circle;
pub mod error;
pub mod geo;

#[cfg(feature = "geojson")]
pub mod geojson;

pub use circle::CirclePolygon;
pub use geo::{Coordinate, Datum, GeoPoint, NewGeoPoint};
