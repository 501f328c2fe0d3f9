//! Objects displayed over the map.

use crate::color::PaletteColor;
use crate::style::StyleKey;
use circlemap_types::geo::Coordinate;
use circlemap_types::CirclePolygon;
use serde::{Deserialize, Serialize};

/// Point marker drawn with a circle image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointAnnotation {
    /// Position of the marker.
    pub coordinate: Coordinate,
    /// Style the marker image is resolved with at render time.
    pub style: StyleKey,
}

/// Geodesic circle drawn around a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonAnnotation {
    /// Outline of the circle.
    pub polygon: CirclePolygon,
    /// Color of the point the circle surrounds.
    pub color: PaletteColor,
}

/// Annotation handed to a [`MapWidget`](crate::MapWidget).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Annotation {
    /// Point marker.
    Point(PointAnnotation),
    /// Circle polygon.
    Polygon(PolygonAnnotation),
}

impl Annotation {
    /// Point the annotation is anchored at: the marker position or the circle center.
    pub fn anchor(&self) -> Coordinate {
        match self {
            Annotation::Point(point) => point.coordinate,
            Annotation::Polygon(polygon) => polygon.polygon.center(),
        }
    }

    /// Returns the point annotation, if this is one.
    pub fn as_point(&self) -> Option<&PointAnnotation> {
        match self {
            Annotation::Point(point) => Some(point),
            Annotation::Polygon(_) => None,
        }
    }

    /// Returns the polygon annotation, if this is one.
    pub fn as_polygon(&self) -> Option<&PolygonAnnotation> {
        match self {
            Annotation::Polygon(polygon) => Some(polygon),
            Annotation::Point(_) => None,
        }
    }
}

impl From<PointAnnotation> for Annotation {
    fn from(value: PointAnnotation) -> Self {
        Self::Point(value)
    }
}

impl From<PolygonAnnotation> for Annotation {
    fn from(value: PolygonAnnotation) -> Self {
        Self::Polygon(value)
    }
}
