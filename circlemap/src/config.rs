//! Configuration of a [`MapScreen`](crate::MapScreen).

use crate::error::CircleMapError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Default number of features taken from a feed.
pub const DEFAULT_MAX_FEATURES: usize = 50;

/// Default user agent of the feed requests.
pub const DEFAULT_USER_AGENT: &str = "circlemap/0.1";

/// Largest value a [`RadiusRange`] may contain.
pub const MAX_RADIUS: u32 = 100_000;

/// Inclusive range of positive integers a random value is drawn from.
///
/// Always satisfies `0 < min <= max <= MAX_RADIUS`: ranges are only built through
/// [`RadiusRange::new`], deserialization included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRadiusRange")]
pub struct RadiusRange {
    min: u32,
    max: u32,
}

#[derive(Deserialize)]
struct RawRadiusRange {
    min: u32,
    max: u32,
}

impl TryFrom<RawRadiusRange> for RadiusRange {
    type Error = CircleMapError;

    fn try_from(value: RawRadiusRange) -> Result<Self, Self::Error> {
        Self::new(value.min, value.max)
    }
}

impl RadiusRange {
    /// Marker radius range of the first screen revision: `[10, 29]` pixels.
    pub const V1: RadiusRange = RadiusRange { min: 10, max: 29 };
    /// Marker radius range of the later screen revisions: `[11, 30]` pixels.
    pub const V2: RadiusRange = RadiusRange { min: 11, max: 30 };
    /// Range of geodesic circle radii in meters: `[100, 119]`.
    pub const CIRCLE_METERS: RadiusRange = RadiusRange { min: 100, max: 119 };

    /// Creates a new range, checking that `0 < min <= max <= MAX_RADIUS`.
    pub fn new(min: u32, max: u32) -> Result<Self, CircleMapError> {
        if min == 0 {
            return Err(CircleMapError::Config(format!(
                "radius range must be positive, got {min}..={max}"
            )));
        }

        if min > max {
            return Err(CircleMapError::Config(format!(
                "radius range is empty: {min}..={max}"
            )));
        }

        if max > MAX_RADIUS {
            return Err(CircleMapError::Config(format!(
                "radius range exceeds {MAX_RADIUS}: {min}..={max}"
            )));
        }

        Ok(Self { min, max })
    }

    /// Smallest value, inclusive.
    pub fn min(&self) -> u32 {
        self.min
    }

    /// Largest value, inclusive.
    pub fn max(&self) -> u32 {
        self.max
    }

    /// Number of distinct values in the range.
    pub fn count(&self) -> u32 {
        self.max - self.min + 1
    }

    /// Returns true if `value` is inside the range.
    pub fn contains(&self, value: u32) -> bool {
        self.as_range().contains(&value)
    }

    /// Converts into std range.
    pub fn as_range(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }
}

impl Default for RadiusRange {
    fn default() -> Self {
        Self::V1
    }
}

/// Settings of a map screen.
///
/// The feed url has no default: feeds move, so the host always provides it.
///
/// ```
/// use circlemap::{RadiusRange, ScreenConfig};
///
/// let config = ScreenConfig::new("https://example.com/points.geojson")
///     .with_radius_range(RadiusRange::V2)
///     .with_circles(true);
/// assert_eq!(config.max_features, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Url of the GeoJSON feature collection.
    pub feed_url: String,
    /// Maximum number of features consumed from the feed.
    pub max_features: usize,
    /// Range of marker radii in pixels.
    pub radius_range: RadiusRange,
    /// Whether a geodesic circle polygon is drawn around every point.
    pub draw_circles: bool,
    /// Range of the geodesic circle radii in meters.
    pub circle_radius_range: RadiusRange,
    /// User agent sent with the feed request.
    pub user_agent: String,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            feed_url: String::new(),
            max_features: DEFAULT_MAX_FEATURES,
            radius_range: RadiusRange::V1,
            draw_circles: false,
            circle_radius_range: RadiusRange::CIRCLE_METERS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScreenConfig {
    /// Creates a config with default settings loading the feed from `feed_url`.
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            ..Default::default()
        }
    }

    /// Parses the config from a JSON document. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, CircleMapError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| CircleMapError::Config(err.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Sets maximum number of features consumed from the feed.
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Sets range of marker radii.
    pub fn with_radius_range(mut self, range: RadiusRange) -> Self {
        self.radius_range = range;
        self
    }

    /// Enables or disables geodesic circles around points.
    pub fn with_circles(mut self, draw_circles: bool) -> Self {
        self.draw_circles = draw_circles;
        self
    }

    /// Sets range of geodesic circle radii in meters.
    pub fn with_circle_radius_range(mut self, range: RadiusRange) -> Self {
        self.circle_radius_range = range;
        self
    }

    /// Sets user agent of the feed requests.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Checks the settings that can't be enforced by their types.
    pub fn validate(&self) -> Result<(), CircleMapError> {
        if self.feed_url.is_empty() {
            return Err(CircleMapError::Config("feed url is not set".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn defaults_from_json() {
        let config = ScreenConfig::from_json_str(r#"{"feed_url": "https://example.com/a.json"}"#)
            .unwrap();
        assert_eq!(config.max_features, 50);
        assert_eq!(config.radius_range, RadiusRange::V1);
        assert_eq!(config.circle_radius_range.as_range(), 100..=119);
        assert!(!config.draw_circles);
    }

    #[test]
    fn full_json() {
        let config = ScreenConfig::from_json_str(
            r#"{
                "feed_url": "https://example.com/a.json",
                "max_features": 10,
                "radius_range": {"min": 11, "max": 30},
                "draw_circles": true
            }"#,
        )
        .unwrap();
        assert_eq!(config.max_features, 10);
        assert_eq!(config.radius_range, RadiusRange::V2);
        assert!(config.draw_circles);
    }

    #[test]
    fn invalid_values() {
        assert_matches!(
            ScreenConfig::from_json_str("{}"),
            Err(CircleMapError::Config(_))
        );
        assert_matches!(
            ScreenConfig::from_json_str(
                r#"{"feed_url": "u", "radius_range": {"min": 0, "max": 3}}"#
            ),
            Err(CircleMapError::Config(_))
        );
        assert_matches!(RadiusRange::new(5, 4), Err(CircleMapError::Config(_)));
    }

    #[test]
    fn zero_radius_is_rejected() {
        assert_matches!(RadiusRange::new(0, 0), Err(CircleMapError::Config(_)));
        assert!(serde_json::from_str::<RadiusRange>(r#"{"min": 0, "max": 0}"#).is_err());

        let range: RadiusRange = serde_json::from_str(r#"{"min": 1, "max": 1}"#).unwrap();
        assert_eq!(range.min(), 1);
        assert_eq!(range.count(), 1);
    }

    #[test]
    fn radius_is_bounded() {
        assert_matches!(
            RadiusRange::new(1, MAX_RADIUS + 1),
            Err(CircleMapError::Config(_))
        );
        assert_matches!(
            RadiusRange::new(u32::MAX, u32::MAX),
            Err(CircleMapError::Config(_))
        );
        assert_eq!(RadiusRange::new(1, MAX_RADIUS).unwrap().count(), MAX_RADIUS);
    }

    #[test]
    fn range_len() {
        assert_eq!(RadiusRange::V1.count(), 20);
        assert_eq!(RadiusRange::V2.count(), 20);
        assert!(RadiusRange::V2.contains(30));
        assert!(!RadiusRange::V1.contains(30));
    }
}
