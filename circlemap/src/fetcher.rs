//! Loading point coordinates from a GeoJSON feed.

use crate::config::DEFAULT_USER_AGENT;
use crate::error::CircleMapError;
use crate::platform::{PlatformService, PlatformServiceImpl};
use circlemap_types::geo::Coordinate;
use circlemap_types::geojson::GeoJsonPoint;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

/// Top level of the feed. Only the `features` array is read, every feature is inspected on its own
/// so that one malformed feature does not fail the whole collection.
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Value>,
}

/// Loads a feature collection from a url and extracts the point coordinates of its features.
pub struct FeatureFetcher<S = PlatformServiceImpl> {
    service: S,
    url: String,
    max_features: usize,
}

impl FeatureFetcher<PlatformServiceImpl> {
    /// Creates a fetcher using the default HTTP platform service.
    pub fn new(url: impl Into<String>, max_features: usize) -> Result<Self, CircleMapError> {
        Ok(Self::with_service(
            PlatformServiceImpl::new(DEFAULT_USER_AGENT)?,
            url,
            max_features,
        ))
    }
}

impl<S: PlatformService> FeatureFetcher<S> {
    /// Creates a fetcher loading data with the given service.
    pub fn with_service(service: S, url: impl Into<String>, max_features: usize) -> Self {
        Self {
            service,
            url: url.into(),
            max_features,
        }
    }

    /// Url the feed is loaded from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Loads the feed and returns coordinates of at most `max_features` first features, in feed
    /// order.
    pub async fn fetch(&self) -> Result<Vec<Coordinate>, CircleMapError> {
        let bytes = self.service.load_bytes_from_url(&self.url).await?;
        let points = parse_features(&bytes, self.max_features)?;
        info!("Loaded {} points from {}", points.len(), self.url);

        Ok(points)
    }
}

/// Parses a feature collection and returns the coordinates of its point features.
///
/// Only the first `max_features` features are inspected. Features without
/// `geometry.coordinates` holding at least two numbers are skipped, so the result may be
/// shorter than `max_features` even if the collection is longer.
pub fn parse_features(bytes: &[u8], max_features: usize) -> Result<Vec<Coordinate>, CircleMapError> {
    let collection: FeatureCollection = serde_json::from_slice(bytes)?;

    Ok(collection
        .features
        .iter()
        .take(max_features)
        .enumerate()
        .filter_map(|(index, feature)| {
            let point = feature_coordinate(feature);
            if point.is_none() {
                debug!("Feature {index} has no point coordinates, skipping");
            }

            point
        })
        .collect())
}

fn feature_coordinate(feature: &Value) -> Option<Coordinate> {
    let coordinates = feature.get("geometry")?.get("coordinates")?.as_array()?;
    let position: Vec<f64> = coordinates.iter().map_while(Value::as_f64).collect();

    GeoJsonPoint::try_from(position).ok().map(Coordinate::from)
}
