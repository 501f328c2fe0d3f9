//! Circlemap is a single map screen: it loads a GeoJSON feature collection from a URL, scatters up to
//! 50 point annotations styled as randomly sized and colored circles and, optionally, draws a
//! geodesic circle polygon around every point.
//!
//! # Main components
//!
//! * [`FeatureFetcher`] loads the feed through a [`PlatformService`] and extracts point coordinates.
//! * [`AnnotationStyler`] picks a random [`StyleKey`] for every point and memoizes the rendered
//!   circle images by that key.
//! * [`MapScreen`] ties them together. It owns the [`MapWidget`] the annotations are displayed
//!   with, runs the fetch on a background task and hands the results to the widget only from
//!   [`MapScreen::process_events`], which the host calls on its UI thread.
//!
//! Geometry types and the geodesic circle routine live in the [`circlemap_types`] crate, which is
//! reexported.
//!
//! ```no_run
//! use circlemap::{AnnotationStyler, MapScreen, ScreenConfig};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! # use circlemap::{Annotation, MapWidget};
//! # #[derive(Default)]
//! # struct Widget(Vec<Annotation>);
//! # impl MapWidget for Widget {
//! #     fn add_annotations(&mut self, a: &[Annotation]) { self.0.extend_from_slice(a) }
//! #     fn annotations(&self) -> &[Annotation] { &self.0 }
//! #     fn show_annotations(&mut self, _: &[Annotation]) {}
//! # }
//!
//! # async fn run() -> Result<(), circlemap::error::CircleMapError> {
//! let config = ScreenConfig::new("https://example.com/points.geojson").with_circles(true);
//! let styler = AnnotationStyler::new(config.radius_range, StdRng::from_entropy());
//! let mut screen = MapScreen::new(Widget::default(), config, styler)?;
//!
//! screen.activate();
//! screen.next_update().await;
//! # Ok(())
//! # }
//! ```

pub mod annotation;
pub(crate) mod async_runtime;
mod color;
pub mod config;
pub mod error;
pub mod fetcher;
mod messenger;
pub mod platform;
pub mod screen;
pub mod style;
pub mod widget;

pub use annotation::{Annotation, PointAnnotation, PolygonAnnotation};
pub use color::{Color, PaletteColor};
pub use config::{RadiusRange, ScreenConfig};
pub use fetcher::FeatureFetcher;
pub use messenger::{DummyMessenger, Messenger};
pub use platform::{PlatformService, PlatformServiceImpl};
pub use screen::{MapScreen, ScreenState};
pub use style::{AnnotationStyler, CircleImage, RandomSource, StyleKey};
pub use widget::MapWidget;

// Reexport circlemap_types
pub use circlemap_types;
