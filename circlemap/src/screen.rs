//! The map screen: fetches the feed on activation and hands styled annotations to the widget.

use crate::annotation::{Annotation, PointAnnotation, PolygonAnnotation};
use crate::async_runtime;
use crate::config::{RadiusRange, ScreenConfig};
use crate::error::CircleMapError;
use crate::fetcher::FeatureFetcher;
use crate::messenger::Messenger;
use crate::platform::{PlatformService, PlatformServiceImpl};
use crate::style::{AnnotationStyler, CircleImage, DefaultRenderer, RandomSource, StyleKey};
use crate::widget::MapWidget;
use circlemap_types::geo::Coordinate;
use circlemap_types::CirclePolygon;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// What the screen currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState {
    /// The screen was never activated.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded. Counts may be zero if the feed had no usable points.
    Loaded {
        /// Number of point annotations added.
        points: usize,
        /// Number of circle polygons added.
        polygons: usize,
    },
    /// The last fetch failed, nothing was added to the widget.
    Failed(CircleMapError),
}

struct Update {
    generation: u64,
    result: Result<Vec<Annotation>, CircleMapError>,
}

/// Map screen scattering styled point annotations from a GeoJSON feed.
///
/// Every [`activate`](MapScreen::activate) call starts a new fetch on the tokio runtime, aborting
/// the previous one if it is still running. Loading, parsing and building annotations happen in the
/// background task. The results are handed to the widget only by
/// [`process_events`](MapScreen::process_events) (or [`next_update`](MapScreen::next_update)),
/// which the host calls on the thread that owns the widget.
pub struct MapScreen<W, R, F = DefaultRenderer, I = CircleImage, S = PlatformServiceImpl> {
    widget: W,
    config: ScreenConfig,
    styler: Arc<AnnotationStyler<R, F, I>>,
    fetcher: Arc<FeatureFetcher<S>>,
    messenger: Option<Arc<dyn Messenger>>,
    state: ScreenState,
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    sender: UnboundedSender<Update>,
    receiver: UnboundedReceiver<Update>,
}

impl<W, R, F, I> MapScreen<W, R, F, I, PlatformServiceImpl>
where
    W: MapWidget,
    R: RandomSource + Send + 'static,
    F: Fn(&StyleKey) -> I + Send + Sync + 'static,
    I: Send + Sync + 'static,
{
    /// Creates a screen loading the feed over HTTP.
    pub fn new(
        widget: W,
        config: ScreenConfig,
        styler: AnnotationStyler<R, F, I>,
    ) -> Result<Self, CircleMapError> {
        let service = PlatformServiceImpl::new(&config.user_agent)?;
        Self::with_service(widget, config, styler, service)
    }
}

impl<W, R, F, I, S> MapScreen<W, R, F, I, S>
where
    W: MapWidget,
    R: RandomSource + Send + 'static,
    F: Fn(&StyleKey) -> I + Send + Sync + 'static,
    I: Send + Sync + 'static,
    S: PlatformService + 'static,
{
    /// Creates a screen loading the feed with the given platform service.
    ///
    /// The styler must draw radii from `config.radius_range`.
    pub fn with_service(
        widget: W,
        config: ScreenConfig,
        styler: AnnotationStyler<R, F, I>,
        service: S,
    ) -> Result<Self, CircleMapError> {
        config.validate()?;
        if styler.radius_range() != config.radius_range {
            return Err(CircleMapError::Config(format!(
                "styler radius range {:?} differs from configured {:?}",
                styler.radius_range().as_range(),
                config.radius_range.as_range()
            )));
        }

        let fetcher = FeatureFetcher::with_service(service, &config.feed_url, config.max_features);
        let (sender, receiver) = unbounded_channel();

        Ok(Self {
            widget,
            config,
            styler: Arc::new(styler),
            fetcher: Arc::new(fetcher),
            messenger: None,
            state: ScreenState::Idle,
            generation: 0,
            in_flight: None,
            sender,
            receiver,
        })
    }

    /// Sets the messenger notified when a fetch completes.
    pub fn with_messenger(mut self, messenger: impl Messenger + 'static) -> Self {
        self.messenger = Some(Arc::new(messenger));
        self
    }

    /// Starts loading the feed. Must be called from within a tokio runtime.
    ///
    /// If a previous fetch is still running, it is aborted and its results will never reach the
    /// widget.
    pub fn activate(&mut self) {
        self.cancel_in_flight();

        self.generation += 1;
        let generation = self.generation;
        let fetcher = self.fetcher.clone();
        let styler = self.styler.clone();
        let sender = self.sender.clone();
        let messenger = self.messenger.clone();
        let draw_circles = self.config.draw_circles;
        let circle_radius_range = self.config.circle_radius_range;

        info!("Loading features from {}", fetcher.url());
        self.state = ScreenState::Loading;
        self.in_flight = Some(async_runtime::spawn(async move {
            let result = fetcher.fetch().await.map(|points| {
                build_annotations(&points, &styler, draw_circles, circle_radius_range)
            });

            if let Err(error) = &result {
                warn!("Failed to load features from {}: {error}", fetcher.url());
            }

            if sender.send(Update { generation, result }).is_err() {
                return;
            }

            if let Some(messenger) = messenger {
                messenger.request_redraw();
            }
        }));
    }

    /// Aborts the fetch in flight, if any. Annotations already in the widget stay there.
    pub fn deactivate(&mut self) {
        self.cancel_in_flight();
        self.generation += 1;
        if self.state == ScreenState::Loading {
            self.state = ScreenState::Idle;
        }
    }

    /// Hands completed fetch results to the widget. Returns true if the widget was updated or the
    /// state changed.
    ///
    /// Never blocks. Call it on the thread that owns the widget.
    pub fn process_events(&mut self) -> bool {
        let stopped = self
            .in_flight
            .as_ref()
            .is_some_and(|handle| handle.is_finished());

        let mut changed = self.drain_updates();
        if stopped && self.state == ScreenState::Loading {
            self.in_flight = None;
            self.fail_stopped_fetch("fetch task stopped without a result".to_string());
            changed = true;
        }

        changed
    }

    /// Waits until the fetch in flight completes and hands its results to the widget.
    ///
    /// Returns immediately if nothing is loading. If the fetch task dies without sending its
    /// results, the state becomes [`ScreenState::Failed`].
    pub async fn next_update(&mut self) -> &ScreenState {
        while self.state == ScreenState::Loading {
            let Some(handle) = self.in_flight.as_mut() else {
                break;
            };

            tokio::select! {
                update = self.receiver.recv() => match update {
                    Some(update) => {
                        self.apply(update);
                    }
                    None => break,
                },
                joined = handle => {
                    self.in_flight = None;
                    self.drain_updates();
                    if let Err(error) = joined {
                        self.fail_stopped_fetch(format!("fetch task failed: {error}"));
                    }
                }
            }
        }

        &self.state
    }

    /// Image of a point marker. Images are shared between markers with equal styles.
    pub fn image_for(&self, annotation: &PointAnnotation) -> Arc<I> {
        self.styler.image_for(&annotation.style)
    }

    /// Current state of the screen.
    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Screen configuration.
    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Styler providing marker images.
    pub fn styler(&self) -> &AnnotationStyler<R, F, I> {
        &self.styler
    }

    /// The map widget.
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// Mutable access to the map widget.
    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    fn drain_updates(&mut self) -> bool {
        let mut changed = false;
        while let Ok(update) = self.receiver.try_recv() {
            changed |= self.apply(update);
        }

        changed
    }

    fn fail_stopped_fetch(&mut self, message: String) {
        if self.state == ScreenState::Loading {
            warn!("{message}");
            self.state = ScreenState::Failed(CircleMapError::Generic(message));
        }
    }

    fn apply(&mut self, update: Update) -> bool {
        if update.generation != self.generation {
            debug!(
                "Dropping results of superseded fetch {} (current is {})",
                update.generation, self.generation
            );
            return false;
        }

        self.in_flight = None;
        match update.result {
            Ok(annotations) => {
                let points = annotations.iter().filter(|a| a.as_point().is_some()).count();
                let polygons = annotations.len() - points;

                self.widget.add_annotations(&annotations);
                let displayed = self.widget.annotations().to_vec();
                self.widget.show_annotations(&displayed);

                info!("Added {points} points and {polygons} circles to the map");
                self.state = ScreenState::Loaded { points, polygons };
            }
            Err(error) => {
                self.state = ScreenState::Failed(error);
            }
        }

        true
    }
}

impl<W, R, F, I, S> MapScreen<W, R, F, I, S> {
    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!("Aborting fetch {}", self.generation);
            }
            handle.abort();
        }
    }
}

impl<W, R, F, I, S> Drop for MapScreen<W, R, F, I, S> {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

/// Converts fetched points into annotations: a styled marker for every point and, if
/// `draw_circles` is set, a geodesic circle with a random radius (meters) from `circle_radius_range`
/// right after it.
pub fn build_annotations<R, F, I>(
    points: &[Coordinate],
    styler: &AnnotationStyler<R, F, I>,
    draw_circles: bool,
    circle_radius_range: RadiusRange,
) -> Vec<Annotation>
where
    R: RandomSource,
    F: Fn(&StyleKey) -> I,
{
    let mut annotations: Vec<Annotation> =
        Vec::with_capacity(points.len() * if draw_circles { 2 } else { 1 });
    for point in points {
        let style = styler.choose_style();
        annotations.push(
            PointAnnotation {
                coordinate: *point,
                style,
            }
            .into(),
        );

        if draw_circles {
            let radius = styler.choose_in(circle_radius_range) as f64;
            annotations.push(
                PolygonAnnotation {
                    polygon: CirclePolygon::new(point, radius),
                    color: style.color,
                }
                .into(),
            );
        }
    }

    annotations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::tests::{collection, StaticService};
    use crate::style::tests::Sequence;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use bytes::Bytes;
    use circlemap_types::geo::{Datum, NewGeoPoint};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const URL: &str = "https://example.com/feed.geojson";

    #[derive(Default)]
    struct TestWidget {
        annotations: Vec<Annotation>,
        add_calls: usize,
        shown: Vec<Annotation>,
    }

    impl MapWidget for TestWidget {
        fn add_annotations(&mut self, annotations: &[Annotation]) {
            self.add_calls += 1;
            self.annotations.extend_from_slice(annotations);
        }

        fn annotations(&self) -> &[Annotation] {
            &self.annotations
        }

        fn show_annotations(&mut self, annotations: &[Annotation]) {
            self.shown = annotations.to_vec();
        }
    }

    /// Never answers the first request.
    #[derive(Default)]
    struct StallingService {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PlatformService for StallingService {
        async fn load_bytes_from_url(&self, _url: &str) -> Result<Bytes, CircleMapError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }

            Ok(Bytes::from(collection(5)))
        }
    }

    #[derive(Clone, Default)]
    struct CountingMessenger(Arc<AtomicUsize>);

    impl Messenger for CountingMessenger {
        fn request_redraw(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn test_screen<S: PlatformService + 'static>(
        config: ScreenConfig,
        service: S,
    ) -> MapScreen<TestWidget, StdRng, DefaultRenderer, CircleImage, S> {
        let styler = AnnotationStyler::new(config.radius_range, StdRng::seed_from_u64(3));
        MapScreen::with_service(TestWidget::default(), config, styler, service).unwrap()
    }

    fn feed(count: usize) -> StaticService {
        StaticService(Ok(Bytes::from(collection(count))))
    }

    #[tokio::test]
    async fn loads_at_most_max_features() {
        let mut screen = test_screen(ScreenConfig::new(URL), feed(200));
        assert_eq!(screen.state(), &ScreenState::Idle);

        screen.activate();
        assert_eq!(screen.state(), &ScreenState::Loading);
        assert_eq!(
            screen.next_update().await,
            &ScreenState::Loaded {
                points: 50,
                polygons: 0
            }
        );

        let widget = screen.widget();
        assert_eq!(widget.add_calls, 1);
        assert_eq!(widget.annotations.len(), 50);
        assert_eq!(widget.shown, widget.annotations);
        for (i, annotation) in widget.annotations.iter().enumerate() {
            let point = annotation.as_point().unwrap();
            assert_eq!(point.coordinate, Coordinate::lonlat(i as f64 * 0.1, 45.0));
            assert!(RadiusRange::V1.contains(point.style.radius));
        }
    }

    #[tokio::test]
    async fn circles_follow_their_points() {
        let config = ScreenConfig::new(URL).with_circles(true);
        let mut screen = test_screen(config, feed(10));

        screen.activate();
        assert_eq!(
            screen.next_update().await,
            &ScreenState::Loaded {
                points: 10,
                polygons: 10
            }
        );

        let annotations = &screen.widget().annotations;
        assert_eq!(annotations.len(), 20);
        for pair in annotations.chunks(2) {
            let point = pair[0].as_point().unwrap();
            let circle = pair[1].as_polygon().unwrap();

            assert_eq!(circle.polygon.center(), point.coordinate);
            assert_eq!(circle.color, point.style.color);
            assert!((100.0..=119.0).contains(&circle.polygon.radius()));
            assert_eq!(circle.polygon.vertices().len(), 45);

            let distance = Datum::MEAN_SPHERE
                .great_circle_distance(&point.coordinate, &circle.polygon.vertices()[10]);
            assert_abs_diff_eq!(distance, circle.polygon.radius(), epsilon = 1e-6);
        }
    }

    #[tokio::test]
    async fn empty_feed_is_loaded_state() {
        let mut screen = test_screen(ScreenConfig::new(URL), feed(0));
        screen.activate();

        assert_eq!(
            screen.next_update().await,
            &ScreenState::Loaded {
                points: 0,
                polygons: 0
            }
        );
        assert_eq!(screen.widget().add_calls, 1);
    }

    #[tokio::test]
    async fn failures_are_distinguishable() {
        let service = StaticService(Err(CircleMapError::Network("offline".into())));
        let mut screen = test_screen(ScreenConfig::new(URL), service);
        screen.activate();
        assert_matches!(
            screen.next_update().await,
            ScreenState::Failed(CircleMapError::Network(_))
        );
        assert_eq!(screen.widget().add_calls, 0);

        let service = StaticService(Ok(Bytes::from_static(b"{\"type\": \"FeatureCollection\"}")));
        let mut screen = test_screen(ScreenConfig::new(URL), service);
        screen.activate();
        assert_matches!(
            screen.next_update().await,
            ScreenState::Failed(CircleMapError::Parse(_))
        );
        assert_eq!(screen.widget().add_calls, 0);
    }

    #[tokio::test]
    async fn reactivation_aborts_previous_fetch() {
        let mut screen = test_screen(ScreenConfig::new(URL), StallingService::default());

        screen.activate();
        tokio::task::yield_now().await;
        screen.activate();
        assert_eq!(
            screen.next_update().await,
            &ScreenState::Loaded {
                points: 5,
                polygons: 0
            }
        );
        assert_eq!(screen.widget().add_calls, 1);
    }

    #[tokio::test]
    async fn stale_results_are_dropped() {
        let mut screen = test_screen(ScreenConfig::new(URL), feed(3));
        screen.activate();
        screen.next_update().await;

        let stale = vec![Annotation::Point(PointAnnotation {
            coordinate: Coordinate::latlon(1.0, 1.0),
            style: StyleKey::new(10, crate::PaletteColor::Red),
        })];
        screen
            .sender
            .send(Update {
                generation: screen.generation - 1,
                result: Ok(stale),
            })
            .unwrap();

        assert!(!screen.process_events());
        assert_eq!(screen.widget().annotations.len(), 3);
    }

    #[tokio::test]
    async fn annotations_accumulate_across_activations() {
        let mut screen = test_screen(ScreenConfig::new(URL), feed(4));
        screen.activate();
        screen.next_update().await;
        screen.activate();
        screen.next_update().await;

        let widget = screen.widget();
        assert_eq!(widget.add_calls, 2);
        assert_eq!(widget.annotations.len(), 8);
        assert_eq!(widget.shown.len(), 8);
    }

    #[tokio::test]
    async fn deactivate_discards_in_flight_fetch() {
        let mut screen = test_screen(ScreenConfig::new(URL), feed(4));
        screen.activate();
        screen.deactivate();

        assert_eq!(screen.state(), &ScreenState::Idle);
        tokio::task::yield_now().await;
        assert!(!screen.process_events());
        assert_eq!(screen.widget().add_calls, 0);
    }

    #[tokio::test]
    async fn messenger_is_notified() {
        let messenger = CountingMessenger::default();
        let mut screen = test_screen(ScreenConfig::new(URL), feed(2)).with_messenger(messenger.clone());

        screen.activate();
        while messenger.0.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        assert!(screen.process_events());
        assert_eq!(
            screen.state(),
            &ScreenState::Loaded {
                points: 2,
                polygons: 0
            }
        );
    }

    #[tokio::test]
    async fn marker_images_are_shared() {
        let styler = AnnotationStyler::new(
            RadiusRange::V2,
            Sequence(VecDeque::from([3, 2, 3, 2])),
        );
        let config = ScreenConfig::new(URL).with_radius_range(RadiusRange::V2);
        let mut screen =
            MapScreen::with_service(TestWidget::default(), config, styler, feed(2)).unwrap();

        screen.activate();
        screen.next_update().await;

        let first = *screen.widget().annotations[0].as_point().unwrap();
        let second = *screen.widget().annotations[1].as_point().unwrap();
        assert_eq!(first.style, StyleKey::new(14, crate::PaletteColor::Green));
        assert_eq!(first.style, second.style);
        assert!(Arc::ptr_eq(&screen.image_for(&first), &screen.image_for(&second)));
        assert_eq!(screen.styler().cached_images(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let styler = AnnotationStyler::new(RadiusRange::V1, StdRng::seed_from_u64(0));
        let result = MapScreen::with_service(
            TestWidget::default(),
            ScreenConfig::default(),
            styler,
            feed(1),
        );
        assert!(matches!(result, Err(CircleMapError::Config(_))));
    }

    #[test]
    fn styler_range_must_match_config() {
        let styler = AnnotationStyler::new(RadiusRange::V1, StdRng::seed_from_u64(0));
        let config = ScreenConfig::new(URL).with_radius_range(RadiusRange::V2);
        let result = MapScreen::with_service(TestWidget::default(), config, styler, feed(1));
        assert!(matches!(result, Err(CircleMapError::Config(_))));
    }

    #[tokio::test]
    async fn configured_radius_range_is_used() {
        let config = ScreenConfig::from_json_str(
            r#"{"feed_url": "https://example.com/feed.geojson", "radius_range": {"min": 11, "max": 30}}"#,
        )
        .unwrap();
        let mut screen = test_screen(config, feed(50));
        screen.activate();
        screen.next_update().await;

        assert_eq!(screen.styler().radius_range(), RadiusRange::V2);
        for annotation in &screen.widget().annotations {
            assert!(RadiusRange::V2.contains(annotation.as_point().unwrap().style.radius));
        }
    }

    /// Panics on the first request for a random number.
    struct PanickingSource;

    impl RandomSource for PanickingSource {
        fn next_below(&mut self, _bound: u32) -> u32 {
            panic!("no randomness available");
        }
    }

    #[tokio::test]
    async fn panicking_fetch_task_fails_the_screen() {
        let styler = AnnotationStyler::new(RadiusRange::V1, PanickingSource);
        let mut screen =
            MapScreen::with_service(TestWidget::default(), ScreenConfig::new(URL), styler, feed(2))
                .unwrap();

        screen.activate();
        assert_matches!(
            screen.next_update().await,
            ScreenState::Failed(CircleMapError::Generic(_))
        );
        assert_eq!(screen.widget().add_calls, 0);
    }

    #[tokio::test]
    async fn polling_detects_stopped_fetch_task() {
        let styler = AnnotationStyler::new(RadiusRange::V1, PanickingSource);
        let mut screen =
            MapScreen::with_service(TestWidget::default(), ScreenConfig::new(URL), styler, feed(2))
                .unwrap();

        screen.activate();
        while !screen.in_flight.as_ref().is_some_and(|h| h.is_finished()) {
            tokio::task::yield_now().await;
        }

        assert!(screen.process_events());
        assert_matches!(screen.state(), ScreenState::Failed(CircleMapError::Generic(_)));
    }
}
