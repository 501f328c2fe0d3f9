//! Loads a GeoJSON feed and prints the annotations the screen hands to the map widget.
//!
//! ```sh
//! cargo run --example feed_screen -- https://example.com/points.geojson --circles
//! ```

use anyhow::Context;
use circlemap::circlemap_types::GeoPoint;
use circlemap::{
    Annotation, AnnotationStyler, MapScreen, MapWidget, RadiusRange, ScreenConfig, ScreenState,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Default)]
struct PrintingWidget {
    annotations: Vec<Annotation>,
}

impl MapWidget for PrintingWidget {
    fn add_annotations(&mut self, annotations: &[Annotation]) {
        self.annotations.extend_from_slice(annotations);
    }

    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn show_annotations(&mut self, annotations: &[Annotation]) {
        let (mut min_lat, mut max_lat) = (f64::MAX, f64::MIN);
        let (mut min_lon, mut max_lon) = (f64::MAX, f64::MIN);
        for anchor in annotations.iter().map(Annotation::anchor) {
            min_lat = min_lat.min(anchor.lat());
            max_lat = max_lat.max(anchor.lat());
            min_lon = min_lon.min(anchor.lon());
            max_lon = max_lon.max(anchor.lon());
        }

        if !annotations.is_empty() {
            println!("Viewport: lat {min_lat:.4}..{max_lat:.4}, lon {min_lon:.4}..{max_lon:.4}");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .or_else(|| std::env::var("CIRCLEMAP_FEED_URL").ok())
        .context("usage: feed_screen <url> [--circles]")?;
    let draw_circles = args.any(|arg| arg == "--circles");

    let config = ScreenConfig::new(url)
        .with_radius_range(RadiusRange::V2)
        .with_circles(draw_circles);
    let styler = AnnotationStyler::new(config.radius_range, StdRng::from_entropy());
    let mut screen = MapScreen::new(PrintingWidget::default(), config, styler)?;

    screen.activate();
    if let ScreenState::Failed(error) = screen.next_update().await {
        anyhow::bail!("failed to load the feed: {error}");
    }

    for annotation in screen.widget().annotations() {
        match annotation {
            Annotation::Point(point) => {
                let image = screen.image_for(point);
                println!(
                    "{:>9.4} {:>9.4}  {} ({}x{})",
                    point.coordinate.lat(),
                    point.coordinate.lon(),
                    point.style,
                    image.dimensions().0,
                    image.dimensions().1,
                );
            }
            Annotation::Polygon(circle) => {
                println!(
                    "          circle of {} m with {} vertices",
                    circle.polygon.radius(),
                    circle.polygon.vertices().len()
                );
            }
        }
    }

    println!(
        "{} images rendered for {} annotations",
        screen.styler().cached_images(),
        screen.widget().annotations().len()
    );

    Ok(())
}
