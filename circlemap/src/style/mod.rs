//! Random styling of point annotations and memoization of the rendered marker images.

mod marker;

pub use marker::{render_circle_image, CircleImage, MAX_MARKER_RADIUS, PADDING};

use crate::color::PaletteColor;
use crate::config::RadiusRange;
use ahash::{HashMap, HashMapExt};
use parking_lot::Mutex;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Visual style of a point marker. Markers with equal keys share one rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleKey {
    /// Radius of the circle in pixels.
    pub radius: u32,
    /// Color of the circle.
    pub color: PaletteColor,
}

impl StyleKey {
    /// Creates a new key.
    pub fn new(radius: u32, color: PaletteColor) -> Self {
        Self { radius, color }
    }

    /// Reuse identifier of the image, e.g. `circle-12-red`.
    pub fn identifier(&self) -> String {
        self.to_string()
    }
}

impl Display for StyleKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "circle-{}-{}", self.radius, self.color)
    }
}

/// Source of uniformly distributed random numbers.
///
/// Any [`rand::RngCore`] is a random source. Tests can provide scripted sequences.
pub trait RandomSource {
    /// Returns a number in `0..bound`. Returns 0 if `bound` is 0.
    fn next_below(&mut self, bound: u32) -> u32;
}

impl<T: RngCore> RandomSource for T {
    fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }

        self.gen_range(0..bound)
    }
}

/// Default marker renderer.
pub type DefaultRenderer = fn(&StyleKey) -> CircleImage;

/// Chooses random styles for point markers and provides images for them.
///
/// Images are rendered by the `renderer` function given at construction and cached by their
/// [`StyleKey`]: requesting an image for a key that was seen before returns the same [`Arc`].
pub struct AnnotationStyler<R, F = DefaultRenderer, I = CircleImage> {
    radius_range: RadiusRange,
    random: Mutex<R>,
    renderer: F,
    images: Mutex<HashMap<StyleKey, Arc<I>>>,
}

impl<R: RandomSource> AnnotationStyler<R> {
    /// Creates a styler drawing markers with [`render_circle_image`].
    pub fn new(radius_range: RadiusRange, random: R) -> Self {
        Self::with_renderer(radius_range, random, render_circle_image)
    }
}

impl<R, F, I> AnnotationStyler<R, F, I>
where
    R: RandomSource,
    F: Fn(&StyleKey) -> I,
{
    /// Creates a styler drawing markers with the given function.
    pub fn with_renderer(radius_range: RadiusRange, random: R, renderer: F) -> Self {
        Self {
            radius_range,
            random: Mutex::new(random),
            renderer,
            images: Mutex::new(HashMap::new()),
        }
    }

    /// Range marker radii are chosen from.
    pub fn radius_range(&self) -> RadiusRange {
        self.radius_range
    }

    /// Picks a radius uniformly from the radius range and a color uniformly from the palette.
    pub fn choose_style(&self) -> StyleKey {
        let mut random = self.random.lock();
        let radius = self.radius_range.min() + random.next_below(self.radius_range.count());
        let color = PaletteColor::ALL[random.next_below(PaletteColor::ALL.len() as u32) as usize];

        StyleKey::new(radius, color)
    }

    /// Picks a value uniformly from the given range, e.g. a circle radius in meters.
    pub fn choose_in(&self, range: RadiusRange) -> u32 {
        range.min() + self.random.lock().next_below(range.count())
    }

    /// Returns the image for the style, rendering it only if there is no cached image for this key.
    pub fn image_for(&self, key: &StyleKey) -> Arc<I> {
        let mut images = self.images.lock();
        if let Some(image) = images.get(key) {
            return image.clone();
        }

        let image = Arc::new((self.renderer)(key));
        images.insert(*key, image.clone());

        image
    }

    /// Number of images in the cache.
    pub fn cached_images(&self) -> usize {
        self.images.lock().len()
    }
}
