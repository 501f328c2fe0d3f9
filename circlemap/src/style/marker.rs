use crate::color::Color;
use crate::style::StyleKey;
use image::{Rgba, RgbaImage};

/// Transparent padding around the circle, in pixels.
pub const PADDING: u32 = 2;

/// Largest circle radius drawn, in pixels. Larger radii are drawn with this one.
pub const MAX_MARKER_RADIUS: u32 = 1024;

const FILL_OPACITY: f32 = 0.25;
const STROKE_OPACITY: f32 = 0.75;
const STROKE_WIDTH: f64 = 1.0;

/// Rendered image of a circle marker.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleImage {
    key: StyleKey,
    image: RgbaImage,
}

impl CircleImage {
    /// Style the image was rendered with.
    pub fn key(&self) -> StyleKey {
        self.key
    }

    /// RGBA pixels of the image.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Width and height of the image.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Color of the pixel at the given position.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let (width, height) = self.image.dimensions();
        if x >= width || y >= height {
            return None;
        }

        let [r, g, b, a] = self.image.get_pixel(x, y).0;
        Some(Color::rgba(r, g, b, a))
    }
}

/// Draws a circle marker for the given style.
///
/// The image is a square with the side of `2 * radius + PADDING`. The circle is inscribed into the
/// square inset by `2 * PADDING` from every edge, filled with the style color at 25% opacity and
/// outlined with a 1px line of the same color at 75% opacity.
///
/// The radius is clamped to [`MAX_MARKER_RADIUS`].
pub fn render_circle_image(key: &StyleKey) -> CircleImage {
    let side = key.radius.min(MAX_MARKER_RADIUS) * 2 + PADDING;
    let inset = (PADDING * 2) as f64;
    let center = side as f64 / 2.0;
    let circle_radius = (center - inset).max(0.0);

    let fill = key.color.color().with_opacity(FILL_OPACITY);
    let stroke = key.color.color().with_opacity(STROKE_OPACITY);

    let image = RgbaImage::from_fn(side, side, |x, y| {
        let dx = x as f64 + 0.5 - center;
        let dy = y as f64 + 0.5 - center;
        let distance = (dx * dx + dy * dy).sqrt();

        let color = if (distance - circle_radius).abs() <= STROKE_WIDTH / 2.0 {
            stroke
        } else if distance < circle_radius {
            fill
        } else {
            Color::TRANSPARENT
        };

        Rgba(color.to_u8_array())
    });

    CircleImage { key: *key, image }
}
