use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Color representation.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    /// Transparent color: `#00000000`
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Red color: `#FF0000FF`
    pub const RED: Color = Color::rgba(255, 0, 0, 255);
    /// Green color: `#00FF00FF`
    pub const GREEN: Color = Color::rgba(0, 255, 0, 255);
    /// Blue color: `#0000FFFF`
    pub const BLUE: Color = Color::rgba(0, 0, 255, 255);
    /// Purple color: `#800080FF`
    pub const PURPLE: Color = Color::rgba(128, 0, 128, 255);
    /// Magenta color: `#FF00FFFF`
    pub const MAGENTA: Color = Color::rgba(255, 0, 255, 255);
    /// Yellow color: `#FFFF00FF`
    pub const YELLOW: Color = Color::rgba(255, 255, 0, 255);

    /// Constructs color from its RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Converts the color into u8 array (RGBA).
    pub fn to_u8_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns a new color instance, copied from the base one but with the given alpha channel.
    pub fn with_alpha(&self, a: u8) -> Self {
        Self { a, ..*self }
    }

    /// Returns a new color with the alpha channel set to `opacity` (`0.0..=1.0`) of full opacity.
    pub fn with_opacity(&self, opacity: f32) -> Self {
        self.with_alpha((opacity.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Opacity component of the color.
    pub fn a(&self) -> u8 {
        self.a
    }
}

/// One of the six colors circle annotations are painted with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteColor {
    /// Red
    Red,
    /// Blue
    Blue,
    /// Green
    Green,
    /// Purple
    Purple,
    /// Magenta
    Magenta,
    /// Yellow
    Yellow,
}

impl PaletteColor {
    /// All palette entries in the order random indices are mapped to.
    pub const ALL: [PaletteColor; 6] = [
        PaletteColor::Red,
        PaletteColor::Blue,
        PaletteColor::Green,
        PaletteColor::Purple,
        PaletteColor::Magenta,
        PaletteColor::Yellow,
    ];

    /// Name of the color, as used in style identifiers.
    pub fn name(&self) -> &'static str {
        match self {
            PaletteColor::Red => "red",
            PaletteColor::Blue => "blue",
            PaletteColor::Green => "green",
            PaletteColor::Purple => "purple",
            PaletteColor::Magenta => "magenta",
            PaletteColor::Yellow => "yellow",
        }
    }

    /// Opaque RGBA value of the color.
    pub fn color(&self) -> Color {
        match self {
            PaletteColor::Red => Color::RED,
            PaletteColor::Blue => Color::BLUE,
            PaletteColor::Green => Color::GREEN,
            PaletteColor::Purple => Color::PURPLE,
            PaletteColor::Magenta => Color::MAGENTA,
            PaletteColor::Yellow => Color::YELLOW,
        }
    }
}

impl Display for PaletteColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
