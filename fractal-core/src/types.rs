use glam::Vec2;

use crate::error::ConfigError;

/// A position on the drawing surface, in surface pixels.
///
/// The origin is the top-left corner and `y` grows downward, so an angle
/// of `-90` degrees points straight up.
pub type Point = Vec2;

/// Identifier for a tree in a [`crate::scene::Scene`].
///
/// This is an index into `Scene::trees`, and is only meaningful until the
/// scene is next cleared.
pub type TreeId = usize;

/// An 8-bit RGBA stroke color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses a CSS-style hex color.
    ///
    /// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`; the leading `#` is optional.
    ///
    /// ### Returns
    /// The parsed color, or [`ConfigError::InvalidColor`] carrying the input.
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(s.to_owned());
        let digits = s.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let nibble = |i: usize| {
            u8::from_str_radix(&digits[i..=i], 16)
                .map(|v| v * 17)
                .map_err(|_| invalid())
        };
        match digits.len() {
            3 => Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => Err(invalid()),
        }
    }

    /// Formats the color as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
