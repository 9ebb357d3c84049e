use std::fmt;

/// Simple RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Relative luminance in [0, 1], used to pick a readable label color.
    pub fn luminance(self) -> f64 {
        0.2126f64.mul_add(
            f64::from(self.r) / 255.0,
            0.7152f64.mul_add(f64::from(self.g) / 255.0, 0.0722 * f64::from(self.b) / 255.0),
        )
    }

    pub fn is_light(self) -> bool {
        self.luminance() > 0.6
    }
}

impl fmt::Display for Rgb {
    /// CSS hex form: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(color: Rgb) -> Self {
        Self::Rgb(color.r, color.g, color.b)
    }
}
