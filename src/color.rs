use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Truecolor RGB triple used everywhere a draw call needs a color.
/// Serializes as a "RRGGBB" hex string so config files stay readable.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b))
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex)
            .ok_or_else(|| D::Error::custom(format!("invalid hex color {hex:?}, expected RRGGBB")))
    }
}

pub const WHITE: Rgb = Rgb::new(255, 255, 255);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// HSL to RGB. Hue in degrees (wraps), saturation and lightness in 0..1.
    pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = lightness - c / 2.0;

        let (r, g, b) = if h < 1.0 {
            (c, x, 0.0)
        } else if h < 2.0 {
            (x, c, 0.0)
        } else if h < 3.0 {
            (0.0, c, x)
        } else if h < 4.0 {
            (0.0, x, c)
        } else if h < 5.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        Self::new(
            ((r + m) * 255.0).round() as u8,
            ((g + m) * 255.0).round() as u8,
            ((b + m) * 255.0).round() as u8,
        )
    }

    /// Parses "RRGGBB" or "#RRGGBB".
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::new(r, g, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_primaries() {
        assert_eq!(Rgb::hsl(0.0, 1.0, 0.5), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::hsl(120.0, 1.0, 0.5), Rgb::new(0, 255, 0));
        assert_eq!(Rgb::hsl(240.0, 1.0, 0.5), Rgb::new(0, 0, 255));
    }

    #[test]
    fn hsl_wraps_hue() {
        assert_eq!(Rgb::hsl(360.0, 1.0, 0.5), Rgb::hsl(0.0, 1.0, 0.5));
        assert_eq!(Rgb::hsl(-120.0, 1.0, 0.5), Rgb::hsl(240.0, 1.0, 0.5));
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgb::from_hex("ffcf6b"), Some(Rgb::new(255, 207, 107)));
        assert_eq!(Rgb::from_hex("#030408"), Some(Rgb::new(3, 4, 8)));
        assert_eq!(Rgb::from_hex("xyzxyz"), None);
        assert_eq!(Rgb::from_hex("fff"), None);
    }
}
