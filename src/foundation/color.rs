use palette::{FromColor, Hsl, Srgb};

/// Largest possible Euclidean distance between two 8-bit RGB colors.
pub const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;

/// An opaque 8-bit sRGB color, the unit of every color comparison in the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (alpha is ignored). The leading `#` is optional.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return None;
        }

        fn hex_byte(pair: &str) -> Option<u8> {
            u8::from_str_radix(pair, 16).ok()
        }

        match s.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in s.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 16 + v;
                }
                Some(Self::new(out[0], out[1], out[2]))
            }
            6 | 8 => Some(Self::new(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            _ => None,
        }
    }

    /// Uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Euclidean distance in RGB space, in `[0, MAX_RGB_DISTANCE]`.
    pub fn distance(self, other: Self) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Convert to HSL (hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`).
    pub fn to_hsl(self) -> HslColor {
        let rgb = Srgb::new(
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        );
        let hsl: Hsl = Hsl::from_color(rgb);
        let mut hue = f64::from(hsl.hue.into_positive_degrees());
        if hue >= 360.0 {
            hue -= 360.0;
        }
        HslColor {
            hue,
            saturation: f64::from(hsl.saturation),
            lightness: f64::from(hsl.lightness),
        }
    }

    /// Convert back from HSL, clamping saturation and lightness.
    pub fn from_hsl(c: HslColor) -> Self {
        fn to_u8(x: f32) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        let hsl: Hsl = Hsl::new(
            c.hue.rem_euclid(360.0) as f32,
            c.saturation.clamp(0.0, 1.0) as f32,
            c.lightness.clamp(0.0, 1.0) as f32,
        );
        let rgb: Srgb = Srgb::from_color(hsl);
        Self::new(to_u8(rgb.red), to_u8(rgb.green), to_u8(rgb.blue))
    }
}

/// HSL triple with hue in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HslColor {
    /// Hue in degrees.
    pub hue: f64,
    /// Saturation in `[0, 1]`.
    pub saturation: f64,
    /// Lightness in `[0, 1]`.
    pub lightness: f64,
}

impl HslColor {
    /// Rotate the hue, wrapping into `[0, 360)`.
    pub fn rotate(self, degrees: f64) -> Self {
        Self {
            hue: (self.hue + degrees).rem_euclid(360.0),
            ..self
        }
    }

    /// Scale saturation and shift lightness, both clamped to `[0, 1]`.
    pub fn adjust(self, saturation_mul: f64, lightness_delta: f64) -> Self {
        Self {
            hue: self.hue,
            saturation: (self.saturation * saturation_mul).clamp(0.0, 1.0),
            lightness: (self.lightness + lightness_delta).clamp(0.0, 1.0),
        }
    }

    /// Format as uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        Rgb8::from_hsl(self).to_hex()
    }
}

/// Normalize a hex string to uppercase `#RRGGBB`, or `None` when it does not parse.
pub fn normalize_hex(s: &str) -> Option<String> {
    Rgb8::parse_hex(s).map(Rgb8::to_hex)
}

/// Whether `a` and `b` are within `tolerance` (fraction of [`MAX_RGB_DISTANCE`]) of each other.
pub fn within_tolerance(a: Rgb8, b: Rgb8, tolerance: f64) -> bool {
    a.distance(b) <= tolerance * MAX_RGB_DISTANCE
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
