//! HSL color values and their conversion to sRGB.
//!
//! Theme tokens store colors as bare HSL triples, the shape used by CSS
//! custom properties that are later wrapped in `hsl(var(--token))`:
//!
//! - Bare triple: `222.2 84% 4.9%`
//! - Wrapped: `hsl(222.2 84% 4.9%)`
//!
//! Components are whitespace separated. Saturation and lightness carry a `%`
//! suffix. Commas, alpha channels and other color functions are rejected with
//! [`ColorError::Malformed`], and out-of-range components are rejected with
//! [`ColorError::OutOfRange`] rather than clamped.
//!
//! # Example
//!
//! ```rust
//! use tokenaudit::{HslColor, Rgb};
//!
//! let color = HslColor::parse("hsl(0 0% 100%)").unwrap();
//! assert_eq!(color.to_rgb(), Rgb(255, 255, 255));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ColorError;

/// A simple RGB color triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// A color in HSL space.
///
/// Hue is in degrees (`0..=360`), saturation and lightness are percentages
/// (`0..=100`). Values are immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslColor {
    hue: f64,
    saturation: f64,
    lightness: f64,
}

impl HslColor {
    /// Creates a color from its components, validating each range.
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Result<Self, ColorError> {
        let input = format!("{} {}% {}%", hue, saturation, lightness);
        check_range(&input, "hue", hue, 360.0)?;
        check_range(&input, "saturation", saturation, 100.0)?;
        check_range(&input, "lightness", lightness, 100.0)?;
        Ok(Self {
            hue,
            saturation,
            lightness,
        })
    }

    /// Parses `H S% L%` or `hsl(H S% L%)`.
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        let trimmed = s.trim();
        let malformed = || ColorError::Malformed {
            input: s.to_string(),
        };

        let inner = match trimmed.strip_prefix("hsl(") {
            Some(rest) => rest.strip_suffix(')').ok_or_else(malformed)?.trim(),
            None => trimmed,
        };

        let parts: Vec<&str> = inner.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(malformed());
        }

        let hue = parse_number(parts[0]).ok_or_else(malformed)?;
        let saturation = parts[1]
            .strip_suffix('%')
            .and_then(parse_number)
            .ok_or_else(malformed)?;
        let lightness = parts[2]
            .strip_suffix('%')
            .and_then(parse_number)
            .ok_or_else(malformed)?;

        check_range(s, "hue", hue, 360.0)?;
        check_range(s, "saturation", saturation, 100.0)?;
        check_range(s, "lightness", lightness, 100.0)?;

        Ok(Self {
            hue,
            saturation,
            lightness,
        })
    }

    /// Hue in degrees.
    pub fn hue(&self) -> f64 {
        self.hue
    }

    /// Saturation as a percentage.
    pub fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Lightness as a percentage.
    pub fn lightness(&self) -> f64 {
        self.lightness
    }

    /// Converts to sRGB.
    ///
    /// Total for every valid color: channels are rounded to the nearest
    /// integer and clamped to `0..=255`.
    pub fn to_rgb(&self) -> Rgb {
        let h = (self.hue % 360.0) / 360.0;
        let s = self.saturation / 100.0;
        let l = self.lightness / 100.0;

        if s == 0.0 {
            let v = to_channel(l);
            return Rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgb(
            to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            to_channel(hue_to_rgb(p, q, h)),
            to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}% {}%", self.hue, self.saturation, self.lightness)
    }
}

impl FromStr for HslColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HslColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_number(s: &str) -> Option<f64> {
    // Rust accepts "inf"/"NaN", CSS does not.
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
    {
        return None;
    }
    s.parse::<f64>().ok()
}

fn check_range(
    input: &str,
    component: &'static str,
    value: f64,
    max: f64,
) -> Result<(), ColorError> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(ColorError::OutOfRange {
            input: input.to_string(),
            component,
            value,
        })
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
