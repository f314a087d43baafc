//! Relative luminance per the WCAG 2.x definition.
//!
//! Each sRGB channel is normalized to `0.0..=1.0` and linearized with the
//! WCAG piecewise curve (breakpoint `0.03928`, gamma `2.4`). The linear
//! channels are then weighted:
//!
//! ```text
//! L = 0.2126 * R + 0.7152 * G + 0.0722 * B
//! ```
//!
//! The WCAG breakpoint differs slightly from the IEC sRGB value `0.04045`.
//! Pass/fail outcomes at real-world boundaries depend on it, so it is kept.

use crate::color::Rgb;

/// Channel breakpoint below which linearization is a straight division.
pub const LINEAR_BREAKPOINT: f64 = 0.03928;

const RED_WEIGHT: f64 = 0.2126;
const GREEN_WEIGHT: f64 = 0.7152;
const BLUE_WEIGHT: f64 = 0.0722;

/// Converts an sRGB component (0–255) to linear light (0.0–1.0).
pub fn channel_to_linear(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= LINEAR_BREAKPOINT {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Computes the relative luminance of an sRGB color.
///
/// Returns a value in `0.0..=1.0` where 0 is black and 1 is white.
pub fn relative_luminance(rgb: Rgb) -> f64 {
    let l = RED_WEIGHT * channel_to_linear(rgb.0)
        + GREEN_WEIGHT * channel_to_linear(rgb.1)
        + BLUE_WEIGHT * channel_to_linear(rgb.2);
    l.clamp(0.0, 1.0)
}
