//! Contrast ratios and WCAG AA classification.
//!
//! The ratio between two colors is `(L_lighter + 0.05) / (L_darker + 0.05)`,
//! always in `1.0..=21.0` regardless of argument order. WCAG AA requires:
//!
//! | Text size | Required ratio |
//! |-----------|----------------|
//! | normal    | 4.5:1          |
//! | large     | 3.0:1          |
//!
//! A ratio exactly equal to the requirement passes.
//!
//! # Example
//!
//! ```rust
//! use tokenaudit::{validate_contrast, TextSize};
//!
//! let result = validate_contrast("0 0% 0%", "0 0% 100%", TextSize::Normal).unwrap();
//! assert!(result.meets_aa);
//! assert!((result.ratio - 21.0).abs() < 1e-9);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::HslColor;
use crate::error::ColorError;
use crate::luminance::relative_luminance;

/// Minimum ratio for normal text under WCAG AA.
pub const AA_NORMAL: f64 = 4.5;
/// Minimum ratio for large text under WCAG AA.
pub const AA_LARGE: f64 = 3.0;

const MIN_RATIO: f64 = 1.0;
const MAX_RATIO: f64 = 21.0;

/// WCAG text-size category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    /// Body text.
    #[default]
    Normal,
    /// At least 18pt, or 14pt bold.
    Large,
}

impl TextSize {
    /// The AA ratio this size must reach.
    pub fn required_ratio(self) -> f64 {
        match self {
            TextSize::Normal => AA_NORMAL,
            TextSize::Large => AA_LARGE,
        }
    }
}

impl fmt::Display for TextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextSize::Normal => write!(f, "normal"),
            TextSize::Large => write!(f, "large"),
        }
    }
}

/// Outcome of validating one foreground/background pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContrastResult {
    /// Contrast ratio in `1.0..=21.0`.
    pub ratio: f64,
    /// Whether the ratio reaches `required_ratio`.
    pub meets_aa: bool,
    /// 4.5 for normal text, 3.0 for large text.
    pub required_ratio: f64,
    /// Size category the ratio was judged against.
    pub text_size: TextSize,
}

impl ContrastResult {
    /// Classifies an already-computed ratio.
    pub fn from_ratio(ratio: f64, text_size: TextSize) -> Self {
        let required_ratio = text_size.required_ratio();
        Self {
            ratio,
            meets_aa: ratio >= required_ratio,
            required_ratio,
            text_size,
        }
    }
}

/// A resolved foreground/background pair submitted for validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorCombination {
    pub foreground: HslColor,
    pub background: HslColor,
    /// Human-readable locator for the pair (token names, file and line, ...).
    pub context: String,
    pub text_size: TextSize,
}

impl ColorCombination {
    /// Creates a normal-text combination.
    pub fn new(foreground: HslColor, background: HslColor, context: impl Into<String>) -> Self {
        Self {
            foreground,
            background,
            context: context.into(),
            text_size: TextSize::Normal,
        }
    }

    /// Sets the text size, returning `self` for chaining.
    pub fn with_text_size(mut self, text_size: TextSize) -> Self {
        self.text_size = text_size;
        self
    }

    /// Validates this combination.
    pub fn validate(&self) -> ContrastResult {
        validate(self.foreground, self.background, self.text_size)
    }
}

/// A combination paired with its verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContrastValidation {
    pub combination: ColorCombination,
    pub result: ContrastResult,
}

/// Computes the WCAG contrast ratio between two colors.
///
/// Argument order does not matter.
pub fn contrast_ratio(a: HslColor, b: HslColor) -> f64 {
    let la = relative_luminance(a.to_rgb());
    let lb = relative_luminance(b.to_rgb());
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    ((lighter + 0.05) / (darker + 0.05)).clamp(MIN_RATIO, MAX_RATIO)
}

/// Validates a foreground/background pair against WCAG AA.
pub fn validate(foreground: HslColor, background: HslColor, text_size: TextSize) -> ContrastResult {
    ContrastResult::from_ratio(contrast_ratio(foreground, background), text_size)
}

/// Parses both colors and validates them against WCAG AA.
pub fn validate_contrast(
    foreground: &str,
    background: &str,
    text_size: TextSize,
) -> Result<ContrastResult, ColorError> {
    let fg = HslColor::parse(foreground)?;
    let bg = HslColor::parse(background)?;
    Ok(validate(fg, bg, text_size))
}

/// Validates every combination, preserving input order.
pub fn validate_color_combinations(combinations: &[ColorCombination]) -> Vec<ContrastValidation> {
    combinations
        .iter()
        .map(|combination| ContrastValidation {
            combination: combination.clone(),
            result: combination.validate(),
        })
        .collect()
}
