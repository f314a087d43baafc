//! Candidate color pairs mined from component sources.
//!
//! # Motivation
//!
//! Components reference theme tokens through utility classes:
//!
//! ```tsx
//! <button className="bg-primary text-primary-foreground hover:bg-primary/90">
//! ```
//!
//! A class list that sets both a text color and a background color is a
//! pair worth checking. Finding these is pattern matching, not analysis: a
//! candidate says the two tokens *may* be rendered together, nothing more.
//!
//! # Design
//!
//! Every string literal (`"…"`, `'…'`, `` `…` ``) is treated as a possible
//! class list. Within one list:
//!
//! - `text-<token>` is a foreground, `bg-<token>` a background
//! - variant prefixes (`hover:`, `dark:`, `md:hover:`) split classes into
//!   groups; a variant group borrows the missing side from the base group
//! - groups with a `dark` variant only apply in dark mode, and when a plain
//!   `dark:` group exists the base pairs only apply in light mode
//! - opacity modifiers (`/90`) and important markers (`!`) are dropped
//! - `bg-[var(--token)]` arbitrary values count as token references
//!
//! Palette classes (`text-red-500`, `bg-white`) and other arbitrary values
//! (`bg-[#fff]`) bypass the token system. They are reported separately by
//! [`scan_hardcoded_colors`] and never paired.
//!
//! Text size comes from the same list: `text-2xl` and larger is large text,
//! as is `text-xl` with `font-bold`, `font-extrabold` or `font-black`.
//!
//! Extraction sits behind [`CandidateExtractor`] so a real parser can
//! replace it without touching validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::contrast::TextSize;
use crate::theme::ColorMode;

const SNIPPET_LEN: usize = 80;

static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""((?:[^"\\\n]|\\.)*)"|'((?:[^'\\\n]|\\.)*)'|`([^`]*)`"#)
        .expect("string literal pattern is valid")
});

static PALETTE_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:slate|gray|zinc|neutral|stone|red|orange|amber|yellow|lime|green|emerald|teal|cyan|sky|blue|indigo|violet|purple|fuchsia|pink|rose)-(?:50|[1-9]00|950)$",
    )
    .expect("palette pattern is valid")
});

static ARBITRARY_VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(?:color:)?(?:hsl\()?var\(--([\w-]+)\)\)?\]$")
        .expect("arbitrary var pattern is valid")
});

/// Arbitrary values that are color literals: `#hex`, color functions or a
/// `color:` type hint.
static ARBITRARY_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:color:|#[0-9a-fA-F]{3,8}$|(?:rgba?|hsla?|hwb|lab|lch|oklab|oklch|color)\()")
        .expect("arbitrary color pattern is valid")
});

const SIZE_SCALE: &[&str] = &[
    "xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl", "5xl", "6xl", "7xl", "8xl", "9xl",
];

const TEXT_NON_COLOR: &[&str] = &[
    "left", "center", "right", "justify", "start", "end", "wrap", "nowrap", "balance", "pretty",
    "ellipsis", "clip",
];

const BG_NON_COLOR: &[&str] = &[
    "none", "fixed", "local", "scroll", "cover", "contain", "auto", "center", "top", "bottom",
    "left", "right", "left-top", "left-bottom", "right-top", "right-bottom", "repeat",
    "no-repeat", "repeat-x", "repeat-y", "repeat-round", "repeat-space",
];

const BG_NON_COLOR_PREFIXES: &[&str] = &[
    "clip-", "origin-", "gradient-", "blend-", "linear-", "radial-", "conic-", "opacity-",
];

const NEUTRAL_VALUES: &[&str] = &["transparent", "current", "currentColor", "inherit"];

const LARGE_SIZES: &[&str] = &["2xl", "3xl", "4xl", "5xl", "6xl", "7xl", "8xl", "9xl"];
const BOLD_WEIGHTS: &[&str] = &["font-bold", "font-extrabold", "font-black"];

/// A foreground/background token pair found in source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Foreground token name.
    pub foreground: String,
    /// Background token name.
    pub background: String,
    /// `<origin>:<line>: <snippet>`, plus the variant in brackets if any.
    pub context: String,
    pub text_size: TextSize,
    /// Set when the pair only renders in one mode.
    pub mode: Option<ColorMode>,
}

impl Candidate {
    /// Whether this candidate applies when rendering in `mode`.
    pub fn applies_to(&self, mode: ColorMode) -> bool {
        self.mode.map_or(true, |m| m == mode)
    }
}

/// A color class that bypasses the token system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardcodedColor {
    pub origin: String,
    pub line: usize,
    /// The class as written, variants included.
    pub class: String,
    pub context: String,
}

/// Finds candidate token pairs in source text.
pub trait CandidateExtractor: Send + Sync {
    /// Returns candidates in order of appearance. No match is not an error.
    fn extract_candidates(&self, origin: &str, text: &str) -> Vec<Candidate>;
}

/// Utility-class extractor described in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassListExtractor;

impl CandidateExtractor for ClassListExtractor {
    fn extract_candidates(&self, origin: &str, text: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for literal in class_literals(text) {
            pair_literal(origin, &literal, &mut candidates);
        }
        tracing::debug!(origin, found = candidates.len(), "extracted candidates");
        candidates
    }
}

/// Finds color classes that use palette or arbitrary values.
pub fn scan_hardcoded_colors(origin: &str, text: &str) -> Vec<HardcodedColor> {
    let mut found = Vec::new();
    for literal in class_literals(text) {
        for class in &literal.classes {
            if let ColorClass::Hardcoded = classify(split_variants(class).1) {
                found.push(HardcodedColor {
                    origin: origin.to_string(),
                    line: literal.line,
                    class: class.to_string(),
                    context: literal.locator(origin),
                });
            }
        }
    }
    found
}

struct ClassLiteral<'a> {
    line: usize,
    content: &'a str,
    classes: Vec<&'a str>,
}

impl ClassLiteral<'_> {
    fn locator(&self, origin: &str) -> String {
        format!("{}:{}: {}", origin, self.line, snippet(self.content))
    }
}

fn class_literals(text: &str) -> Vec<ClassLiteral<'_>> {
    let mut literals = Vec::new();
    let mut line = 1;
    let mut scanned = 0;

    for caps in STRING_LITERAL.captures_iter(text) {
        let Some(m) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
            continue;
        };
        line += text[scanned..m.start()].matches('\n').count();
        scanned = m.start();

        let content = m.as_str();
        let classes: Vec<&str> = content.split_whitespace().collect();
        let has_color_class = classes.iter().any(|c| {
            let utility = split_variants(c).1;
            utility.starts_with("text-") || utility.starts_with("bg-")
        });
        if has_color_class {
            literals.push(ClassLiteral {
                line,
                content,
                classes,
            });
        }
    }
    literals
}

fn snippet(content: &str) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= SNIPPET_LEN {
        collapsed
    } else {
        let cut: String = collapsed.chars().take(SNIPPET_LEN).collect();
        format!("{}...", cut)
    }
}

/// Splits `md:hover:bg-primary` into (`md:hover`, `bg-primary`).
///
/// Colons inside `[...]` belong to the utility.
fn split_variants(class: &str) -> (&str, &str) {
    let class = class.trim_start_matches('!');
    let mut depth = 0i32;
    let mut split_at = None;
    for (i, c) in class.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            ':' if depth == 0 => split_at = Some(i),
            _ => {}
        }
    }
    let (variants, utility) = match split_at {
        Some(i) => (&class[..i], &class[i + 1..]),
        None => ("", class),
    };
    let utility = utility.trim_start_matches('!').trim_end_matches('!');
    (variants, utility)
}

enum ColorClass<'a> {
    Foreground(&'a str),
    Background(&'a str),
    Hardcoded,
    Other,
}

fn classify(utility: &str) -> ColorClass<'_> {
    if let Some(value) = utility.strip_prefix("text-") {
        if SIZE_SCALE.contains(&value)
            || TEXT_NON_COLOR.contains(&value)
            || value.starts_with("opacity-")
        {
            return ColorClass::Other;
        }
        match color_value(value) {
            ColorValue::Token(t) => ColorClass::Foreground(t),
            ColorValue::Hardcoded => ColorClass::Hardcoded,
            ColorValue::Neutral => ColorClass::Other,
        }
    } else if let Some(value) = utility.strip_prefix("bg-") {
        if BG_NON_COLOR.contains(&value)
            || BG_NON_COLOR_PREFIXES.iter().any(|p| value.starts_with(p))
        {
            return ColorClass::Other;
        }
        match color_value(value) {
            ColorValue::Token(t) => ColorClass::Background(t),
            ColorValue::Hardcoded => ColorClass::Hardcoded,
            ColorValue::Neutral => ColorClass::Other,
        }
    } else {
        ColorClass::Other
    }
}

enum ColorValue<'a> {
    Token(&'a str),
    Hardcoded,
    Neutral,
}

fn color_value(value: &str) -> ColorValue<'_> {
    if value.starts_with('[') {
        // arbitrary values may contain '/', so no opacity stripping here
        if let Some(m) = ARBITRARY_VAR.captures(value).and_then(|c| c.get(1)) {
            return ColorValue::Token(m.as_str());
        }
        return match value[1..].split_once(']') {
            Some((inner, _)) if ARBITRARY_COLOR.is_match(inner) => ColorValue::Hardcoded,
            _ => ColorValue::Neutral,
        };
    }

    let value = value.split('/').next().unwrap_or(value);
    if value.is_empty() || NEUTRAL_VALUES.contains(&value) || value.contains("${") {
        ColorValue::Neutral
    } else if value == "white" || value == "black" || PALETTE_COLOR.is_match(value) {
        ColorValue::Hardcoded
    } else {
        ColorValue::Token(value)
    }
}

fn text_size(classes: &[&str]) -> TextSize {
    let base: Vec<&str> = classes
        .iter()
        .map(|c| split_variants(c))
        .filter(|(variants, _)| variants.is_empty())
        .map(|(_, utility)| utility)
        .collect();

    let size = base
        .iter()
        .rev()
        .find_map(|u| u.strip_prefix("text-").filter(|v| SIZE_SCALE.contains(v)));
    let bold = base.iter().any(|u| BOLD_WEIGHTS.contains(u));

    match size {
        Some(s) if LARGE_SIZES.contains(&s) => TextSize::Large,
        Some("xl") if bold => TextSize::Large,
        _ => TextSize::Normal,
    }
}

struct VariantGroup<'a> {
    variants: &'a str,
    foregrounds: Vec<&'a str>,
    backgrounds: Vec<&'a str>,
}

fn pair_literal(origin: &str, literal: &ClassLiteral<'_>, out: &mut Vec<Candidate>) {
    let mut groups: Vec<VariantGroup<'_>> = Vec::new();
    for class in &literal.classes {
        let (variants, utility) = split_variants(class);
        let (fg, bg) = match classify(utility) {
            ColorClass::Foreground(t) => (Some(t), None),
            ColorClass::Background(t) => (None, Some(t)),
            ColorClass::Hardcoded | ColorClass::Other => continue,
        };

        let index = match groups.iter().position(|g| g.variants == variants) {
            Some(i) => i,
            None => {
                groups.push(VariantGroup {
                    variants,
                    foregrounds: Vec::new(),
                    backgrounds: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];
        group.foregrounds.extend(fg);
        group.backgrounds.extend(bg);
    }

    let empty = VariantGroup {
        variants: "",
        foregrounds: Vec::new(),
        backgrounds: Vec::new(),
    };
    let base = groups.iter().find(|g| g.variants.is_empty()).unwrap_or(&empty);
    let has_dark_override = groups.iter().any(|g| g.variants == "dark");
    let size = text_size(&literal.classes);
    let locator = literal.locator(origin);

    for group in &groups {
        let is_base = group.variants.is_empty();
        let foregrounds = if group.foregrounds.is_empty() {
            &base.foregrounds
        } else {
            &group.foregrounds
        };
        let backgrounds = if group.backgrounds.is_empty() {
            &base.backgrounds
        } else {
            &group.backgrounds
        };

        let mode = if is_base {
            has_dark_override.then_some(ColorMode::Light)
        } else if group.variants.split(':').any(|v| v == "dark") {
            Some(ColorMode::Dark)
        } else {
            None
        };

        let context = if is_base {
            locator.clone()
        } else {
            format!("{} [{}]", locator, group.variants)
        };

        for fg in foregrounds {
            for bg in backgrounds {
                out.push(Candidate {
                    foreground: fg.to_string(),
                    background: bg.to_string(),
                    context: context.clone(),
                    text_size: size,
                    mode,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<Candidate> {
        ClassListExtractor.extract_candidates("button.tsx", text)
    }

    fn pairs(candidates: &[Candidate]) -> Vec<(&str, &str)> {
        candidates
            .iter()
            .map(|c| (c.foreground.as_str(), c.background.as_str()))
            .collect()
    }

    // =========================================================================
    // Pairing
    // =========================================================================

    #[test]
    fn test_simple_pair() {
        let found = extract(r#"<div className="bg-primary text-primary-foreground p-4">"#);
        assert_eq!(pairs(&found), vec![("primary-foreground", "primary")]);
        assert_eq!(found[0].text_size, TextSize::Normal);
        assert_eq!(found[0].mode, None);
        assert!(found[0].context.starts_with("button.tsx:1: bg-primary"));
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(extract("export const x = 1;").is_empty());
        assert!(extract(r#"<p className="text-foreground">only text</p>"#).is_empty());
    }

    #[test]
    fn test_line_numbers() {
        let src = "const a = 1;\n\nconst b = \"bg-card text-card-foreground\";\n";
        let found = extract(src);
        assert_eq!(found.len(), 1);
        assert!(found[0].context.starts_with("button.tsx:3:"));
    }

    #[test]
    fn test_opacity_and_important_stripped() {
        let found = extract(r#""!bg-destructive/90 text-destructive-foreground!""#);
        assert_eq!(pairs(&found), vec![("destructive-foreground", "destructive")]);
    }

    #[test]
    fn test_non_color_utilities_ignored() {
        let found = extract(r#""text-sm text-center bg-cover bg-muted text-muted-foreground""#);
        assert_eq!(pairs(&found), vec![("muted-foreground", "muted")]);
    }

    #[test]
    fn test_variant_borrows_base_side() {
        let found = extract(r#""bg-primary text-primary-foreground hover:bg-primary/90 hover:bg-accent""#);
        assert_eq!(
            pairs(&found),
            vec![
                ("primary-foreground", "primary"),
                ("primary-foreground", "primary"),
                ("primary-foreground", "accent"),
            ]
        );
        assert!(found[1].context.ends_with("[hover]"));
        assert_eq!(found[1].mode, None);
    }

    #[test]
    fn test_dark_variant_splits_modes() {
        let found = extract(r#""bg-background text-foreground dark:bg-card""#);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].mode, Some(ColorMode::Light));
        assert_eq!(
            (found[1].foreground.as_str(), found[1].background.as_str()),
            ("foreground", "card")
        );
        assert_eq!(found[1].mode, Some(ColorMode::Dark));
        assert!(found[1].applies_to(ColorMode::Dark));
        assert!(!found[1].applies_to(ColorMode::Light));
    }

    #[test]
    fn test_arbitrary_var_is_token() {
        let found = extract(r#""bg-[hsl(var(--sidebar))] text-[var(--sidebar-foreground)]""#);
        assert_eq!(pairs(&found), vec![("sidebar-foreground", "sidebar")]);
    }

    #[test]
    fn test_hardcoded_not_paired() {
        let found = extract(r#""bg-white text-foreground bg-[#fafafa] text-red-500""#);
        assert!(found.is_empty());
    }

    #[test]
    fn test_large_text_detection() {
        let found = extract(r#""text-2xl bg-card text-card-foreground""#);
        assert_eq!(found[0].text_size, TextSize::Large);

        let found = extract(r#""text-xl font-bold bg-card text-card-foreground""#);
        assert_eq!(found[0].text_size, TextSize::Large);

        let found = extract(r#""text-xl bg-card text-card-foreground""#);
        assert_eq!(found[0].text_size, TextSize::Normal);
    }

    #[test]
    fn test_single_and_template_literals() {
        let src = "cn('bg-secondary text-secondary-foreground', `bg-muted text-muted-foreground`)";
        let found = extract(src);
        assert_eq!(
            pairs(&found),
            vec![("secondary-foreground", "secondary"), ("muted-foreground", "muted")]
        );
    }

    #[test]
    fn test_snippet_truncated() {
        let long = format!("\"bg-card text-card-foreground {}\"", "p-4 ".repeat(40));
        let found = extract(&long);
        assert!(found[0].context.ends_with("..."));
    }

    // =========================================================================
    // Hardcoded colors
    // =========================================================================

    #[test]
    fn test_scan_hardcoded_colors() {
        let src = "<div className=\"bg-white text-foreground\">\n<span className=\"hover:text-red-500 bg-[#fafafa]\">";
        let found = scan_hardcoded_colors("card.tsx", src);
        let classes: Vec<&str> = found.iter().map(|h| h.class.as_str()).collect();
        assert_eq!(classes, vec!["bg-white", "hover:text-red-500", "bg-[#fafafa]"]);
        assert_eq!(found[0].line, 1);
        assert_eq!(found[1].line, 2);
    }

    #[test]
    fn test_arbitrary_non_colors_are_not_hardcoded() {
        let src = r#""text-[14px] bg-[url(/hero.png)] text-[length:var(--size)] text-foreground bg-background""#;
        assert!(scan_hardcoded_colors("hero.tsx", src).is_empty());

        let src = r#""text-[rgb(0,0,0)] bg-[hsl(0_0%_98%)] text-[color:var(--x)] bg-[oklch(0.7_0.1_200)]/50""#;
        let classes: Vec<String> = scan_hardcoded_colors("hero.tsx", src)
            .into_iter()
            .map(|h| h.class)
            .collect();
        assert_eq!(
            classes,
            vec!["text-[rgb(0,0,0)]", "bg-[hsl(0_0%_98%)]", "bg-[oklch(0.7_0.1_200)]/50"]
        );
    }

    #[test]
    fn test_tokens_are_not_hardcoded() {
        assert!(scan_hardcoded_colors("x.tsx", r#""bg-primary text-primary-foreground""#).is_empty());
    }

    #[test]
    fn test_split_variants() {
        assert_eq!(split_variants("md:hover:bg-primary"), ("md:hover", "bg-primary"));
        assert_eq!(split_variants("bg-[url(a:b)]"), ("", "bg-[url(a:b)]"));
        assert_eq!(split_variants("!text-foreground"), ("", "text-foreground"));
    }
}
