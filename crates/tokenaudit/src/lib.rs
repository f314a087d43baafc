//! Tokenaudit - WCAG contrast validation for design-token themes.
//!
//! Tokenaudit checks that the foreground/background pairs of a design system
//! meet WCAG AA. It supports:
//!
//! - HSL colors written as `H S% L%` or `hsl(H S% L%)`
//! - Token graphs where tokens alias other tokens (`var(--x)`, `{x}`, or a
//!   configured pattern), resolved with cycle detection
//! - Light and dark theme modes from CSS custom properties or YAML/JSON
//!   token files
//! - Candidate pairs mined from utility classes in component sources
//! - Markdown, JSON and YAML reports
//!
//! # Quick Start
//!
//! ```rust
//! use tokenaudit::{validate_contrast, TextSize};
//!
//! let result = validate_contrast("0 0% 9%", "0 0% 98%", TextSize::Normal).unwrap();
//! assert!(result.meets_aa);
//! assert!(result.ratio > 15.0);
//! ```
//!
//! # Auditing a theme
//!
//! ```rust
//! use tokenaudit::{Auditor, TokenTheme};
//! use tokenaudit::report::render_markdown;
//!
//! let theme = TokenTheme::from_css("ocean", r#"
//!     :root {
//!         --background: 0 0% 100%;
//!         --foreground: 222 47% 11%;
//!         --brand: 262 84% 52%;
//!         --primary: var(--brand);
//!         --primary-foreground: 0 0% 98%;
//!     }
//! "#).unwrap();
//!
//! let report = Auditor::new().run_theme_audit(&[theme]);
//! let markdown = render_markdown(&report);
//! assert!(markdown.starts_with("# Contrast audit"));
//! ```
//!
//! # Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Parse colors | [`color`] |
//! | Relative luminance | [`luminance`] |
//! | Ratio and AA verdict | [`contrast`] |
//! | Theme loading, alias resolution | [`theme`] |
//! | Candidate pairs from sources | [`extract`], [`loader`] |
//! | Run audits | [`audit`] |
//! | Render | [`report`] |
//!
//! Every stage is a pure function of its inputs except file loading. Nothing
//! is cached between runs.

pub mod audit;
pub mod color;
pub mod config;
pub mod contrast;
mod error;
pub mod extract;
pub mod loader;
pub mod luminance;
pub mod report;
pub mod theme;

pub use audit::{AuditEntry, Auditor, Outcome};
pub use color::{HslColor, Rgb};
pub use config::{AliasSpec, AuditConfig, ChecklistPair, NamedAlias};
pub use contrast::{
    contrast_ratio, validate, validate_color_combinations, validate_contrast, ColorCombination,
    ContrastResult, ContrastValidation, TextSize, AA_LARGE, AA_NORMAL,
};
pub use error::{ColorError, ConfigError, LoadError, ReportError, ResolveError, ThemeError};
pub use extract::{scan_hardcoded_colors, Candidate, CandidateExtractor, ClassListExtractor, HardcodedColor};
pub use loader::{load_sources, walk_sources, SourceFile};
pub use luminance::relative_luminance;
pub use report::{
    generate_report, render, render_markdown, AuditGroup, AuditReport, ReportFormat, Summary,
};
pub use theme::{
    resolve_token, ColorMode, TokenDefinition, TokenGraph, TokenResolver, TokenTables, TokenTheme,
};
