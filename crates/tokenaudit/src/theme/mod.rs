//! Themes as token graphs with light and dark modes.
//!
//! A [`TokenTheme`] owns one [`TokenGraph`] per mode. Light mode is always
//! present. Dark mode exists only when the source defines at least one dark
//! token, and then inherits every light token it does not override, the way
//! a `.dark` rule inherits custom properties from `:root`.
//!
//! ## Loading
//!
//! | Extension | Parser |
//! |-----------|--------|
//! | `.css` | [`parse_css`] |
//! | `.yaml`, `.yml`, `.json` | [`parse_tokens`] |
//!
//! ```rust
//! use tokenaudit::{ColorMode, TokenTheme};
//!
//! let theme = TokenTheme::from_css("ocean", r#"
//!     :root { --background: 0 0% 100%; --foreground: 0 0% 9%; }
//!     .dark { --background: 0 0% 4%; }
//! "#).unwrap();
//!
//! assert_eq!(theme.modes(), vec![ColorMode::Light, ColorMode::Dark]);
//! // inherited from light
//! assert!(theme.graph(ColorMode::Dark).unwrap().contains("foreground"));
//! ```

mod css;
mod graph;
mod resolve;
mod tokens;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

pub use css::parse_css;
pub use graph::{TokenDefinition, TokenGraph};
pub use resolve::{resolve_token, AliasSyntax, BraceRef, CssVar, PatternAlias, TokenResolver};
pub use tokens::parse_tokens;

/// File extensions recognized as theme sources.
pub const THEME_EXTENSIONS: &[&str] = &[".css", ".yaml", ".yml", ".json"];

/// Light or dark color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Light => write!(f, "light"),
            ColorMode::Dark => write!(f, "dark"),
        }
    }
}

/// Raw token tables as read from a theme source.
///
/// `dark` holds only the dark overrides; [`TokenTheme`] layers them over
/// `light`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTables {
    pub light: TokenGraph,
    pub dark: TokenGraph,
}

impl TokenTables {
    pub fn is_empty(&self) -> bool {
        self.light.is_empty() && self.dark.is_empty()
    }
}

/// A named theme with a light token graph and an optional dark one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTheme {
    name: String,
    light: TokenGraph,
    dark: Option<TokenGraph>,
}

impl TokenTheme {
    /// Creates a light-only theme.
    pub fn new(name: impl Into<String>, light: TokenGraph) -> Self {
        Self {
            name: name.into(),
            light,
            dark: None,
        }
    }

    /// Adds dark-mode overrides on top of the light graph.
    pub fn with_dark(mut self, overrides: &TokenGraph) -> Self {
        self.dark = Some(self.light.overlay(overrides));
        self
    }

    /// Builds a theme from parsed tables.
    pub fn from_tables(name: impl Into<String>, tables: TokenTables) -> Self {
        let theme = Self::new(name, tables.light);
        if tables.dark.is_empty() {
            theme
        } else {
            theme.with_dark(&tables.dark)
        }
    }

    /// Parses a CSS custom-property theme.
    pub fn from_css(name: impl Into<String>, css: &str) -> Result<Self, ThemeError> {
        Ok(Self::from_tables(name, parse_css(css)?))
    }

    /// Parses a YAML/JSON design-token theme.
    pub fn from_yaml(name: impl Into<String>, yaml: &str) -> Result<Self, ThemeError> {
        Ok(Self::from_tables(name, parse_tokens(yaml)?))
    }

    /// Loads a theme file, choosing the parser by extension.
    ///
    /// The theme name is the file stem.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ThemeError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("theme")
            .to_string();

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let tables = match ext.as_deref() {
            Some("yaml") | Some("yml") | Some("json") => parse_tokens(&content),
            _ => parse_css(&content),
        }
        .map_err(|err| match err {
            ThemeError::Parse { message, .. } => ThemeError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })?;

        tracing::debug!(
            theme = %name,
            light = tables.light.len(),
            dark = tables.dark.len(),
            "loaded theme"
        );
        Ok(Self::from_tables(name, tables))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn light(&self) -> &TokenGraph {
        &self.light
    }

    pub fn dark(&self) -> Option<&TokenGraph> {
        self.dark.as_ref()
    }

    /// Returns the graph for `mode`, if the theme defines it.
    pub fn graph(&self, mode: ColorMode) -> Option<&TokenGraph> {
        match mode {
            ColorMode::Light => Some(&self.light),
            ColorMode::Dark => self.dark.as_ref(),
        }
    }

    /// Modes this theme defines, light first.
    pub fn modes(&self) -> Vec<ColorMode> {
        let mut modes = vec![ColorMode::Light];
        if self.dark.is_some() {
            modes.push(ColorMode::Dark);
        }
        modes
    }
}
