//! Audit configuration.
//!
//! Every field is optional; an empty file is the default configuration.
//!
//! ```yaml
//! checklist:
//!   - { foreground: foreground, background: background }
//!   - { foreground: primary-foreground, background: primary }
//!   - { foreground: hero-title, background: hero, text_size: large }
//! aliases:
//!   - css-var
//!   - brace
//!   - pattern: '^token\((?P<name>[\w.-]+)\)$'
//! fallback: "0 0% 50%"
//! source_extensions: [tsx, vue]
//! ```
//!
//! JSON files use the same shape.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::HslColor;
use crate::contrast::TextSize;
use crate::error::ConfigError;
use crate::theme::{BraceRef, CssVar, PatternAlias, TokenResolver};

/// Semantic pairs checked for every theme and mode when no checklist is
/// configured.
pub const DEFAULT_CHECKLIST: &[(&str, &str)] = &[
    ("foreground", "background"),
    ("card-foreground", "card"),
    ("popover-foreground", "popover"),
    ("primary-foreground", "primary"),
    ("secondary-foreground", "secondary"),
    ("muted-foreground", "muted"),
    ("muted-foreground", "background"),
    ("accent-foreground", "accent"),
    ("destructive-foreground", "destructive"),
];

/// Source file extensions scanned by default.
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] =
    &["tsx", "jsx", "ts", "js", "vue", "svelte", "html", "astro"];

/// A token pair checked during a theme audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistPair {
    pub foreground: String,
    pub background: String,
    #[serde(default)]
    pub text_size: TextSize,
}

impl ChecklistPair {
    pub fn new(foreground: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            foreground: foreground.into(),
            background: background.into(),
            text_size: TextSize::Normal,
        }
    }
}

/// A built-in alias spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamedAlias {
    /// `var(--name)`
    CssVar,
    /// `{name}`
    Brace,
}

/// One entry of the `aliases` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AliasSpec {
    Named(NamedAlias),
    Pattern { pattern: String },
}

/// Settings shared by theme and source audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    pub checklist: Vec<ChecklistPair>,
    pub aliases: Vec<AliasSpec>,
    /// HSL literal reported alongside entries whose tokens do not resolve.
    pub fallback: Option<String>,
    pub source_extensions: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            checklist: DEFAULT_CHECKLIST
                .iter()
                .map(|(fg, bg)| ChecklistPair::new(*fg, *bg))
                .collect(),
            aliases: vec![
                AliasSpec::Named(NamedAlias::CssVar),
                AliasSpec::Named(NamedAlias::Brace),
            ],
            fallback: None,
            source_extensions: DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl AuditConfig {
    /// Parses YAML or JSON config text.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    /// Loads a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_yaml(&content).map_err(|err| match err {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    /// Builds a resolver with the configured alias syntaxes, in order.
    pub fn build_resolver(&self) -> Result<TokenResolver, ConfigError> {
        self.aliases
            .iter()
            .try_fold(TokenResolver::empty(), |resolver, spec| match spec {
                AliasSpec::Named(NamedAlias::CssVar) => Ok(resolver.with_syntax(CssVar)),
                AliasSpec::Named(NamedAlias::Brace) => Ok(resolver.with_syntax(BraceRef)),
                AliasSpec::Pattern { pattern } => PatternAlias::new(pattern)
                    .map(|syntax| resolver.with_syntax(syntax))
                    .map_err(|e| ConfigError::InvalidPattern {
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    }),
            })
    }

    /// Parses the configured fallback color.
    pub fn fallback_color(&self) -> Result<Option<HslColor>, ConfigError> {
        self.fallback
            .as_deref()
            .map(HslColor::parse)
            .transpose()
            .map_err(|e| ConfigError::InvalidColor {
                message: e.to_string(),
            })
    }

    /// Whether a file extension (without the dot) is scanned.
    pub fn is_source_extension(&self, ext: &str) -> bool {
        self.source_extensions
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}
