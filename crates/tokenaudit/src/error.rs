//! Error types for color parsing, token resolution and file loading.
//!
//! Color and resolution errors are recoverable at the batch level: the audit
//! records them against the offending entry and keeps going. Theme and config
//! errors are raised while loading inputs, before any audit runs.

use std::path::PathBuf;

use thiserror::Error;

/// Error returned when a string is not a valid HSL color.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    /// The input does not match `H S% L%` or `hsl(H S% L%)`.
    #[error("malformed color '{input}': expected 'H S% L%' or 'hsl(H S% L%)'")]
    Malformed { input: String },

    /// A component parsed but falls outside its valid range.
    #[error("malformed color '{input}': {component} {value} is out of range")]
    OutOfRange {
        input: String,
        component: &'static str,
        value: f64,
    },
}

impl ColorError {
    /// Returns the offending input string.
    pub fn input(&self) -> &str {
        match self {
            ColorError::Malformed { input } | ColorError::OutOfRange { input, .. } => input,
        }
    }
}

/// Error returned when a token cannot be resolved to a concrete color.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The token (or a token it aliases) is not defined in the graph.
    #[error("{}", unresolved_message(token, referenced_by.as_deref()))]
    UnresolvedToken {
        token: String,
        referenced_by: Option<String>,
    },

    /// The alias chain revisits a token already on the resolution path.
    #[error("cycle detected in token aliases: {}", path.join(" -> "))]
    CycleDetected { path: Vec<String> },

    /// The token's value is neither an alias nor a valid color literal.
    #[error("token '{token}' has an invalid value: {source}")]
    MalformedColor {
        token: String,
        #[source]
        source: ColorError,
    },
}

fn unresolved_message(token: &str, referenced_by: Option<&str>) -> String {
    match referenced_by {
        Some(from) => format!("token '{}' aliases undefined token '{}'", from, token),
        None => format!("token '{}' is not defined", token),
    }
}

impl ResolveError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::UnresolvedToken { .. } => "unresolved-token",
            ResolveError::CycleDetected { .. } => "cycle-detected",
            ResolveError::MalformedColor { .. } => "malformed-color",
        }
    }
}

/// Error type for theme loading and parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    /// The theme file could not be read.
    #[error("failed to read theme {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// The theme text could not be parsed.
    #[error("failed to parse theme{}: {message}", location(path.as_ref()))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },
}

/// Error type for audit configuration failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// The config text is not valid YAML/JSON for the expected shape.
    #[error("failed to parse config{}: {message}", location(path.as_ref()))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    /// An alias pattern is not a valid regular expression.
    #[error("invalid alias pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The fallback color is not a valid HSL literal.
    #[error("invalid fallback color: {message}")]
    InvalidColor { message: String },
}

/// Error type for walking and reading source files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// IO error reading a file or directory.
    #[error("failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

/// Error type for rendering a report in a structured format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("failed to render {format} report: {message}")]
    Serialize {
        format: &'static str,
        message: String,
    },
}

fn location(path: Option<&PathBuf>) -> String {
    path.map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_color_display() {
        let err = ColorError::Malformed {
            input: "12, 50%, 50%".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("12, 50%, 50%"));
        assert_eq!(err.input(), "12, 50%, 50%");
    }

    #[test]
    fn test_unresolved_token_display() {
        let err = ResolveError::UnresolvedToken {
            token: "missing".to_string(),
            referenced_by: Some("primary".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("primary"));
        assert!(msg.contains("missing"));

        let direct = ResolveError::UnresolvedToken {
            token: "missing".to_string(),
            referenced_by: None,
        };
        assert_eq!(direct.to_string(), "token 'missing' is not defined");
    }

    #[test]
    fn test_cycle_detected_display() {
        let err = ResolveError::CycleDetected {
            path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("cycle"));
        assert!(msg.contains("a -> b -> a"));
        assert_eq!(err.kind(), "cycle-detected");
    }

    #[test]
    fn test_malformed_color_has_source() {
        use std::error::Error as _;

        let err = ResolveError::MalformedColor {
            token: "ring".to_string(),
            source: ColorError::Malformed {
                input: "blue".to_string(),
            },
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("ring"));
    }

    #[test]
    fn test_theme_error_location() {
        let err = ThemeError::Parse {
            path: Some(PathBuf::from("themes/ocean.css")),
            message: "bad".to_string(),
        };
        assert!(err.to_string().contains("themes/ocean.css"));

        let err = ThemeError::Parse {
            path: None,
            message: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "failed to parse theme: bad");
    }
}
