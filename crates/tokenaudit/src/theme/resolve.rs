//! Alias resolution over a [`TokenGraph`].
//!
//! A token's raw value is either a color literal or a reference to another
//! token. Resolution follows references until it reaches a literal:
//!
//! ```text
//! primary ──▶ brand-500 ──▶ "262 84% 52%"
//! ```
//!
//! # Reference syntax
//!
//! How a reference is spelled depends on the theme format, so matching is
//! delegated to [`AliasSyntax`] implementations tried in order:
//!
//! | Syntax | Example | Target |
//! |--------|---------|--------|
//! | [`CssVar`] | `var(--brand-500)`, `var(--brand-500, 0 0% 0%)` | `brand-500` |
//! | [`BraceRef`] | `{brand.500}` | `brand.500` |
//! | [`PatternAlias`] | user regex | first capture (or group `name`) |
//!
//! # Cycles
//!
//! Every resolution call threads its own path of visited tokens through the
//! recursion. Reaching a token already on the path fails with
//! [`ResolveError::CycleDetected`]. Since the graph is finite, any walk that
//! does not terminate must revisit a token, so no separate depth limit exists.
//! Nothing is shared between calls, so independent tokens can be resolved
//! concurrently against the same graph.

use std::fmt;

use regex::Regex;

use super::graph::{normalize_name, TokenGraph};
use crate::color::HslColor;
use crate::error::ResolveError;

/// Recognizes references to other tokens in a raw value.
pub trait AliasSyntax: fmt::Debug + Send + Sync {
    /// Returns the referenced token name if `raw` is a reference.
    fn target<'a>(&self, raw: &'a str) -> Option<&'a str>;
}

/// CSS custom property references: `var(--name)` or `var(--name, fallback)`.
///
/// The fallback argument is ignored; a missing target is reported rather
/// than silently replaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssVar;

impl AliasSyntax for CssVar {
    fn target<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let inner = raw.trim().strip_prefix("var(")?.strip_suffix(')')?;
        let name = inner.split(',').next()?.trim();
        let name = name.strip_prefix("--")?;
        is_token_name(name).then_some(name)
    }
}

/// Design-token references: `{name}` or `{group.name}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceRef;

impl AliasSyntax for BraceRef {
    fn target<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let name = raw.trim().strip_prefix('{')?.strip_suffix('}')?.trim();
        is_token_name(name).then_some(name)
    }
}

/// References matched by a user-supplied regular expression.
///
/// The pattern must match the whole value. The token name is taken from a
/// group named `name` if present, else from the first capture group.
#[derive(Debug, Clone)]
pub struct PatternAlias {
    regex: Regex,
}

impl PatternAlias {
    /// Compiles `pattern`, anchoring it to the whole value.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self { regex })
    }
}

impl AliasSyntax for PatternAlias {
    fn target<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let caps = self.regex.captures(raw.trim())?;
        let m = caps.name("name").or_else(|| caps.get(1))?;
        let name = m.as_str().trim();
        is_token_name(name).then_some(name)
    }
}

fn is_token_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
}

/// Resolves token names to concrete colors.
///
/// # Example
///
/// ```rust
/// use tokenaudit::{HslColor, ResolveError, TokenGraph, TokenResolver};
///
/// let graph = TokenGraph::new()
///     .define("brand-500", "262 84% 52%")
///     .define("primary", "var(--brand-500)")
///     .define("foo", "var(--bar)")
///     .define("bar", "var(--foo)");
///
/// let resolver = TokenResolver::new();
/// assert_eq!(
///     resolver.resolve(&graph, "primary").unwrap(),
///     HslColor::parse("262 84% 52%").unwrap()
/// );
/// assert!(matches!(
///     resolver.resolve(&graph, "foo"),
///     Err(ResolveError::CycleDetected { .. })
/// ));
/// ```
#[derive(Debug)]
pub struct TokenResolver {
    syntaxes: Vec<Box<dyn AliasSyntax>>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self {
            syntaxes: vec![Box::new(CssVar), Box::new(BraceRef)],
        }
    }
}

impl TokenResolver {
    /// Creates a resolver that understands `var(--x)` and `{x}` references.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver with no reference syntaxes; add some with
    /// [`with_syntax`](Self::with_syntax).
    pub fn empty() -> Self {
        Self {
            syntaxes: Vec::new(),
        }
    }

    /// Appends a reference syntax, returning `self` for chaining.
    pub fn with_syntax<S: AliasSyntax + 'static>(mut self, syntax: S) -> Self {
        self.syntaxes.push(Box::new(syntax));
        self
    }

    /// Returns the alias target of a raw value, if any syntax recognizes it.
    pub fn alias_target<'a>(&self, raw: &'a str) -> Option<&'a str> {
        self.syntaxes.iter().find_map(|syntax| syntax.target(raw))
    }

    /// Resolves `token` to a color, following aliases.
    pub fn resolve(&self, graph: &TokenGraph, token: &str) -> Result<HslColor, ResolveError> {
        let mut path = Vec::new();
        self.resolve_in(graph, normalize_name(token), None, &mut path)
    }

    /// Resolves `token`, substituting `default` on any resolution error.
    pub fn resolve_or(&self, graph: &TokenGraph, token: &str, default: HslColor) -> HslColor {
        match self.resolve(graph, token) {
            Ok(color) => color,
            Err(err) => {
                tracing::warn!(token, error = %err, "using fallback color");
                default
            }
        }
    }

    fn resolve_in(
        &self,
        graph: &TokenGraph,
        token: &str,
        referenced_by: Option<&str>,
        path: &mut Vec<String>,
    ) -> Result<HslColor, ResolveError> {
        if path.iter().any(|visited| visited == token) {
            let mut cycle = path.clone();
            cycle.push(token.to_string());
            return Err(ResolveError::CycleDetected { path: cycle });
        }

        let def = graph
            .get(token)
            .ok_or_else(|| ResolveError::UnresolvedToken {
                token: token.to_string(),
                referenced_by: referenced_by.map(str::to_string),
            })?;

        path.push(token.to_string());

        let source = match HslColor::parse(&def.raw_value) {
            Ok(color) => {
                tracing::debug!(token, depth = path.len(), "resolved literal");
                return Ok(color);
            }
            Err(err) => err,
        };

        if let Some(target) = self.alias_target(&def.raw_value) {
            tracing::debug!(token, target, "following alias");
            return self.resolve_in(graph, normalize_name(target), Some(token), path);
        }

        Err(ResolveError::MalformedColor {
            token: token.to_string(),
            source,
        })
    }
}

/// Resolves `token` in `graph` with the default reference syntaxes.
pub fn resolve_token(graph: &TokenGraph, token: &str) -> Result<HslColor, ResolveError> {
    TokenResolver::new().resolve(graph, token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ColorError;

    fn hsl(s: &str) -> HslColor {
        HslColor::parse(s).unwrap()
    }

    // =========================================================================
    // Syntaxes
    // =========================================================================

    #[test]
    fn test_css_var_target() {
        assert_eq!(CssVar.target("var(--brand-500)"), Some("brand-500"));
        assert_eq!(CssVar.target(" var( --brand-500 , 0 0% 0% ) "), Some("brand-500"));
        assert_eq!(CssVar.target("var(brand)"), None);
        assert_eq!(CssVar.target("262 84% 52%"), None);
        assert_eq!(CssVar.target("var(--)"), None);
    }

    #[test]
    fn test_brace_target() {
        assert_eq!(BraceRef.target("{brand.500}"), Some("brand.500"));
        assert_eq!(BraceRef.target("{ primary }"), Some("primary"));
        assert_eq!(BraceRef.target("{}"), None);
        assert_eq!(BraceRef.target("brand"), None);
    }

    #[test]
    fn test_pattern_alias_first_group() {
        let syntax = PatternAlias::new(r"\$([a-z0-9-]+)").unwrap();
        assert_eq!(syntax.target("$brand-500"), Some("brand-500"));
        assert_eq!(syntax.target("x$brand-500"), None);
    }

    #[test]
    fn test_pattern_alias_named_group() {
        let syntax = PatternAlias::new(r"token\((?:'|\x22)?(?P<name>[\w.-]+)(?:'|\x22)?\)").unwrap();
        assert_eq!(syntax.target("token('brand.500')"), Some("brand.500"));
    }

    #[test]
    fn test_pattern_alias_rejects_invalid_regex() {
        assert!(PatternAlias::new("(unclosed").is_err());
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    #[test]
    fn test_resolve_literal() {
        let graph = TokenGraph::new().define("background", "0 0% 100%");
        let color = resolve_token(&graph, "background").unwrap();
        assert_eq!(color, hsl("0 0% 100%"));
    }

    #[test]
    fn test_resolve_alias_chain() {
        let graph = TokenGraph::new()
            .define("brand-500", "262 84% 52%")
            .define("primary", "var(--brand-500)")
            .define("ring", "var(--primary)");
        assert_eq!(resolve_token(&graph, "primary").unwrap(), hsl("262 84% 52%"));
        assert_eq!(resolve_token(&graph, "ring").unwrap(), hsl("262 84% 52%"));
    }

    #[test]
    fn test_resolve_accepts_dashed_name() {
        let graph = TokenGraph::new().define("background", "0 0% 100%");
        assert!(resolve_token(&graph, "--background").is_ok());
    }

    #[test]
    fn test_two_node_cycle() {
        let graph = TokenGraph::new()
            .define("foo", "var(--bar)")
            .define("bar", "var(--foo)");

        match resolve_token(&graph, "foo") {
            Err(ResolveError::CycleDetected { path }) => {
                assert_eq!(path, vec!["foo", "bar", "foo"]);
            }
            other => panic!("Expected CycleDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_self_reference_cycle() {
        let graph = TokenGraph::new().define("self", "var(--self)");
        match resolve_token(&graph, "self") {
            Err(ResolveError::CycleDetected { path }) => {
                assert_eq!(path, vec!["self", "self"]);
            }
            other => panic!("Expected CycleDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_reached_through_tail() {
        // entry is not itself part of the loop
        let graph = TokenGraph::new()
            .define("entry", "var(--a)")
            .define("a", "var(--b)")
            .define("b", "var(--c)")
            .define("c", "var(--a)");
        match resolve_token(&graph, "entry") {
            Err(ResolveError::CycleDetected { path }) => {
                assert_eq!(path, vec!["entry", "a", "b", "c", "a"]);
            }
            other => panic!("Expected CycleDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_direct() {
        let graph = TokenGraph::new();
        assert_eq!(
            resolve_token(&graph, "missing"),
            Err(ResolveError::UnresolvedToken {
                token: "missing".to_string(),
                referenced_by: None,
            })
        );
    }

    #[test]
    fn test_unresolved_through_alias() {
        let graph = TokenGraph::new().define("primary", "var(--brand-500)");
        assert_eq!(
            resolve_token(&graph, "primary"),
            Err(ResolveError::UnresolvedToken {
                token: "brand-500".to_string(),
                referenced_by: Some("primary".to_string()),
            })
        );
    }

    #[test]
    fn test_malformed_value() {
        let graph = TokenGraph::new().define("radius", "0.5rem");
        match resolve_token(&graph, "radius") {
            Err(ResolveError::MalformedColor { token, source }) => {
                assert_eq!(token, "radius");
                assert!(matches!(source, ColorError::Malformed { .. }));
            }
            other => panic!("Expected MalformedColor, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_syntax_is_not_followed() {
        let graph = TokenGraph::new()
            .define("brand", "0 0% 10%")
            .define("primary", "$brand");

        assert!(matches!(
            resolve_token(&graph, "primary"),
            Err(ResolveError::MalformedColor { .. })
        ));

        let resolver = TokenResolver::new().with_syntax(PatternAlias::new(r"\$(\w+)").unwrap());
        assert_eq!(resolver.resolve(&graph, "primary").unwrap(), hsl("0 0% 10%"));
    }

    #[test]
    fn test_empty_resolver_treats_references_as_malformed() {
        let graph = TokenGraph::new()
            .define("a", "0 0% 0%")
            .define("b", "var(--a)");
        assert!(TokenResolver::empty().resolve(&graph, "b").is_err());
    }

    #[test]
    fn test_resolve_or_falls_back() {
        let graph = TokenGraph::new()
            .define("foo", "var(--bar)")
            .define("bar", "var(--foo)");
        let fallback = hsl("0 0% 50%");
        let resolver = TokenResolver::new();
        assert_eq!(resolver.resolve_or(&graph, "foo", fallback), fallback);
        assert_eq!(resolver.resolve_or(&graph, "nope", fallback), fallback);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let graph = TokenGraph::new()
            .define("brand-500", "262 84% 52%")
            .define("primary", "var(--brand-500)")
            .define("x", "var(--y)")
            .define("y", "var(--x)");
        let resolver = TokenResolver::new();
        assert_eq!(
            resolver.resolve(&graph, "primary"),
            resolver.resolve(&graph, "primary")
        );
        assert_eq!(resolver.resolve(&graph, "x"), resolver.resolve(&graph, "x"));
    }
}
