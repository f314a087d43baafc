//! Token tables for one theme mode.

use std::collections::HashMap;

/// One entry of a theme's token table.
///
/// `raw_value` is kept exactly as written (trimmed): either a color literal
/// or a reference to another token. Interpretation happens at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDefinition {
    pub name: String,
    pub raw_value: String,
}

impl TokenDefinition {
    pub fn new(name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_value: raw_value.into().trim().to_string(),
        }
    }
}

/// The token definitions of one theme mode.
///
/// Edges are alias references between tokens. A graph is built once per
/// parse and not mutated afterwards; later definitions of the same name
/// replace earlier ones, as in the CSS cascade.
///
/// # Example
///
/// ```rust
/// use tokenaudit::TokenGraph;
///
/// let graph = TokenGraph::new()
///     .define("brand-500", "262 84% 52%")
///     .define("primary", "var(--brand-500)");
///
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.raw_value("primary"), Some("var(--brand-500)"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenGraph {
    tokens: HashMap<String, TokenDefinition>,
}

impl TokenGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from definitions, later entries winning.
    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = TokenDefinition>,
    {
        let mut graph = Self::new();
        for def in definitions {
            graph.insert(def);
        }
        graph
    }

    /// Adds a definition, returning `self` for chaining.
    ///
    /// A leading `--` on the name is dropped so CSS property names and bare
    /// token names address the same entry.
    pub fn define(mut self, name: &str, raw_value: &str) -> Self {
        self.insert(TokenDefinition::new(name, raw_value));
        self
    }

    pub(crate) fn insert(&mut self, mut def: TokenDefinition) {
        def.name = normalize_name(&def.name).to_string();
        self.tokens.insert(def.name.clone(), def);
    }

    /// Returns a copy of this graph with `overrides` layered on top.
    pub fn overlay(&self, overrides: &TokenGraph) -> TokenGraph {
        let mut merged = self.clone();
        for def in overrides.tokens.values() {
            merged.insert(def.clone());
        }
        merged
    }

    /// Looks up a definition by token name.
    pub fn get(&self, name: &str) -> Option<&TokenDefinition> {
        self.tokens.get(normalize_name(name))
    }

    /// Looks up the raw value of a token.
    pub fn raw_value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|def| def.raw_value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Token names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tokens.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

pub(crate) fn normalize_name(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix("--").unwrap_or(name)
}
