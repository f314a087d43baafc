//! CSS custom-property theme parsing.
//!
//! # Motivation
//!
//! Component libraries usually ship their tokens as CSS custom properties in
//! a global stylesheet, with dark mode expressed as a class or media query:
//!
//! ```css
//! @layer base {
//!   :root {
//!     --brand-500: 262 84% 52%;
//!     --primary: var(--brand-500);
//!     --primary-foreground: 0 0% 98%;
//!   }
//!   .dark {
//!     --primary: 263 70% 60%;
//!   }
//! }
//! ```
//!
//! # Design
//!
//! Parsing is built on `cssparser`, so comments, strings and escapes are
//! handled by a real tokenizer. Only custom property declarations are read,
//! and their values are kept as raw text; resolution decides later whether a
//! value is a literal or a reference. This is not a general CSS parser.
//!
//! ## Mapping
//!
//! | Where the declaration appears | Table |
//! |-------------------------------|-------|
//! | `:root`, `html`, `:host`, `.light`, `[data-theme="light"]` | light |
//! | `.dark`, `[data-theme="dark"]`, `[data-mode="dark"]` | dark |
//! | any of the above inside `@media (prefers-color-scheme: dark)` | dark |
//! | declarations directly inside `@theme` | light (dark inside a dark media query) |
//! | `@layer` blocks | descended into |
//! | other selectors, other at-rules, non-custom properties | ignored |
//!
//! Selectors are matched on their subject compound with `:not(...)` removed,
//! so `.dark .card` and `:root:not(.dark)` do not count as dark.
//! A trailing `!important` is dropped from values.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, Token,
};
use once_cell::sync::Lazy;
use regex::Regex;

use super::graph::TokenDefinition;
use super::{ColorMode, TokenTables};
use crate::error::ThemeError;

static DARK_SELECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:\.dark|\[data-(?:theme|mode)=["']?dark["']?\])(?:[^\w-]|$)"#)
        .expect("dark selector pattern is valid")
});

static NEGATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":not\([^)]*\)").expect("negation pattern is valid"));

static LIGHT_SELECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?::root|\bhtml\b|:host|\.light|\[data-(?:theme|mode)=["']?light["']?\])(?:[^\w-]|$)"#)
        .expect("light selector pattern is valid")
});

/// Parses CSS text into light and dark token tables.
///
/// Unknown rules are skipped. The parse only fails when nothing could be
/// read and the tokenizer reported errors.
///
/// # Example
///
/// ```rust
/// use tokenaudit::theme::parse_css;
///
/// let tables = parse_css(":root { --background: 0 0% 100%; } .dark { --background: 0 0% 4%; }")
///     .unwrap();
/// assert_eq!(tables.light.raw_value("background"), Some("0 0% 100%"));
/// assert_eq!(tables.dark.raw_value("background"), Some("0 0% 4%"));
/// ```
pub fn parse_css(css: &str) -> Result<TokenTables, ThemeError> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    let mut sheet = ThemeSheetParser {
        tables: TokenTables::default(),
        media_mode: None,
        errors: Vec::new(),
    };

    let mut errors = Vec::new();
    for result in cssparser::StyleSheetParser::new(&mut parser, &mut sheet) {
        if let Err((err, _)) = result {
            errors.push(describe(&err));
        }
    }
    errors.append(&mut sheet.errors);

    if sheet.tables.is_empty() && !errors.is_empty() {
        return Err(ThemeError::Parse {
            path: None,
            message: errors.join("; "),
        });
    }
    for message in &errors {
        tracing::debug!(%message, "skipped css rule");
    }

    Ok(sheet.tables)
}

fn describe(err: &ParseError<'_, ()>) -> String {
    format!(
        "line {}, column {}: {:?}",
        err.location.line + 1,
        err.location.column,
        err.kind
    )
}

fn selector_mode(selector: &str) -> Option<ColorMode> {
    let subjects: Vec<String> = selector.split(',').map(subject_compound).collect();
    if subjects.iter().any(|s| DARK_SELECTOR.is_match(s)) {
        Some(ColorMode::Dark)
    } else if subjects.iter().any(|s| LIGHT_SELECTOR.is_match(s)) {
        Some(ColorMode::Light)
    } else {
        None
    }
}

/// The last compound of a complex selector, without negations.
fn subject_compound(selector: &str) -> String {
    let selector = NEGATION.replace_all(selector.trim(), "");
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in selector.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            ' ' | '\t' | '\n' | '>' | '+' | '~' if depth == 0 => start = i + c.len_utf8(),
            _ => {}
        }
    }
    selector[start..].to_string()
}

fn skip_rest(input: &mut Parser<'_, '_>) {
    while input.next().is_ok() {}
}

struct ThemeSheetParser {
    tables: TokenTables,
    media_mode: Option<ColorMode>,
    errors: Vec<String>,
}

impl ThemeSheetParser {
    fn record(&mut self, mode: ColorMode, def: TokenDefinition) {
        match mode {
            ColorMode::Light => self.tables.light.insert(def),
            ColorMode::Dark => self.tables.dark.insert(def),
        }
    }
}

impl<'i> QualifiedRuleParser<'i> for ThemeSheetParser {
    type Prelude = Option<ColorMode>;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let start = input.position();
        skip_rest(input);
        let selector = input.slice_from(start).trim();
        let mode = selector_mode(selector);
        if mode.is_none() {
            tracing::trace!(selector, "ignoring rule");
        }
        Ok(mode)
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let mut decl_parser = CustomPropertyParser;
        let definitions: Vec<TokenDefinition> = RuleBodyParser::new(input, &mut decl_parser)
            .flatten()
            .collect();

        let mode = match (prelude, self.media_mode) {
            (None, _) => return Ok(()),
            (Some(_), Some(ColorMode::Dark)) => ColorMode::Dark,
            (Some(mode), _) => mode,
        };

        for def in definitions {
            self.record(mode, def);
        }
        Ok(())
    }
}

enum AtBlock {
    /// Descend, optionally forcing a color mode.
    Nested(Option<ColorMode>),
    /// Custom properties declared directly in the block.
    Declarations,
    Skip,
}

impl<'i> AtRuleParser<'i> for ThemeSheetParser {
    type Prelude = AtBlock;
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        match name.as_ref() {
            "media" => {
                let mut found_mode: Option<ColorMode> = None;
                loop {
                    match input.next() {
                        Ok(Token::ParenthesisBlock) => {
                            let nested = input.parse_nested_block(|input| {
                                input.expect_ident_matching("prefers-color-scheme")?;
                                input.expect_colon()?;
                                let val = input.expect_ident()?;
                                match val.as_ref() {
                                    "dark" => Ok(ColorMode::Dark),
                                    "light" => Ok(ColorMode::Light),
                                    _ => Err(input.new_custom_error::<(), ()>(())),
                                }
                            });
                            if let Ok(mode) = nested {
                                found_mode = Some(mode);
                            }
                        }
                        Ok(_) => continue,
                        Err(_) => break,
                    }
                }
                Ok(match found_mode {
                    Some(mode) => AtBlock::Nested(Some(mode)),
                    None => AtBlock::Skip,
                })
            }
            "layer" => {
                skip_rest(input);
                Ok(AtBlock::Nested(None))
            }
            "theme" => {
                skip_rest(input);
                Ok(AtBlock::Declarations)
            }
            _ => {
                skip_rest(input);
                Ok(AtBlock::Skip)
            }
        }
    }

    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        // `@tailwind base;`, `@import ...;`
        Ok(())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let mode = match prelude {
            AtBlock::Skip => {
                skip_rest(input);
                return Ok(());
            }
            AtBlock::Declarations => {
                let mut decl_parser = CustomPropertyParser;
                let definitions: Vec<TokenDefinition> =
                    RuleBodyParser::new(input, &mut decl_parser).flatten().collect();
                let mode = self.media_mode.unwrap_or(ColorMode::Light);
                for def in definitions {
                    self.record(mode, def);
                }
                return Ok(());
            }
            AtBlock::Nested(mode) => mode,
        };

        let old_mode = self.media_mode;
        if mode.is_some() {
            self.media_mode = mode;
        }

        let mut errors = Vec::new();
        for result in cssparser::StyleSheetParser::new(input, self) {
            if let Err((err, _)) = result {
                errors.push(describe(&err));
            }
        }
        self.errors.append(&mut errors);

        self.media_mode = old_mode;
        Ok(())
    }
}

struct CustomPropertyParser;

impl<'i> DeclarationParser<'i> for CustomPropertyParser {
    type Declaration = TokenDefinition;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        if !name.starts_with("--") {
            skip_rest(input);
            return Err(input.new_custom_error::<(), ()>(()));
        }

        let start = input.position();
        skip_rest(input);
        let raw = input.slice_from(start).trim();
        let raw = raw.strip_suffix("!important").unwrap_or(raw);
        Ok(TokenDefinition::new(name.as_ref(), raw))
    }
}

impl<'i> AtRuleParser<'i> for CustomPropertyParser {
    type Prelude = ();
    type AtRule = TokenDefinition;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for CustomPropertyParser {
    type Prelude = ();
    type QualifiedRule = TokenDefinition;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, TokenDefinition, ()> for CustomPropertyParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}
