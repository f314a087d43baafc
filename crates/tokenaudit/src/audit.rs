//! Theme and source audits.
//!
//! An [`Auditor`] turns themes and source files into an [`AuditReport`].
//! Each token pair becomes one [`AuditEntry`] that either carries a
//! contrast verdict or the reason no verdict could be produced. A bad token
//! never aborts the run; it becomes an unresolved entry and the audit moves
//! on.
//!
//! Partial reports (one per theme, one per source file) are built
//! independently and joined with [`AuditReport::merge`], so callers that
//! audit in parallel keep a deterministic order by merging in input order.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::color::HslColor;
use crate::config::{AuditConfig, ChecklistPair};
use crate::contrast::{ColorCombination, ContrastResult, ContrastValidation, TextSize};
use crate::error::{ConfigError, ResolveError};
use crate::extract::{scan_hardcoded_colors, CandidateExtractor, ClassListExtractor};
use crate::loader::SourceFile;
use crate::report::{AuditGroup, AuditReport};
use crate::theme::{TokenGraph, TokenResolver, TokenTheme};

/// What happened to one token pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    /// Both tokens resolved and the pair was validated.
    Checked {
        combination: ColorCombination,
        result: ContrastResult,
    },
    /// One or both tokens did not resolve.
    ///
    /// `errors` holds the foreground error first, then the background one.
    /// `fallback` holds the verdict computed with the configured fallback
    /// color standing in for the missing side(s).
    Unresolved {
        #[serde(serialize_with = "serialize_errors")]
        errors: Vec<ResolveError>,
        fallback: Option<ContrastValidation>,
    },
}

/// One line of an audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    /// Foreground token name, or the color itself for direct validations.
    pub foreground: String,
    pub background: String,
    pub context: String,
    pub text_size: TextSize,
    pub outcome: Outcome,
}

impl AuditEntry {
    /// Builds an entry from an already-validated pair of colors.
    pub fn from_validation(validation: ContrastValidation) -> Self {
        let ContrastValidation {
            combination,
            result,
        } = validation;
        Self {
            foreground: combination.foreground.to_string(),
            background: combination.background.to_string(),
            context: combination.context.clone(),
            text_size: combination.text_size,
            outcome: Outcome::Checked {
                combination,
                result,
            },
        }
    }

    /// The contrast verdict, if both tokens resolved.
    pub fn result(&self) -> Option<&ContrastResult> {
        match &self.outcome {
            Outcome::Checked { result, .. } => Some(result),
            Outcome::Unresolved { .. } => None,
        }
    }

    pub fn is_passing(&self) -> bool {
        self.result().is_some_and(|r| r.meets_aa)
    }

    /// Resolved but below the required ratio.
    pub fn is_failure(&self) -> bool {
        self.result().is_some_and(|r| !r.meets_aa)
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.outcome, Outcome::Unresolved { .. })
    }
}

struct ErrorView<'a>(&'a ResolveError);

impl Serialize for ErrorView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResolveError", 2)?;
        state.serialize_field("kind", self.0.kind())?;
        state.serialize_field("message", &self.0.to_string())?;
        state.end()
    }
}

fn serialize_errors<S: Serializer>(
    errors: &[ResolveError],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(errors.iter().map(ErrorView))
}

/// Runs theme and source audits with one resolver and checklist.
pub struct Auditor {
    resolver: TokenResolver,
    checklist: Vec<ChecklistPair>,
    fallback: Option<HslColor>,
    extractor: Box<dyn CandidateExtractor>,
}

impl Default for Auditor {
    fn default() -> Self {
        Self {
            resolver: TokenResolver::new(),
            checklist: AuditConfig::default().checklist,
            fallback: None,
            extractor: Box::new(ClassListExtractor),
        }
    }
}

impl std::fmt::Debug for Auditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auditor")
            .field("resolver", &self.resolver)
            .field("checklist", &self.checklist)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl Auditor {
    /// Creates an auditor with the default checklist and alias syntaxes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an auditor from configuration.
    pub fn from_config(config: &AuditConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            resolver: config.build_resolver()?,
            checklist: config.checklist.clone(),
            fallback: config.fallback_color()?,
            extractor: Box::new(ClassListExtractor),
        })
    }

    pub fn with_resolver(mut self, resolver: TokenResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_checklist(mut self, checklist: Vec<ChecklistPair>) -> Self {
        self.checklist = checklist;
        self
    }

    pub fn with_fallback(mut self, fallback: HslColor) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Replaces the candidate extractor used by source audits.
    pub fn with_extractor<E: CandidateExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn checklist(&self) -> &[ChecklistPair] {
        &self.checklist
    }

    /// Resolves and validates one token pair against `graph`.
    pub fn check_pair(
        &self,
        graph: &TokenGraph,
        foreground: &str,
        background: &str,
        text_size: TextSize,
        context: &str,
    ) -> AuditEntry {
        let fg = self.resolver.resolve(graph, foreground);
        let bg = self.resolver.resolve(graph, background);

        let outcome = match (fg, bg) {
            (Ok(fg), Ok(bg)) => {
                let combination = ColorCombination::new(fg, bg, context).with_text_size(text_size);
                let result = combination.validate();
                Outcome::Checked {
                    combination,
                    result,
                }
            }
            (fg, bg) => {
                let errors: Vec<ResolveError> = [fg.as_ref().err(), bg.as_ref().err()]
                    .into_iter()
                    .flatten()
                    .cloned()
                    .collect();
                self.unresolved(errors, fg.ok(), bg.ok(), text_size, context)
            }
        };

        if let Outcome::Unresolved { errors, .. } = &outcome {
            for error in errors {
                tracing::warn!(foreground, background, context, error = %error, "unresolved pair");
            }
        }

        AuditEntry {
            foreground: foreground.to_string(),
            background: background.to_string(),
            context: context.to_string(),
            text_size,
            outcome,
        }
    }

    fn unresolved(
        &self,
        errors: Vec<ResolveError>,
        foreground: Option<HslColor>,
        background: Option<HslColor>,
        text_size: TextSize,
        context: &str,
    ) -> Outcome {
        let fallback = self.fallback.map(|default| {
            let combination = ColorCombination::new(
                foreground.unwrap_or(default),
                background.unwrap_or(default),
                context,
            )
            .with_text_size(text_size);
            ContrastValidation {
                result: combination.validate(),
                combination,
            }
        });
        Outcome::Unresolved { errors, fallback }
    }

    /// Audits every theme against the checklist, in each mode it defines.
    pub fn run_theme_audit(&self, themes: &[TokenTheme]) -> AuditReport {
        themes
            .iter()
            .map(|theme| self.audit_theme(theme))
            .fold(AuditReport::default(), AuditReport::merge)
    }

    /// Audits one theme: light mode always, dark mode when defined.
    pub fn audit_theme(&self, theme: &TokenTheme) -> AuditReport {
        let mut report = AuditReport::default();
        for mode in theme.modes() {
            let Some(graph) = theme.graph(mode) else {
                continue;
            };
            let entries: Vec<AuditEntry> = self
                .checklist
                .iter()
                .map(|pair| {
                    let context = format!(
                        "{} ({}): {} on {}",
                        theme.name(),
                        mode,
                        pair.foreground,
                        pair.background
                    );
                    self.check_pair(
                        graph,
                        &pair.foreground,
                        &pair.background,
                        pair.text_size,
                        &context,
                    )
                })
                .collect();

            tracing::info!(theme = theme.name(), %mode, entries = entries.len(), "audited theme");
            report
                .groups
                .push(AuditGroup::new(theme.name(), Some(mode), entries));
        }
        report
    }

    /// Audits candidate pairs found in source files against `theme`.
    pub fn run_source_audit(&self, files: &[SourceFile], theme: &TokenTheme) -> AuditReport {
        files
            .iter()
            .map(|file| self.audit_source(file, theme))
            .fold(AuditReport::default(), AuditReport::merge)
    }

    /// Audits one source file. Files without candidates add no groups.
    pub fn audit_source(&self, file: &SourceFile, theme: &TokenTheme) -> AuditReport {
        let candidates = self.extractor.extract_candidates(&file.origin, &file.text);
        let mut report = AuditReport {
            groups: Vec::new(),
            advisories: scan_hardcoded_colors(&file.origin, &file.text),
        };

        for mode in theme.modes() {
            let Some(graph) = theme.graph(mode) else {
                continue;
            };
            let entries: Vec<AuditEntry> = candidates
                .iter()
                .filter(|c| c.applies_to(mode))
                .map(|c| {
                    self.check_pair(graph, &c.foreground, &c.background, c.text_size, &c.context)
                })
                .collect();
            if !entries.is_empty() {
                report
                    .groups
                    .push(AuditGroup::new(file.origin.as_str(), Some(mode), entries));
            }
        }

        tracing::info!(
            origin = %file.origin,
            candidates = candidates.len(),
            advisories = report.advisories.len(),
            "audited source"
        );
        report
    }
}
