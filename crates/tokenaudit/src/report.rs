//! Audit reports and their renderings.
//!
//! An [`AuditReport`] is an ordered list of [`AuditGroup`]s (one per theme
//! and mode, or per source file and mode) plus hardcoded-color advisories.
//!
//! ## Formats
//!
//! | Format | Renderer | Use |
//! |--------|----------|-----|
//! | Markdown | [`render_markdown`] | Human review, CI summaries |
//! | JSON | `serde_json` | Tooling |
//! | YAML | `serde_yaml` | Tooling |
//!
//! The Markdown rendering leads with summary counts, then details every
//! failing and unresolved entry. Passing entries are only counted.
//! Advisories never affect [`AuditReport::is_passing`].

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::Serialize;

use crate::audit::{AuditEntry, Outcome};
use crate::contrast::ContrastValidation;
use crate::error::ReportError;
use crate::extract::HardcodedColor;
use crate::theme::ColorMode;

/// Aggregate counts over a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub unresolved: usize,
}

impl Summary {
    fn record(&mut self, entry: &AuditEntry) {
        self.total += 1;
        if entry.is_passing() {
            self.passed += 1;
        } else if entry.is_failure() {
            self.failed += 1;
        } else {
            self.unresolved += 1;
        }
    }
}

/// Entries audited together: one theme mode, or one source file in one mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditGroup {
    pub name: String,
    pub mode: Option<ColorMode>,
    pub entries: Vec<AuditEntry>,
}

impl AuditGroup {
    pub fn new(name: impl Into<String>, mode: Option<ColorMode>, entries: Vec<AuditEntry>) -> Self {
        Self {
            name: name.into(),
            mode,
            entries,
        }
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for entry in &self.entries {
            summary.record(entry);
        }
        summary
    }

    /// `name (mode)`, or just the name for mode-less groups.
    pub fn label(&self) -> String {
        match self.mode {
            Some(mode) => format!("{} ({})", self.name, mode),
            None => self.name.clone(),
        }
    }
}

/// The result of one or more audits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    pub groups: Vec<AuditGroup>,
    pub advisories: Vec<HardcodedColor>,
}

impl AuditReport {
    /// Wraps direct validations in a single mode-less group.
    pub fn from_validations(name: impl Into<String>, validations: &[ContrastValidation]) -> Self {
        let entries = validations
            .iter()
            .cloned()
            .map(AuditEntry::from_validation)
            .collect();
        Self {
            groups: vec![AuditGroup::new(name, None, entries)],
            advisories: Vec::new(),
        }
    }

    /// Appends `other` after `self`, keeping both orders.
    pub fn merge(mut self, other: AuditReport) -> Self {
        self.groups.extend(other.groups);
        self.advisories.extend(other.advisories);
        self
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for (_, entry) in self.entries() {
            summary.record(entry);
        }
        summary
    }

    /// True when nothing failed and everything resolved.
    pub fn is_passing(&self) -> bool {
        let summary = self.summary();
        summary.failed == 0 && summary.unresolved == 0
    }

    /// Every entry with its group, in report order.
    pub fn entries(&self) -> impl Iterator<Item = (&AuditGroup, &AuditEntry)> {
        self.groups
            .iter()
            .flat_map(|group| group.entries.iter().map(move |entry| (group, entry)))
    }
}

/// Output format for [`render`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
    Yaml,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Yaml => write!(f, "yaml"),
        }
    }
}

#[derive(Serialize)]
struct Document<'a> {
    summary: Summary,
    passing: bool,
    groups: &'a [AuditGroup],
    advisories: &'a [HardcodedColor],
}

/// Renders a report in the given format.
pub fn render(report: &AuditReport, format: ReportFormat) -> Result<String, ReportError> {
    let document = Document {
        summary: report.summary(),
        passing: report.is_passing(),
        groups: &report.groups,
        advisories: &report.advisories,
    };

    match format {
        ReportFormat::Markdown => Ok(render_markdown(report)),
        ReportFormat::Json => {
            serde_json::to_string_pretty(&document).map_err(|e| ReportError::Serialize {
                format: "json",
                message: e.to_string(),
            })
        }
        ReportFormat::Yaml => serde_yaml::to_string(&document).map_err(|e| ReportError::Serialize {
            format: "yaml",
            message: e.to_string(),
        }),
    }
}

/// Renders direct validations as a Markdown report.
pub fn generate_report(validations: &[ContrastValidation]) -> String {
    render_markdown(&AuditReport::from_validations("combinations", validations))
}

/// Renders a report as Markdown.
pub fn render_markdown(report: &AuditReport) -> String {
    let mut out = String::new();
    let summary = report.summary();

    // fmt::Write into a String cannot fail
    let _ = writeln!(out, "# Contrast audit\n");
    let _ = writeln!(out, "| Total | Passed | Failed | Unresolved |");
    let _ = writeln!(out, "|------:|-------:|-------:|-----------:|");
    let _ = writeln!(
        out,
        "| {} | {} | {} | {} |\n",
        summary.total, summary.passed, summary.failed, summary.unresolved
    );

    if report.groups.len() > 1 {
        let _ = writeln!(out, "| Group | Total | Passed | Failed | Unresolved |");
        let _ = writeln!(out, "|-------|------:|-------:|-------:|-----------:|");
        for group in &report.groups {
            let s = group.summary();
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                escape_cell(&group.label()),
                s.total,
                s.passed,
                s.failed,
                s.unresolved
            );
        }
        out.push('\n');
    }

    if summary.failed == 0 && summary.unresolved == 0 {
        let _ = writeln!(out, "All checked combinations meet WCAG AA.\n");
    }

    if summary.failed > 0 {
        let _ = writeln!(out, "## Failures\n");
        for (group, entry) in report.entries().filter(|(_, e)| e.is_failure()) {
            write_failure(&mut out, group, entry);
        }
    }

    if summary.unresolved > 0 {
        let _ = writeln!(out, "## Unresolved\n");
        for (group, entry) in report.entries().filter(|(_, e)| e.is_unresolved()) {
            write_unresolved(&mut out, group, entry);
        }
    }

    if !report.advisories.is_empty() {
        let _ = writeln!(out, "## Hardcoded colors\n");
        let _ = writeln!(
            out,
            "These classes bypass the theme tokens and were not checked.\n"
        );
        let _ = writeln!(out, "| Location | Class |");
        let _ = writeln!(out, "|----------|-------|");
        for advisory in &report.advisories {
            let _ = writeln!(
                out,
                "| {}:{} | `{}` |",
                escape_cell(&advisory.origin),
                advisory.line,
                escape_cell(&advisory.class)
            );
        }
        out.push('\n');
    }

    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

fn write_failure(out: &mut String, group: &AuditGroup, entry: &AuditEntry) {
    let Outcome::Checked {
        combination,
        result,
    } = &entry.outcome
    else {
        return;
    };

    let _ = writeln!(
        out,
        "### {}: {} on {}\n",
        group.label(),
        entry.foreground,
        entry.background
    );
    let _ = writeln!(
        out,
        "- Foreground: `{}` = `{}`",
        entry.foreground, combination.foreground
    );
    let _ = writeln!(
        out,
        "- Background: `{}` = `{}`",
        entry.background, combination.background
    );
    let _ = writeln!(
        out,
        "- Ratio: {}:1 (required {}:1, {} text)",
        format_ratio(result.ratio, result.required_ratio),
        result.required_ratio,
        result.text_size
    );
    let _ = writeln!(out, "- Context: {}\n", entry.context);
}

fn write_unresolved(out: &mut String, group: &AuditGroup, entry: &AuditEntry) {
    let Outcome::Unresolved { errors, fallback } = &entry.outcome else {
        return;
    };

    let _ = writeln!(
        out,
        "### {}: {} on {}\n",
        group.label(),
        entry.foreground,
        entry.background
    );
    for error in errors {
        let _ = writeln!(out, "- Reason: {} ({})", error, error.kind());
    }
    if let Some(validation) = fallback {
        let verdict = if validation.result.meets_aa {
            "passes"
        } else {
            "fails"
        };
        let _ = writeln!(
            out,
            "- With fallback: {}:1, {} (required {}:1)",
            format_ratio(validation.result.ratio, validation.result.required_ratio),
            verdict,
            validation.result.required_ratio
        );
    }
    let _ = writeln!(out, "- Context: {}\n", entry.context);
}

/// Two decimals, truncated when rounding would lift a failing ratio to the
/// required one.
fn format_ratio(ratio: f64, required: f64) -> String {
    if ratio < required && (ratio * 100.0).round() / 100.0 >= required {
        format!("{:.2}", (ratio * 100.0).floor() / 100.0)
    } else {
        format!("{:.2}", ratio)
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
