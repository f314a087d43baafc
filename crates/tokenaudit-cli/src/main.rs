//! tokenaudit - WCAG contrast audits for design-token themes.
//!
//! ```text
//! tokenaudit themes app/globals.css themes/
//! tokenaudit sources --theme app/globals.css src/components
//! tokenaudit check "0 0% 45%" "0 0% 100%" --large
//! ```
//!
//! The report goes to stdout (or `--output`), logs and the status line to
//! stderr. Exit status is 0 when every entry passes, 1 when anything fails
//! or does not resolve, 2 on errors.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::{Style, Term};
use tokenaudit::theme::THEME_EXTENSIONS;
use tokenaudit::{
    load_sources, render, validate_color_combinations, AuditConfig, AuditReport, Auditor,
    ColorCombination, HslColor, ReportFormat, TextSize, TokenTheme,
};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TOKENAUDIT_LOG";

/// Check design-token themes and components against WCAG AA contrast.
#[derive(Debug, Parser)]
#[command(name = "tokenaudit", version, about)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Audit configuration (YAML or JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Write the report to a file instead of stdout
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Audit theme files against the checklist, in every mode they define
    Themes {
        /// Theme files (.css, .yaml, .yml, .json) or directories of them
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Audit color pairs found in component sources
    Sources {
        /// Theme the sources are rendered with
        #[arg(short, long, value_name = "FILE")]
        theme: PathBuf,

        /// Source files or directories, walked recursively
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Check one foreground/background pair
    Check {
        /// Foreground color, e.g. "0 0% 9%"
        foreground: String,

        /// Background color, e.g. "hsl(0 0% 98%)"
        background: String,

        /// Judge as large text (3:1 instead of 4.5:1)
        #[arg(long)]
        large: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Markdown,
    Json,
    Yaml,
}

impl From<Format> for ReportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => ReportFormat::Markdown,
            Format::Json => ReportFormat::Json,
            Format::Yaml => ReportFormat::Yaml,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            print_status(&report);
            if report.is_passing() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(err) => {
            let red = Style::new().red().bold();
            let _ = Term::stderr().write_line(&format!("{} {:#}", red.apply_to("error:"), err));
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tokenaudit=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<AuditReport> {
    let config = match &cli.config {
        Some(path) => AuditConfig::from_file(path)?,
        None => AuditConfig::default(),
    };

    let report = match &cli.command {
        Command::Themes { paths } => {
            let auditor = Auditor::from_config(&config)?;
            let themes = theme_paths(paths)?
                .iter()
                .map(|path| TokenTheme::from_file(path))
                .collect::<Result<Vec<_>, _>>()?;
            tracing::info!(themes = themes.len(), "running theme audit");
            auditor.run_theme_audit(&themes)
        }
        Command::Sources { theme, paths } => {
            let auditor = Auditor::from_config(&config)?;
            let theme = TokenTheme::from_file(theme)?;
            let sources = load_sources(paths, &config.source_extensions)?;
            tracing::info!(files = sources.len(), theme = theme.name(), "running source audit");
            auditor.run_source_audit(&sources, &theme)
        }
        Command::Check {
            foreground,
            background,
            large,
        } => check_report(foreground, background, *large)?,
    };

    let rendered = render(&report, cli.format.into())?;
    match &cli.output {
        Some(path) => std::fs::write(path, &rendered)
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => println!("{}", rendered.trim_end()),
    }
    Ok(report)
}

fn check_report(foreground: &str, background: &str, large: bool) -> Result<AuditReport> {
    let fg = HslColor::parse(foreground).context("invalid foreground color")?;
    let bg = HslColor::parse(background).context("invalid background color")?;
    let size = if large { TextSize::Large } else { TextSize::Normal };

    let combination = ColorCombination::new(fg, bg, format!("{} on {}", fg, bg)).with_text_size(size);
    let validations = validate_color_combinations(&[combination]);
    Ok(AuditReport::from_validations("check", &validations))
}

/// Expands directories into the theme files directly inside them.
fn theme_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for path in paths {
        if !path.is_dir() {
            found.push(path.clone());
            continue;
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)
            .with_context(|| format!("failed to read {}", path.display()))?
        {
            let entry_path = entry?.path();
            if entry_path.is_file() && is_theme_file(&entry_path) {
                entries.push(entry_path);
            }
        }
        if entries.is_empty() {
            bail!("no theme files in {}", path.display());
        }
        entries.sort();
        found.extend(entries);
    }
    Ok(found)
}

fn is_theme_file(path: &Path) -> bool {
    let name = path.to_string_lossy().to_ascii_lowercase();
    THEME_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

fn print_status(report: &AuditReport) {
    let summary = report.summary();
    let (label, style) = if report.is_passing() {
        ("PASS", Style::new().green().bold())
    } else {
        ("FAIL", Style::new().red().bold())
    };
    let dim = Style::new().dim();

    let line = format!(
        "{} {} {}",
        style.apply_to(label),
        summary.passed,
        dim.apply_to(format!(
            "passed, {} failed, {} unresolved, {} advisories",
            summary.failed,
            summary.unresolved,
            report.advisories.len()
        ))
    );
    let _ = Term::stderr().write_line(&line);
}
