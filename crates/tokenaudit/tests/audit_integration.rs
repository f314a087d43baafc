//! End-to-end audits over files on disk.

use std::fs;
use std::path::Path;

use tokenaudit::{
    load_sources, render, render_markdown, resolve_token, validate_contrast, AuditConfig, Auditor,
    ColorMode, HslColor, ReportFormat, ResolveError, TextSize, TokenGraph, TokenTheme,
};

const THEME_CSS: &str = r#"
@layer base {
  :root {
    --background: 0 0% 100%;
    --foreground: 240 10% 4%;
    --card: 0 0% 100%;
    --card-foreground: var(--foreground);
    --brand-500: 262 84% 52%;
    --primary: var(--brand-500);
    --primary-foreground: 0 0% 98%;
    --muted: 240 5% 96%;
    --muted-foreground: 240 4% 65%;
    --radius: 0.5rem;
  }

  .dark {
    --background: 240 10% 4%;
    --foreground: 0 0% 98%;
    --card: 240 10% 4%;
    --muted: 240 4% 16%;
    --muted-foreground: 240 5% 65%;
  }
}

body { color: hsl(var(--foreground)); }
"#;

const BUTTON_TSX: &str = r#"
export function Button() {
  return (
    <button className="bg-primary text-primary-foreground hover:bg-primary/90">
      Save
    </button>
  );
}
"#;

const CARD_TSX: &str = r#"
export function Card() {
  return (
    <div className="bg-card text-card-foreground rounded-lg">
      <p className="bg-muted text-muted-foreground text-sm">Muted</p>
      <span className="bg-white text-black">Hardcoded</span>
      <em className="bg-card text-ghost">Missing</em>
    </div>
  );
}
"#;

fn write_project(root: &Path) {
    fs::write(root.join("theme.css"), THEME_CSS).unwrap();
    fs::create_dir_all(root.join("src/components")).unwrap();
    fs::write(root.join("src/components/button.tsx"), BUTTON_TSX).unwrap();
    fs::write(root.join("src/components/card.tsx"), CARD_TSX).unwrap();
    fs::write(root.join("src/components/notes.md"), "bg-muted text-muted-foreground").unwrap();
}

// ============================================================================
// Contrast scenarios
// ============================================================================

#[test]
fn test_near_black_on_near_white_passes() {
    let result = validate_contrast("0 0% 9%", "0 0% 98%", TextSize::Normal).unwrap();
    assert!(result.ratio > 15.0);
    assert!(result.meets_aa);
}

#[test]
fn test_mid_grays_fail() {
    let result = validate_contrast("0 0% 45%", "0 0% 85%", TextSize::Normal).unwrap();
    assert!(result.ratio < 4.5);
    assert!(!result.meets_aa);
}

#[test]
fn test_black_on_white_is_maximal() {
    for size in [TextSize::Normal, TextSize::Large] {
        let result = validate_contrast("0 0% 0%", "hsl(0 0% 100%)", size).unwrap();
        assert!((result.ratio - 21.0).abs() < 1e-9);
        assert!(result.meets_aa);
    }
}

#[test]
fn test_identical_colors_fail() {
    let result = validate_contrast("200 50% 50%", "200 50% 50%", TextSize::Large).unwrap();
    assert_eq!(result.ratio, 1.0);
    assert!(!result.meets_aa);
}

#[test]
fn test_alias_resolves_to_literal() {
    let graph = TokenGraph::new()
        .define("primary", "var(--brand-500)")
        .define("brand-500", "262 84% 52%");
    assert_eq!(
        resolve_token(&graph, "primary").unwrap(),
        HslColor::parse("262 84% 52%").unwrap()
    );
}

#[test]
fn test_two_token_cycle() {
    let graph = TokenGraph::new()
        .define("foo", "var(--bar)")
        .define("bar", "var(--foo)");
    match resolve_token(&graph, "foo") {
        Err(ResolveError::CycleDetected { path }) => assert_eq!(path, vec!["foo", "bar", "foo"]),
        other => panic!("Expected CycleDetected, got {:?}", other),
    }
}

// ============================================================================
// Theme audit
// ============================================================================

#[test]
fn test_theme_audit_from_file() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let theme = TokenTheme::from_file(dir.path().join("theme.css")).unwrap();
    assert_eq!(theme.name(), "theme");
    assert_eq!(theme.modes(), vec![ColorMode::Light, ColorMode::Dark]);

    let report = Auditor::new().run_theme_audit(&[theme]);
    assert_eq!(report.groups.len(), 2);

    let summary = report.summary();
    // default checklist, both modes
    assert_eq!(summary.total, 18);
    assert!(summary.failed >= 1, "muted-foreground on muted should fail");
    // popover, secondary, accent and destructive are not defined
    assert_eq!(summary.unresolved, 8);
    assert!(!report.is_passing());

    let md = render_markdown(&report);
    assert!(md.contains("### theme (light): muted-foreground on muted"));
    assert!(md.contains("token 'popover-foreground' is not defined"));
}

#[test]
fn test_theme_audit_with_config() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    let config_path = dir.path().join("tokenaudit.yaml");
    fs::write(
        &config_path,
        r#"
checklist:
  - { foreground: foreground, background: background }
  - { foreground: primary-foreground, background: primary }
  - { foreground: card-foreground, background: card }
"#,
    )
    .unwrap();

    let config = AuditConfig::from_file(&config_path).unwrap();
    let theme = TokenTheme::from_file(dir.path().join("theme.css")).unwrap();
    let report = Auditor::from_config(&config).unwrap().run_theme_audit(&[theme]);

    assert_eq!(report.summary().total, 6);
    assert!(report.is_passing(), "{}", render_markdown(&report));
}

#[test]
fn test_yaml_theme_with_brace_aliases() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("brand.yaml");
    fs::write(
        &path,
        r#"
light:
  gray:
    50: "0 0% 98%"
    900: "0 0% 9%"
  background: "{gray.50}"
  foreground: "{gray.900}"
dark:
  background: "{gray.900}"
  foreground: "{gray.50}"
"#,
    )
    .unwrap();

    let theme = TokenTheme::from_file(&path).unwrap();
    let config = AuditConfig::from_yaml(
        "checklist:\n  - { foreground: foreground, background: background }\n",
    )
    .unwrap();
    let report = Auditor::from_config(&config).unwrap().run_theme_audit(&[theme]);

    assert_eq!(report.summary().passed, 2);
}

// ============================================================================
// Source audit
// ============================================================================

#[test]
fn test_source_audit_over_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let config = AuditConfig::default();
    let sources = load_sources(&[dir.path().join("src")], &config.source_extensions).unwrap();
    assert_eq!(sources.len(), 2);

    let theme = TokenTheme::from_file(dir.path().join("theme.css")).unwrap();
    let report = Auditor::from_config(&config)
        .unwrap()
        .run_source_audit(&sources, &theme);

    // button.tsx sorts before card.tsx
    assert!(report.groups[0].name.ends_with("button.tsx"));

    let advisories: Vec<&str> = report.advisories.iter().map(|a| a.class.as_str()).collect();
    assert_eq!(advisories, vec!["bg-white", "text-black"]);

    let unresolved: Vec<&str> = report
        .entries()
        .filter(|(_, e)| e.is_unresolved())
        .map(|(_, e)| e.foreground.as_str())
        .collect();
    assert_eq!(unresolved, vec!["ghost", "ghost"]);

    let md = render_markdown(&report);
    assert!(md.contains("## Hardcoded colors"));
    assert!(md.contains("card.tsx:7: bg-card text-ghost"));
}

#[test]
fn test_json_rendering_of_source_audit() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let sources = load_sources(
        &[dir.path().join("src/components/button.tsx")],
        &AuditConfig::default().source_extensions,
    )
    .unwrap();
    let theme = TokenTheme::from_file(dir.path().join("theme.css")).unwrap();
    let report = Auditor::new().run_source_audit(&sources, &theme);

    let json = render(&report, ReportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["passing"], true);
    assert_eq!(value["groups"][0]["mode"], "light");
    assert_eq!(value["groups"][1]["mode"], "dark");
}
