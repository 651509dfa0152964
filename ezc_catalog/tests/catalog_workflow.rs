//! Merge / check / stats against files on disk

use std::path::Path;

use ezc::catalog::Catalog;
use ezc_catalog::{CatalogToolError, ToolResult, check, merge, stats};
use ezception::export::TemplateExport;
use tempfile::TempDir;

fn write_export(path: &Path, templates: &[&str]) {
    let export = TemplateExport {
        templates: templates.iter().map(|t| t.to_string()).collect(),
    };
    std::fs::write(path, serde_json::to_string(&export).unwrap()).unwrap();
}

#[test]
fn test_merge_creates_catalog() -> ToolResult<()> {
    let dir = TempDir::new().unwrap();
    let templates = dir.path().join("templates.json");
    let catalog = dir.path().join("de.toml");
    write_export(&templates, &["{self.what!r} was not found", "Permission denied"]);

    let report = merge(&templates, &catalog, Some("de"), false)?;
    assert_eq!(report.added.len(), 2);

    let saved = Catalog::load(&catalog)?;
    assert_eq!(saved.locale(), "de");
    assert_eq!(saved.untranslated().len(), 2);
    Ok(())
}

#[test]
fn test_merge_without_locale_needs_existing_catalog() {
    let dir = TempDir::new().unwrap();
    let templates = dir.path().join("templates.json");
    write_export(&templates, &["x"]);

    let result = merge(&templates, &dir.path().join("absent.toml"), None, false);
    assert!(matches!(result, Err(CatalogToolError::MissingLocale(_))));
}

#[test]
fn test_merge_keeps_translations_and_prunes() -> ToolResult<()> {
    let dir = TempDir::new().unwrap();
    let templates = dir.path().join("templates.json");
    let path = dir.path().join("de.toml");

    let mut existing = Catalog::new("de");
    existing.insert("kept", "behalten");
    existing.insert("gone", "weg");
    existing.save(&path)?;
    write_export(&templates, &["kept", "new"]);

    let report = merge(&templates, &path, None, true)?;
    assert_eq!(report.added, vec!["new".to_string()]);
    assert_eq!(report.stale, vec!["gone".to_string()]);

    let saved = Catalog::load(&path)?;
    assert_eq!(saved.lookup("kept"), Some("behalten"));
    assert!(saved.messages.contains_key("new"));
    assert!(!saved.messages.contains_key("gone"));
    Ok(())
}

#[test]
fn test_check_reports_gaps() -> ToolResult<()> {
    let dir = TempDir::new().unwrap();
    let templates = dir.path().join("templates.json");
    let path = dir.path().join("de.toml");

    let mut existing = Catalog::new("de");
    existing.insert("done", "fertig");
    existing.insert("todo", "");
    existing.insert("old", "");
    existing.save(&path)?;
    write_export(&templates, &["done", "todo", "absent"]);

    let report = check(&templates, &path)?;
    assert_eq!(report.missing, vec!["absent".to_string()]);
    assert_eq!(report.untranslated, vec!["todo".to_string()]);
    assert_eq!(report.stale, vec!["old".to_string()]);
    assert!(!report.is_complete());
    Ok(())
}

#[test]
fn test_stats_counts() -> ToolResult<()> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fr.toml");
    let mut existing = Catalog::new("fr");
    existing.insert("a", "a");
    existing.insert("b", "");
    existing.save(&path)?;

    let counts = stats(&path)?;
    assert_eq!(counts.locale, "fr");
    assert_eq!(counts.entries, 2);
    assert_eq!(counts.translated, 1);
    assert_eq!(counts.untranslated, 1);
    Ok(())
}

#[test]
fn test_bad_export_is_reported() {
    let dir = TempDir::new().unwrap();
    let templates = dir.path().join("templates.json");
    std::fs::write(&templates, "not json").unwrap();

    let result = stats(&dir.path().join("none.toml"));
    assert!(matches!(result, Err(CatalogToolError::Config(_))));

    let result = check(&templates, &dir.path().join("none.toml"));
    assert!(matches!(result, Err(CatalogToolError::Export(_))));
}

#[test]
fn test_program_export_feeds_merge() -> ToolResult<()> {
    let dir = TempDir::new().unwrap();
    let templates = dir.path().join("templates.json");
    let path = dir.path().join("de.toml");

    ezception::Kind::declare("WorkflowSample")
        .message("workflow {self.step} failed")
        .build()?;
    ezception::export::write_templates_json(std::fs::File::create(&templates).unwrap())?;

    let report = merge(&templates, &path, Some("de"), false)?;
    assert!(report.added.iter().any(|t| t == "workflow {self.step} failed"));
    Ok(())
}
