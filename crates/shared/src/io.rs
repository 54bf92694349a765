use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::data_dir;
use crate::models::SavedItem;

/// Get the default directory for export files
pub fn default_exports_dir() -> Result<PathBuf> {
    let dir = data_dir()?.join("exports");
    fs::create_dir_all(&dir).context("Failed to create exports directory")?;
    Ok(dir)
}

/// File name for an export taken now, e.g. `saves-20260105-143000.json`.
pub fn export_filename() -> String {
    format!("saves-{}.json", chrono::Local::now().format("%Y%m%d-%H%M%S"))
}

/// Write saves to `path` as a pretty-printed JSON array.
pub fn export_saves(items: &[SavedItem], path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(items).context("Failed to serialize saves")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;

    Ok(path.to_path_buf())
}

/// Load a file written by [`export_saves`].
pub fn load_export(path: &Path) -> Result<Vec<SavedItem>> {
    if !path.exists() {
        anyhow::bail!("Export file not found: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read export file: {}", path.display()))?;

    serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse export JSON from {}. The file may be corrupted or not a saves export.",
            path.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Platform};

    fn item(id: i64) -> SavedItem {
        SavedItem {
            id,
            url: format!("https://example.com/{}", id),
            platform: Platform::Article,
            caption: "Weekend bread".to_string(),
            hashtags: "baking, bread".to_string(),
            category: Category::Food,
            summary: "A loaf.".to_string(),
            created_at: "2026-01-05 14:30:00.000".to_string(),
        }
    }

    #[test]
    fn test_export_and_load() {
        let dir = std::env::temp_dir().join(format!("link-bucket-export-{}", std::process::id()));
        let path = dir.join("nested").join("saves.json");

        let written = export_saves(&[item(2), item(1)], &path).unwrap();
        assert_eq!(written, path);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"category\": \"Food\""));
        assert!(raw.contains("\"platform\": \"article\""));

        let loaded = load_export(&path).unwrap();
        assert_eq!(loaded, vec![item(2), item(1)]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_export(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Export file not found"));
    }

    #[test]
    fn test_export_filename() {
        let name = export_filename();
        assert!(name.starts_with("saves-"));
        assert!(name.ends_with(".json"));
    }
}
