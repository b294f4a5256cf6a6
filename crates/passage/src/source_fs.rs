//! Filesystem document source.
//!
//! The thin ingestion boundary in front of the core: walks the configured
//! root, applies include/exclude globs, and turns matching text files
//! into [`Document`]s. Richer extraction (PDF, Office formats) is an
//! external collaborator and lives outside this crate.

use anyhow::{bail, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use passage_core::models::Document;

use crate::config::SourceConfig;

/// Scan the source root and return documents in deterministic
/// (path-sorted) order.
pub fn scan_documents(config: &SourceConfig) -> Result<Vec<Document>> {
    if !config.root.exists() {
        bail!("source root does not exist: {}", config.root.display());
    }

    let include_set = build_globset(&config.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut documents = Vec::new();

    let walker = WalkDir::new(&config.root).follow_links(config.follow_symlinks);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(&config.root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) {
            continue;
        }
        if !include_set.is_match(&rel_str) {
            continue;
        }

        // Binary or unreadable files become empty documents and drop out
        // at the chunking stage.
        let body = std::fs::read_to_string(path).unwrap_or_default();
        documents.push(Document::new(rel_str, body));
    }

    // Sort for deterministic ordering
    documents.sort_by(|a, b| a.filename.cmp(&b.filename));

    Ok(documents)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn source_config(root: PathBuf) -> SourceConfig {
        SourceConfig {
            root,
            include_globs: vec!["**/*.md".to_string(), "**/*.txt".to_string()],
            exclude_globs: vec![],
            follow_symlinks: false,
        }
    }

    #[test]
    fn test_scan_includes_and_sorts() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "Beta.").unwrap();
        fs::write(tmp.path().join("a.md"), "Alpha.").unwrap();
        fs::write(tmp.path().join("c.rs"), "fn main() {}").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/d.md"), "Delta.").unwrap();

        let docs = scan_documents(&source_config(tmp.path().to_path_buf())).unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["a.md", "b.txt", "sub/d.md"]);
        assert_eq!(docs[0].full_text, "Alpha.");
    }

    #[test]
    fn test_scan_applies_excludes() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("keep.md"), "Keep.").unwrap();
        fs::write(tmp.path().join("drop.md"), "Drop.").unwrap();
        fs::create_dir_all(tmp.path().join("node_modules/pkg")).unwrap();
        fs::write(tmp.path().join("node_modules/pkg/readme.md"), "Dep.").unwrap();

        let mut config = source_config(tmp.path().to_path_buf());
        config.exclude_globs = vec!["drop.md".to_string()];

        let docs = scan_documents(&config).unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["keep.md"]);
    }

    #[test]
    fn test_missing_root_fails() {
        let config = source_config(PathBuf::from("/nonexistent/docs"));
        assert!(scan_documents(&config).is_err());
    }
}
