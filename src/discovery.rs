//! Source discovery: walks a directory tree and reads every matching file
//! into a [`SourceUnit`].

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::pipeline::SourceUnit;
use crate::utils::file_utils;
use crate::utils::paths::to_relative_unix_style;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiscoveryOptions {
    /// Extensions to read, without the leading dot
    pub extensions: Vec<String>,
    /// Only files whose name starts with this prefix
    pub name_prefix: Option<String>,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["java".to_string()],
            name_prefix: None,
        }
    }
}

/// Units read from disk, plus the files that could not be read
#[derive(Debug, Default)]
pub struct DiscoveredSources {
    pub units: Vec<SourceUnit>,
    pub errors: Vec<ExtractionError>,
}

/// Collect every matching file under `root`, in sorted path order.
///
/// Unreadable files are reported in [`DiscoveredSources::errors`] and
/// skipped; only a missing root or a bad pattern fails the call.
pub fn collect_sources(root: &Path, options: &DiscoveryOptions) -> Result<DiscoveredSources> {
    if !root.is_dir() {
        bail!("source root '{}' is not a directory", root.display());
    }
    let root_pattern = glob::Pattern::escape(
        root.to_str()
            .context("source root contains invalid UTF-8")?,
    );

    let mut discovered = DiscoveredSources::default();
    let mut paths: Vec<PathBuf> = Vec::new();
    for extension in &options.extensions {
        let pattern = format!("{}/**/*.{}", root_pattern, extension);
        for entry in glob::glob(&pattern).with_context(|| format!("invalid pattern {pattern}"))? {
            match entry {
                Ok(path) => paths.push(path),
                Err(err) => {
                    let unit = unit_id(err.path(), root);
                    warn!("cannot walk {}: {}", unit, err.error());
                    discovered.errors.push(ExtractionError::Io {
                        unit,
                        source: err.into_error(),
                    });
                }
            }
        }
    }
    paths.sort();
    paths.dedup();

    let prefix = options.name_prefix.as_deref().unwrap_or_default();
    for path in paths {
        if !path.is_file()
            || !file_utils::has_extension(&path, &options.extensions)
            || !file_utils::has_name_prefix(&path, prefix)
        {
            continue;
        }
        let id = unit_id(&path, root);
        match std::fs::read_to_string(&path) {
            Ok(text) => discovered.units.push(SourceUnit::new(id, text)),
            Err(source) => {
                warn!("skipping unreadable unit {}: {}", id, source);
                discovered.errors.push(ExtractionError::Io { unit: id, source });
            }
        }
    }

    debug!(
        "discovered {} units under {} ({} unreadable)",
        discovered.units.len(),
        root.display(),
        discovered.errors.len()
    );
    Ok(discovered)
}

fn unit_id(path: &Path, root: &Path) -> String {
    to_relative_unix_style(path, root).unwrap_or_else(|_| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, text: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_collects_matching_files_in_order() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b/Shop.java", "class Shop {}");
        write(dir.path(), "a/Item.java", "class Item {}");
        write(dir.path(), "a/notes.txt", "not source");
        write(dir.path(), "model.puml", "class Diagram {\n}");

        let found = collect_sources(dir.path(), &DiscoveryOptions::default()).unwrap();
        let ids: Vec<_> = found.units.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["a/Item.java", "b/Shop.java"]);
        assert_eq!(found.units[0].text, "class Item {}");
        assert!(found.errors.is_empty());

        let both = DiscoveryOptions {
            extensions: vec!["java".to_string(), "puml".to_string()],
            ..Default::default()
        };
        let found = collect_sources(dir.path(), &both).unwrap();
        assert_eq!(found.units.len(), 3);
    }

    #[test]
    fn test_name_prefix_filter() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "WorldMap.java", "class WorldMap {}");
        write(dir.path(), "world/Other.java", "class Other {}");

        let options = DiscoveryOptions {
            name_prefix: Some("World".to_string()),
            ..Default::default()
        };
        let found = collect_sources(dir.path(), &options).unwrap();
        let ids: Vec<_> = found.units.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["WorldMap.java"]);
    }

    #[test]
    fn test_unreadable_unit_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "Good.java", "class Good {}");
        fs::write(dir.path().join("Bad.java"), [0xff, 0xfe, 0x00]).unwrap();

        let found = collect_sources(dir.path(), &DiscoveryOptions::default()).unwrap();
        assert_eq!(found.units.len(), 1);
        assert_eq!(found.errors.len(), 1);
        assert_eq!(found.errors[0].unit(), "Bad.java");
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        assert!(collect_sources(&dir.path().join("nope"), &DiscoveryOptions::default()).is_err());
    }
}
