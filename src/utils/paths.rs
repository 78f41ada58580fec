// Unit id conversion
//
// Source units are identified by their path relative to the scanned root,
// always with `/` separators, so ids (and therefore diagnostics and element
// ids) do not depend on where or on which platform the tree was checked out.

use anyhow::{Context, Result};
use std::path::{Path, MAIN_SEPARATOR};

/// Convert a path under `root` to a relative Unix-style id (`com/acme/Shop.java`)
///
/// Both paths are canonicalized when possible so symlinked roots
/// (`/var` -> `/private/var` on macOS) still strip cleanly; otherwise the
/// paths are compared as given.
///
/// # Errors
/// Fails when `absolute` is not under `root` or is not valid UTF-8.
pub fn to_relative_unix_style(absolute: &Path, root: &Path) -> Result<String> {
    let (path, root) = match (absolute.canonicalize(), root.canonicalize()) {
        (Ok(path), Ok(root)) => (path, root),
        _ => (absolute.to_path_buf(), root.to_path_buf()),
    };

    let relative = path.strip_prefix(&root).with_context(|| {
        format!(
            "File path '{}' is not within root '{}'",
            path.display(),
            root.display()
        )
    })?;
    let relative = relative.to_str().context("Path contains invalid UTF-8")?;

    Ok(if MAIN_SEPARATOR == '\\' {
        relative.replace('\\', "/")
    } else {
        relative.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_nested_unit_id() {
        let root = PathBuf::from("/home/dev/shop");
        let absolute = PathBuf::from("/home/dev/shop/src/com/acme/Inventory.java");

        let id = to_relative_unix_style(&absolute, &root).unwrap();

        assert_eq!(id, "src/com/acme/Inventory.java");
        assert!(!id.contains('\\'));
    }

    #[test]
    fn test_root_level_unit() {
        let root = PathBuf::from("/home/dev/shop");
        let id = to_relative_unix_style(&root.join("model.puml"), &root).unwrap();
        assert_eq!(id, "model.puml");
    }

    #[test]
    fn test_spaces_and_unicode() {
        let root = PathBuf::from("/home/dev/my models");
        let absolute = PathBuf::from("/home/dev/my models/diagrams/Größe.java");
        assert_eq!(
            to_relative_unix_style(&absolute, &root).unwrap(),
            "diagrams/Größe.java"
        );
    }

    #[test]
    fn test_outside_root_rejected() {
        let root = PathBuf::from("/home/dev/shop");
        let result = to_relative_unix_style(Path::new("/etc/passwd"), &root);
        assert!(result.unwrap_err().to_string().contains("not within root"));
    }
}
