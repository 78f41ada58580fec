// umlscan utilities
//
// Small filesystem helpers shared by source discovery and the bindings.

use std::path::Path;

/// Path conversion utilities (absolute -> relative Unix-style unit ids)
pub mod paths;

/// File utilities
pub mod file_utils {
    use super::*;

    /// Whether the file's extension is one of `extensions` (case-insensitive,
    /// without the leading dot)
    pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
    }

    /// Whether the file name starts with `prefix` (an empty prefix matches all)
    pub fn has_name_prefix(path: &Path, prefix: &str) -> bool {
        prefix.is_empty()
            || path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| name.starts_with(prefix))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_extension_and_prefix_filters() {
            let java = vec!["java".to_string()];
            assert!(has_extension(Path::new("src/Shop.java"), &java));
            assert!(has_extension(Path::new("src/Shop.JAVA"), &java));
            assert!(!has_extension(Path::new("src/shop.puml"), &java));
            assert!(!has_extension(Path::new("Makefile"), &java));

            assert!(has_name_prefix(Path::new("a/b/WorldMap.java"), "World"));
            assert!(!has_name_prefix(Path::new("World/Map.java"), "World"));
            assert!(has_name_prefix(Path::new("Map.java"), ""));
        }
    }
}
