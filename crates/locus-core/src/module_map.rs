//! Module map collaborator: mock, duplicate and haste package registries.
//!
//! The resolver never builds these registries itself; a host crawls the
//! project and hands the resolver something implementing [`ModuleMap`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Read-only name -> path registries.
///
/// Keys are exact, case-sensitive strings. Implementations must be safe to
/// read from many threads at once.
pub trait ModuleMap: Send + Sync + std::fmt::Debug {
    /// Registered mock for `name`.
    fn lookup_mock(&self, name: &str) -> Option<PathBuf>;

    /// Registered haste module for `name`.
    fn lookup_duplicate(&self, name: &str) -> Option<PathBuf>;

    /// `package.json` of a haste package named `name`.
    fn lookup_package(&self, _name: &str) -> Option<PathBuf> {
        None
    }
}

/// Map with nothing registered.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyModuleMap;

impl ModuleMap for EmptyModuleMap {
    fn lookup_mock(&self, _name: &str) -> Option<PathBuf> {
        None
    }

    fn lookup_duplicate(&self, _name: &str) -> Option<PathBuf> {
        None
    }
}

/// Hash-map backed module map, loadable from JSON.
///
/// ```json
/// { "mocks": { "fs": "/project/__mocks__/fs.js" },
///   "duplicates": { "Button": "/project/src/Button.js" },
///   "packages": { "shared": "/project/packages/shared/package.json" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryModuleMap {
    pub mocks: HashMap<String, PathBuf>,
    pub duplicates: HashMap<String, PathBuf>,
    pub packages: HashMap<String, PathBuf>,
}

impl InMemoryModuleMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mock.
    #[must_use]
    pub fn with_mock(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.mocks.insert(name.into(), path.into());
        self
    }

    /// Register a haste module.
    #[must_use]
    pub fn with_duplicate(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.duplicates.insert(name.into(), path.into());
        self
    }

    /// Register a haste package by its `package.json` path.
    #[must_use]
    pub fn with_package(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.packages.insert(name.into(), path.into());
        self
    }

    /// Load a module map from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ModuleMap for InMemoryModuleMap {
    fn lookup_mock(&self, name: &str) -> Option<PathBuf> {
        self.mocks.get(name).cloned()
    }

    fn lookup_duplicate(&self, name: &str) -> Option<PathBuf> {
        self.duplicates.get(name).cloned()
    }

    fn lookup_package(&self, name: &str) -> Option<PathBuf> {
        self.packages.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_lookups_are_exact() {
        let map = InMemoryModuleMap::new()
            .with_mock("fs", "/p/__mocks__/fs.js")
            .with_duplicate("Button", "/p/src/Button.js");

        assert_eq!(map.lookup_mock("fs"), Some(PathBuf::from("/p/__mocks__/fs.js")));
        assert_eq!(map.lookup_mock("FS"), None);
        assert_eq!(map.lookup_duplicate("Button"), Some(PathBuf::from("/p/src/Button.js")));
        assert_eq!(map.lookup_duplicate("button"), None);
        assert_eq!(map.lookup_package("Button"), None);
    }

    #[test]
    fn test_empty_map() {
        assert!(EmptyModuleMap.lookup_mock("x").is_none());
        assert!(EmptyModuleMap.lookup_duplicate("x").is_none());
        assert!(EmptyModuleMap.lookup_package("x").is_none());
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("module-map.json");
        fs::write(
            &file,
            r#"{"mocks": {"fs": "/m/fs.js"}, "packages": {"shared": "/pkgs/shared/package.json"}}"#,
        )
        .unwrap();

        let map = InMemoryModuleMap::from_file(&file).unwrap();
        assert_eq!(map.lookup_mock("fs"), Some(PathBuf::from("/m/fs.js")));
        assert!(map.duplicates.is_empty());
        assert_eq!(
            map.lookup_package("shared"),
            Some(PathBuf::from("/pkgs/shared/package.json"))
        );
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            InMemoryModuleMap::from_file(&missing),
            Err(Error::ConfigRead { .. })
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(
            InMemoryModuleMap::from_file(&bad),
            Err(Error::ConfigParse { .. })
        ));
    }
}
