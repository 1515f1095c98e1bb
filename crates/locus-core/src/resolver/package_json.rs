//! Package descriptor (`package.json`) entry point selection.

use locus_util::FileSystem;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// The fields of `package.json` that matter for resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJson {
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub browser: Option<BrowserField>,
}

/// `browser` is either a replacement entry point or a per-file remapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BrowserField {
    Entry(String),
    Map(HashMap<String, Value>),
}

impl PackageJson {
    /// Read and parse a descriptor. Unreadable or malformed files count as absent.
    pub fn read(fs: &dyn FileSystem, path: &Path) -> Option<Self> {
        let content = fs.read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(pkg) => Some(pkg),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "ignoring malformed package.json");
                None
            }
        }
    }

    /// Entry point to load for the package directory.
    ///
    /// With `browser` set, a string `browser` field replaces `main`, and an
    /// object `browser` field may remap `main` (with or without a leading
    /// `./`). Entries that point at the package directory itself are ignored.
    #[must_use]
    pub fn entry(&self, browser: bool) -> Option<&str> {
        let main = self.main.as_deref();
        let entry = if browser {
            match &self.browser {
                Some(BrowserField::Entry(entry)) => Some(entry.as_str()),
                Some(BrowserField::Map(map)) => main
                    .and_then(|m| remap(map, m))
                    .or(main),
                None => main,
            }
        } else {
            main
        };
        entry.filter(|e| !is_current_directory(e))
    }
}

fn remap<'a>(map: &'a HashMap<String, Value>, main: &str) -> Option<&'a str> {
    let bare = main.trim_start_matches("./");
    [main.to_string(), format!("./{bare}"), bare.to_string()]
        .iter()
        .find_map(|key| map.get(key).and_then(Value::as_str))
}

fn is_current_directory(entry: &str) -> bool {
    matches!(entry, "" | "." | "./" | ".\\")
}
