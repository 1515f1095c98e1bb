//! `NODE_PATH` search roots.

use crate::paths::PathOps;
use locus_util::FileSystem;
use std::ffi::OsString;
use std::path::Path;
use tracing::debug;

/// Environment variable listing extra search roots.
pub const NODE_PATH_ENV: &str = "NODE_PATH";

/// Split a `NODE_PATH` value on the convention's delimiter.
///
/// Blank entries are dropped; the rest are resolved against `cwd`.
#[must_use]
pub fn parse_node_path(path: &dyn PathOps, raw: &str, cwd: &str) -> Vec<String> {
    raw.split(path.delimiter())
        .filter(|entry| !entry.is_empty())
        .map(|entry| path.resolve(cwd, &[entry]))
        .collect()
}

/// `NODE_PATH` entries resolved against the real (symlink-free) `cwd`.
#[must_use]
pub fn node_paths(fs: &dyn FileSystem, path: &dyn PathOps, raw: Option<&str>, cwd: &str) -> Vec<String> {
    match raw {
        Some(raw) if !raw.is_empty() => parse_node_path(path, raw, &physical_cwd(fs, cwd)),
        _ => Vec::new(),
    }
}

/// Read `NODE_PATH` from the process environment.
#[must_use]
pub fn node_paths_from_env(fs: &dyn FileSystem, path: &dyn PathOps, cwd: &str) -> Vec<String> {
    let raw = node_path_value(std::env::var_os(NODE_PATH_ENV));
    node_paths(fs, path, raw.as_deref(), cwd)
}

/// Non-Unicode values are kept, with invalid sequences replaced.
fn node_path_value(raw: Option<OsString>) -> Option<String> {
    let raw = raw?;
    match raw.into_string() {
        Ok(value) => Some(value),
        Err(raw) => {
            let value = raw.to_string_lossy().into_owned();
            debug!(value = %value, "NODE_PATH is not valid unicode; using lossy conversion");
            Some(value)
        }
    }
}

fn physical_cwd(fs: &dyn FileSystem, cwd: &str) -> String {
    fs.realpath(Path::new(cwd))
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| cwd.to_string())
}
