//! Filesystem collaborators for module resolution.
//!
//! The resolver only ever asks a handful of questions of the filesystem, so
//! they are expressed as the [`FileSystem`] trait. [`OsFs`] answers them
//! from disk; [`MemoryFs`] answers them from an in-memory tree and works for
//! both POSIX and Windows style paths on any host.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only filesystem questions asked during resolution.
///
/// Implementations must be safe to share between threads.
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Return true if the path points to a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Return true if the path points to a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Return true if anything exists at the path.
    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    /// Read a file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Resolve symlinks and return the canonical path.
    fn realpath(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Read a file to string, replacing invalid UTF-8 sequences with the replacement character.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_to_string_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Real filesystem adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl FileSystem for OsFs {
    fn is_file(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        read_to_string_lossy(path)
    }

    fn realpath(&self, path: &Path) -> io::Result<PathBuf> {
        // dunce keeps Windows paths free of the `\\?\` verbatim prefix.
        dunce::canonicalize(path)
    }
}

/// In-memory filesystem keyed by exact path strings.
///
/// Parent directories of every inserted file are created implicitly. Both `/`
/// and `\` count as separators, and `X:` drive prefixes keep their root
/// separator, so `D:\project\a.js` registers `D:\project` and `D:\`.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: BTreeMap<String, String>,
    dirs: BTreeSet<String>,
}

impl MemoryFs {
    /// Create an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with contents, creating its parent directories.
    pub fn add_file(&mut self, path: impl AsRef<str>, contents: impl Into<String>) {
        let path = trim_trailing_separators(path.as_ref());
        for dir in ancestors(path) {
            self.dirs.insert(dir);
        }
        self.files.insert(path.to_string(), contents.into());
    }

    /// Add an empty directory and its parents.
    pub fn add_dir(&mut self, path: impl AsRef<str>) {
        let path = trim_trailing_separators(path.as_ref());
        for dir in ancestors(path) {
            self.dirs.insert(dir);
        }
        self.dirs.insert(path.to_string());
    }

    /// Builder form of [`MemoryFs::add_file`].
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<str>, contents: impl Into<String>) -> Self {
        self.add_file(path, contents);
        self
    }

    /// Builder form of [`MemoryFs::add_dir`].
    #[must_use]
    pub fn with_dir(mut self, path: impl AsRef<str>) -> Self {
        self.add_dir(path);
        self
    }

    fn key(path: &Path) -> String {
        trim_trailing_separators(&path.to_string_lossy()).to_string()
    }
}

impl FileSystem for MemoryFs {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(&Self::key(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(&Self::key(path))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(&Self::key(path)).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn realpath(&self, path: &Path) -> io::Result<PathBuf> {
        if self.exists(path) {
            Ok(PathBuf::from(Self::key(path)))
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such path: {}", path.display()),
            ))
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Strip trailing separators, keeping a lone root (`/`, `\`, `X:\`).
fn trim_trailing_separators(path: &str) -> &str {
    let trimmed = path.trim_end_matches(is_separator);
    if trimmed.is_empty() {
        return &path[..path.len().min(1)];
    }
    if is_drive(trimmed) && trimmed.len() < path.len() {
        return &path[..trimmed.len() + 1];
    }
    trimmed
}

fn is_drive(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Every proper ancestor directory of `path`, root included.
fn ancestors(path: &str) -> Vec<String> {
    let mut out = Vec::new();
    for (i, c) in path.char_indices() {
        if !is_separator(c) || i + 1 == path.len() {
            continue;
        }
        let prefix = &path[..i];
        if prefix.is_empty() || is_drive(prefix) {
            // Root: keep the separator itself.
            out.push(path[..=i].to_string());
        } else if !prefix.ends_with(is_separator) {
            out.push(prefix.to_string());
        }
    }
    out
}
