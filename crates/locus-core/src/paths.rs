//! Platform path conventions.
//!
//! All path arithmetic done by the resolver goes through a [`PathOps`]
//! strategy selected by [`PathStyle`]. The strategies operate on strings, not
//! on [`std::path::Path`], so that Windows paths can be resolved on a POSIX
//! host and the other way around. Semantics follow Node's `path.posix` and
//! `path.win32`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Path arithmetic for one platform convention.
pub trait PathOps: Send + Sync + fmt::Debug {
    /// Segment separator emitted by this convention.
    fn sep(&self) -> char;

    /// Separator used in path lists such as `NODE_PATH`.
    fn delimiter(&self) -> char;

    /// Whether `path` is absolute under this convention.
    fn is_absolute(&self, path: &str) -> bool;

    /// Collapse `.`/`..` segments and repeated separators.
    fn normalize(&self, path: &str) -> String;

    /// Join segments and normalize the result. Empty segments are ignored.
    fn join(&self, parts: &[&str]) -> String;

    /// Parent directory of `path`. Roots are their own parent.
    fn dirname(&self, path: &str) -> String;

    /// Resolve `parts` right-to-left into an absolute path, falling back to
    /// `cwd` when no part is absolute. The result has no trailing separator
    /// unless it is a root.
    fn resolve(&self, cwd: &str, parts: &[&str]) -> String;
}

/// Selectable path convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    Posix,
    #[serde(alias = "win32")]
    Windows,
}

impl PathStyle {
    /// Convention of the platform this binary was compiled for.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// The strategy implementing this convention.
    #[must_use]
    pub fn ops(self) -> &'static dyn PathOps {
        match self {
            Self::Posix => &Posix,
            Self::Windows => &Windows,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Posix => "posix",
            Self::Windows => "windows",
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::host()
    }
}

impl fmt::Display for PathStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "posix" => Ok(Self::Posix),
            "windows" | "win32" => Ok(Self::Windows),
            other => Err(format!("unknown path style: {other}")),
        }
    }
}

/// Normalize the segments of a root-less path tail.
///
/// `..` is kept only when the path is relative and there is nothing left to pop.
fn normalize_segments(rest: &str, is_sep: fn(char) -> bool, absolute: bool) -> Vec<&str> {
    let mut segs: Vec<&str> = Vec::new();
    for seg in rest.split(is_sep) {
        match seg {
            "" | "." => {}
            ".." => {
                if segs.last().is_some_and(|last| *last != "..") {
                    segs.pop();
                } else if !absolute {
                    segs.push("..");
                }
            }
            _ => segs.push(seg),
        }
    }
    segs
}

fn non_empty<'a>(parts: &[&'a str]) -> Vec<&'a str> {
    parts.iter().copied().filter(|p| !p.is_empty()).collect()
}

/// POSIX convention (`/`, `:`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Posix;

impl Posix {
    fn is_sep(c: char) -> bool {
        c == '/'
    }
}

impl PathOps for Posix {
    fn sep(&self) -> char {
        '/'
    }

    fn delimiter(&self) -> char {
        ':'
    }

    fn is_absolute(&self, path: &str) -> bool {
        path.starts_with('/')
    }

    fn normalize(&self, path: &str) -> String {
        if path.is_empty() {
            return ".".to_string();
        }
        let absolute = self.is_absolute(path);
        let segs = normalize_segments(path, Self::is_sep, absolute);
        let mut out = String::new();
        if absolute {
            out.push('/');
        }
        out.push_str(&segs.join("/"));
        if out.is_empty() {
            return ".".to_string();
        }
        if path.ends_with('/') && !segs.is_empty() {
            out.push('/');
        }
        out
    }

    fn join(&self, parts: &[&str]) -> String {
        let parts = non_empty(parts);
        if parts.is_empty() {
            return ".".to_string();
        }
        self.normalize(&parts.join("/"))
    }

    fn dirname(&self, path: &str) -> String {
        if path.is_empty() {
            return ".".to_string();
        }
        let absolute = self.is_absolute(path);
        let trimmed = path.trim_end_matches('/');
        match trimmed.rfind('/') {
            None if absolute => "/".to_string(),
            None => ".".to_string(),
            Some(idx) => {
                let parent = trimmed[..idx].trim_end_matches('/');
                if parent.is_empty() {
                    "/".to_string()
                } else {
                    parent.to_string()
                }
            }
        }
    }

    fn resolve(&self, cwd: &str, parts: &[&str]) -> String {
        let mut tail: Vec<&str> = Vec::new();
        let mut absolute = false;
        for part in parts.iter().rev().copied().chain(std::iter::once(cwd)) {
            if part.is_empty() {
                continue;
            }
            tail.push(part);
            if self.is_absolute(part) {
                absolute = true;
                break;
            }
        }
        tail.reverse();
        let joined = tail.join("/");
        let segs = normalize_segments(&joined, Self::is_sep, absolute);
        let body = segs.join("/");
        if absolute {
            format!("/{body}")
        } else if body.is_empty() {
            ".".to_string()
        } else {
            body
        }
    }
}

/// Windows convention (`\`, `;`), accepting `/` as an input separator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Windows;

/// Root of a Windows path: device (`C:` or `\\server\share`), whether it is
/// rooted at a separator, and the remaining tail.
struct WinRoot<'a> {
    device: String,
    absolute: bool,
    rest: &'a str,
}

impl WinRoot<'_> {
    fn root(&self) -> String {
        let mut root = self.device.clone();
        if self.absolute {
            root.push('\\');
        }
        root
    }
}

impl Windows {
    fn is_sep(c: char) -> bool {
        c == '/' || c == '\\'
    }

    fn split_root(path: &str) -> WinRoot<'_> {
        let bytes = path.as_bytes();
        let sep_at = |i: usize| bytes.get(i).is_some_and(|b| *b == b'/' || *b == b'\\');

        if sep_at(0) && sep_at(1) {
            // UNC: \\server\share\rest
            let after = &path[2..];
            let mut pieces = after.splitn(3, Self::is_sep);
            let server = pieces.next().unwrap_or_default();
            let share = pieces.next().unwrap_or_default();
            if !server.is_empty() && !share.is_empty() {
                return WinRoot {
                    device: format!("\\\\{server}\\{share}"),
                    absolute: true,
                    rest: pieces.next().unwrap_or_default(),
                };
            }
            return WinRoot {
                device: String::new(),
                absolute: true,
                rest: &path[1..],
            };
        }

        if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
            let absolute = sep_at(2);
            return WinRoot {
                device: path[..2].to_string(),
                absolute,
                rest: if absolute { &path[3..] } else { &path[2..] },
            };
        }

        if sep_at(0) {
            return WinRoot {
                device: String::new(),
                absolute: true,
                rest: &path[1..],
            };
        }

        WinRoot {
            device: String::new(),
            absolute: false,
            rest: path,
        }
    }
}

impl PathOps for Windows {
    fn sep(&self) -> char {
        '\\'
    }

    fn delimiter(&self) -> char {
        ';'
    }

    fn is_absolute(&self, path: &str) -> bool {
        Self::split_root(path).absolute
    }

    fn normalize(&self, path: &str) -> String {
        if path.is_empty() {
            return ".".to_string();
        }
        let root = Self::split_root(path);
        let segs = normalize_segments(root.rest, Self::is_sep, root.absolute);
        let mut out = root.root();
        out.push_str(&segs.join("\\"));
        if segs.is_empty() && !root.absolute {
            out.push('.');
        } else if path.ends_with(Self::is_sep) && !segs.is_empty() {
            out.push('\\');
        }
        out
    }

    fn join(&self, parts: &[&str]) -> String {
        let parts = non_empty(parts);
        if parts.is_empty() {
            return ".".to_string();
        }
        self.normalize(&parts.join("\\"))
    }

    fn dirname(&self, path: &str) -> String {
        if path.is_empty() {
            return ".".to_string();
        }
        let root = Self::split_root(path);
        let prefix = root.root();
        let rest = root.rest.trim_end_matches(Self::is_sep);
        let parent = match rest.rfind(Self::is_sep) {
            None => "",
            Some(idx) => rest[..idx].trim_end_matches(Self::is_sep),
        };
        if parent.is_empty() {
            if prefix.is_empty() {
                ".".to_string()
            } else {
                prefix
            }
        } else {
            format!("{prefix}{parent}")
        }
    }

    fn resolve(&self, cwd: &str, parts: &[&str]) -> String {
        let mut device = String::new();
        let mut tail: Vec<&str> = Vec::new();
        let mut absolute = false;

        for part in parts.iter().rev().copied().chain(std::iter::once(cwd)) {
            if part.is_empty() {
                continue;
            }
            let root = Self::split_root(part);
            if !root.device.is_empty() {
                if device.is_empty() {
                    device.clone_from(&root.device);
                } else if !device.eq_ignore_ascii_case(&root.device) {
                    // Path on another drive; cannot contribute.
                    continue;
                }
            }
            if !absolute {
                tail.push(root.rest);
                absolute = root.absolute;
            }
            if absolute && !device.is_empty() {
                break;
            }
        }

        // A drive with no root anywhere in the chain is taken from its root.
        if !device.is_empty() {
            absolute = true;
        }
        tail.reverse();
        let joined = tail.join("\\");
        let segs = normalize_segments(&joined, Self::is_sep, absolute);
        let mut out = device;
        if absolute {
            out.push('\\');
        }
        out.push_str(&segs.join("\\"));
        if out.is_empty() {
            ".".to_string()
        } else {
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posix_join_and_normalize() {
        let p = PathStyle::Posix.ops();
        assert_eq!(p.join(&["/temp/project", "node_modules"]), "/temp/project/node_modules");
        assert_eq!(p.join(&["/", "node_modules"]), "/node_modules");
        assert_eq!(p.join(&["a", "", "b/../c"]), "a/c");
        assert_eq!(p.join(&[]), ".");
        assert_eq!(p.normalize("/a//b/./c/"), "/a/b/c/");
        assert_eq!(p.normalize("/../x"), "/x");
        assert_eq!(p.normalize("../x"), "../x");
    }

    #[test]
    fn test_posix_dirname() {
        let p = PathStyle::Posix.ops();
        assert_eq!(p.dirname("/temp/project"), "/temp");
        assert_eq!(p.dirname("/temp/project/"), "/temp");
        assert_eq!(p.dirname("/temp"), "/");
        assert_eq!(p.dirname("/"), "/");
        assert_eq!(p.dirname("file.js"), ".");
        assert_eq!(p.dirname("lib/file.js"), "lib");
    }

    #[test]
    fn test_posix_resolve() {
        let p = PathStyle::Posix.ops();
        assert_eq!(p.resolve("/cwd", &["/temp/project"]), "/temp/project");
        assert_eq!(p.resolve("/cwd", &["lib", "../src"]), "/cwd/src");
        assert_eq!(p.resolve("/cwd", &["/a", "b", "/c", "d"]), "/c/d");
        assert_eq!(p.resolve("/cwd", &[]), "/cwd");
        assert_eq!(p.resolve("/", &["."]), "/");
    }

    #[test]
    fn test_posix_absolute_and_separators() {
        let p = PathStyle::Posix.ops();
        assert!(p.is_absolute("/x"));
        assert!(!p.is_absolute("x"));
        assert!(!p.is_absolute(r"C:\x"));
        assert_eq!(p.sep(), '/');
        assert_eq!(p.delimiter(), ':');
    }

    #[test]
    fn test_windows_dirname_of_drive_root() {
        let w = PathStyle::Windows.ops();
        assert_eq!(w.dirname(r"D:\project"), r"D:\");
        assert_eq!(w.dirname(r"D:\"), r"D:\");
        assert_eq!(w.dirname(r"D:\a\b"), r"D:\a");
        assert_eq!(w.dirname(r"D:\a\b\"), r"D:\a");
        assert_eq!(w.dirname("file.js"), ".");
        assert_eq!(w.dirname(r"\\server\share\dir"), r"\\server\share\");
    }

    #[test]
    fn test_windows_join_and_normalize() {
        let w = PathStyle::Windows.ops();
        assert_eq!(w.join(&[r"D:\project", "node_modules"]), r"D:\project\node_modules");
        assert_eq!(w.join(&[r"D:\", "node_modules"]), r"D:\node_modules");
        assert_eq!(w.join(&["D:/a/b", "../c"]), r"D:\a\c");
        assert_eq!(w.normalize(r"C:\x\..\..\y"), r"C:\y");
        assert_eq!(w.normalize("C:"), "C:.");
        assert_eq!(w.normalize(r"\\server\share\a\.\b"), r"\\server\share\a\b");
    }

    #[test]
    fn test_windows_is_absolute() {
        let w = PathStyle::Windows.ops();
        assert!(w.is_absolute(r"C:\path"));
        assert!(w.is_absolute("C:/path"));
        assert!(w.is_absolute(r"\rooted"));
        assert!(w.is_absolute(r"\\server\share"));
        assert!(!w.is_absolute("C:relative"));
        assert!(!w.is_absolute("node_modules"));
        assert_eq!(w.sep(), '\\');
        assert_eq!(w.delimiter(), ';');
    }

    #[test]
    fn test_windows_resolve() {
        let w = PathStyle::Windows.ops();
        assert_eq!(w.resolve(r"C:\cwd", &["lib"]), r"C:\cwd\lib");
        assert_eq!(w.resolve(r"C:\cwd", &[r"D:\project"]), r"D:\project");
        assert_eq!(w.resolve(r"C:\cwd", &[r"\top", "x"]), r"C:\top\x");
        assert_eq!(w.resolve(r"C:\cwd", &["D:rel"]), r"D:\rel");
        assert_eq!(w.resolve(r"C:\cwd", &["D:src", "..", "lib"]), r"D:\lib");
        assert!(w.is_absolute(&w.resolve(r"C:\cwd", &["D:rel"])));
        // A POSIX-looking path with no drive stays rooted at `\`.
        assert_eq!(w.resolve("/host/cwd", &["/temp/project"]), r"\temp\project");
    }

    #[test]
    fn test_styles_are_independent() {
        let w = PathStyle::Windows.ops();
        let p = PathStyle::Posix.ops();
        assert_eq!(p.resolve("/", &["/temp/project"]), "/temp/project");
        assert_eq!(w.resolve("/", &["/temp/project"]), r"\temp\project");
        assert_eq!(p.resolve("/", &["/temp/project"]), "/temp/project");
    }

    #[test]
    fn test_path_style_parse_and_display() {
        assert_eq!("posix".parse::<PathStyle>().unwrap(), PathStyle::Posix);
        assert_eq!("win32".parse::<PathStyle>().unwrap(), PathStyle::Windows);
        assert!("amiga".parse::<PathStyle>().is_err());
        assert_eq!(PathStyle::Windows.to_string(), "windows");

        let style: PathStyle = serde_json::from_str(r#""win32""#).unwrap();
        assert_eq!(style, PathStyle::Windows);
    }
}
