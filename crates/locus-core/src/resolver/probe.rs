//! Candidate file probing: extensions, platforms, package entry, index.

use super::package_json::PackageJson;
use crate::paths::PathOps;
use locus_util::FileSystem;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Maximum number of tried paths to record.
pub const MAX_TRIED_PATHS: usize = 20;

/// Base name probed inside a directory when no package entry matches.
const INDEX: &str = "index";

/// Candidate paths tested so far (capped).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tried(Vec<PathBuf>);

impl Tried {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path to tried list (with cap).
    pub fn add(&mut self, path: &str) {
        if self.0.len() < MAX_TRIED_PATHS {
            self.0.push(PathBuf::from(path));
        }
    }

    #[must_use]
    pub fn into_paths(self) -> Vec<PathBuf> {
        self.0
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }
}

/// Probes candidate files for one resolution configuration.
#[derive(Debug, Clone, Copy)]
pub struct CandidateProbe<'a> {
    pub fs: &'a dyn FileSystem,
    pub path: &'a dyn PathOps,
    /// Extensions in probing order. A missing leading dot is added.
    pub extensions: &'a [String],
    /// Platform suffixes in probing order.
    pub platforms: &'a [String],
    /// Prefer the package `browser` field.
    pub browser: bool,
    /// Check each candidate list on the rayon pool.
    pub parallel: bool,
}

impl CandidateProbe<'_> {
    /// Find `base_name` inside `dir`.
    pub fn find_file(&self, dir: &str, base_name: &str, tried: &mut Tried) -> Option<String> {
        let base = self.path.join(&[dir, base_name]);
        self.probe(&base, tried)
    }

    /// Resolve `base` as a file, then as a directory.
    ///
    /// Nothing is probed when the parent directory of `base` does not exist.
    pub fn probe(&self, base: &str, tried: &mut Tried) -> Option<String> {
        if !self.fs.is_dir(Path::new(&self.path.dirname(base))) {
            return None;
        }
        self.probe_file(base, tried)
            .or_else(|| self.probe_directory(base, tried))
    }

    /// Steps 1-3: exact file with a known extension, platform variants, plain extensions.
    fn probe_file(&self, base: &str, tried: &mut Tried) -> Option<String> {
        if self.has_known_extension(base) {
            tried.add(base);
            if self.fs.is_file(Path::new(base)) {
                return Some(base.to_string());
            }
        }
        self.first_existing(&self.candidates(base), tried)
    }

    /// Step 4: package entry, then `index` variants.
    fn probe_directory(&self, dir: &str, tried: &mut Tried) -> Option<String> {
        if !self.fs.is_dir(Path::new(dir)) {
            return None;
        }

        let pkg_json_path = self.path.join(&[dir, "package.json"]);
        if self.fs.is_file(Path::new(&pkg_json_path)) {
            tried.add(&pkg_json_path);
            if let Some(pkg) = PackageJson::read(self.fs, Path::new(&pkg_json_path)) {
                if let Some(entry) = pkg.entry(self.browser) {
                    let target = self.path.join(&[dir, entry]);
                    trace!(package = %pkg_json_path, entry, "probing package entry");
                    let found = self.probe_file(&target, tried).or_else(|| {
                        if self.fs.is_dir(Path::new(&target)) {
                            let index = self.path.join(&[target.as_str(), INDEX]);
                            self.first_existing(&self.candidates(&index), tried)
                        } else {
                            None
                        }
                    });
                    if found.is_some() {
                        return found;
                    }
                }
            }
        }

        let index = self.path.join(&[dir, INDEX]);
        self.first_existing(&self.candidates(&index), tried)
    }

    /// `base.platform.ext` for every platform and extension, then `base.ext`.
    #[must_use]
    pub fn candidates(&self, base: &str) -> Vec<String> {
        let exts: Vec<String> = self.extensions.iter().map(|e| dotted(e)).collect();
        let mut out = Vec::with_capacity(exts.len() * (self.platforms.len() + 1));
        for platform in self.platforms {
            for ext in &exts {
                out.push(format!("{base}.{platform}{ext}"));
            }
        }
        for ext in &exts {
            out.push(format!("{base}{ext}"));
        }
        out
    }

    fn has_known_extension(&self, base: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| base.ends_with(dotted(ext).as_str()))
    }

    /// Earliest candidate (in list order) that is a file.
    ///
    /// In parallel mode the checks run concurrently, but `position_first`
    /// still reports the lowest matching index.
    fn first_existing(&self, candidates: &[String], tried: &mut Tried) -> Option<String> {
        let is_file = |c: &String| self.fs.is_file(Path::new(c));
        let hit = if self.parallel {
            candidates.par_iter().position_first(is_file)
        } else {
            candidates.iter().position(is_file)
        };

        let end = hit.map_or(candidates.len(), |i| i + 1);
        for candidate in &candidates[..end] {
            tried.add(candidate);
        }
        hit.map(|i| candidates[i].clone())
    }
}

fn dotted(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::PathStyle;
    use locus_util::MemoryFs;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn probe<'a>(
        fs: &'a MemoryFs,
        extensions: &'a [String],
        platforms: &'a [String],
    ) -> CandidateProbe<'a> {
        CandidateProbe {
            fs,
            path: PathStyle::Posix.ops(),
            extensions,
            platforms,
            browser: false,
            parallel: false,
        }
    }

    #[test]
    fn test_candidate_order() {
        let fs = MemoryFs::new();
        let exts = strings(&[".js", "jsx"]);
        let platforms = strings(&["ios", "native"]);
        let p = probe(&fs, &exts, &platforms);
        assert_eq!(
            p.candidates("/a/b"),
            vec![
                "/a/b.ios.js",
                "/a/b.ios.jsx",
                "/a/b.native.js",
                "/a/b.native.jsx",
                "/a/b.js",
                "/a/b.jsx",
            ]
        );
    }

    #[test]
    fn test_extension_order_wins() {
        let fs = MemoryFs::new()
            .with_file("/src/dep.jsx", "")
            .with_file("/src/dep.js", "");
        let exts = strings(&[".js", ".jsx"]);
        let p = probe(&fs, &exts, &[]);
        let mut tried = Tried::new();
        assert_eq!(p.find_file("/src", "dep", &mut tried).as_deref(), Some("/src/dep.js"));
        assert_eq!(tried.paths(), &[PathBuf::from("/src/dep.js")]);
    }

    #[test]
    fn test_platform_before_plain() {
        let fs = MemoryFs::new()
            .with_file("/src/dep.jsx", "")
            .with_file("/src/dep.native.jsx", "");
        let exts = strings(&[".js", ".jsx"]);
        let platforms = strings(&["native"]);
        let p = probe(&fs, &exts, &platforms);
        let mut tried = Tried::new();
        assert_eq!(
            p.find_file("/src", "dep", &mut tried).as_deref(),
            Some("/src/dep.native.jsx")
        );
    }

    #[test]
    fn test_exact_file_with_known_extension() {
        let fs = MemoryFs::new()
            .with_file("/src/dep.js", "")
            .with_file("/src/dep.js.js", "");
        let exts = strings(&[".js"]);
        let p = probe(&fs, &exts, &[]);
        let mut tried = Tried::new();
        assert_eq!(p.probe("/src/dep.js", &mut tried).as_deref(), Some("/src/dep.js"));
    }

    #[test]
    fn test_unknown_extension_is_not_exact_match() {
        let fs = MemoryFs::new().with_file("/src/data.json", "{}");
        let exts = strings(&[".js"]);
        let p = probe(&fs, &exts, &[]);
        let mut tried = Tried::new();
        assert!(p.probe("/src/data.json", &mut tried).is_none());
    }

    #[test]
    fn test_directory_package_main() {
        let fs = MemoryFs::new()
            .with_file("/nm/pkg/package.json", r#"{"main": "lib/main"}"#)
            .with_file("/nm/pkg/lib/main.js", "")
            .with_file("/nm/pkg/index.js", "");
        let exts = strings(&[".js"]);
        let p = probe(&fs, &exts, &[]);
        let mut tried = Tried::new();
        assert_eq!(p.probe("/nm/pkg", &mut tried).as_deref(), Some("/nm/pkg/lib/main.js"));
    }

    #[test]
    fn test_directory_package_main_is_directory() {
        let fs = MemoryFs::new()
            .with_file("/nm/pkg/package.json", r#"{"main": "lib"}"#)
            .with_file("/nm/pkg/lib/index.js", "");
        let exts = strings(&[".js"]);
        let p = probe(&fs, &exts, &[]);
        let mut tried = Tried::new();
        assert_eq!(p.probe("/nm/pkg", &mut tried).as_deref(), Some("/nm/pkg/lib/index.js"));
    }

    #[test]
    fn test_directory_browser_entry() {
        let fs = MemoryFs::new()
            .with_file("/nm/pkg/package.json", r#"{"main": "node.js", "browser": "web.js"}"#)
            .with_file("/nm/pkg/node.js", "")
            .with_file("/nm/pkg/web.js", "");
        let exts = strings(&[".js"]);
        let mut p = probe(&fs, &exts, &[]);
        let mut tried = Tried::new();
        assert_eq!(p.probe("/nm/pkg", &mut tried).as_deref(), Some("/nm/pkg/node.js"));
        p.browser = true;
        assert_eq!(p.probe("/nm/pkg", &mut tried).as_deref(), Some("/nm/pkg/web.js"));
    }

    #[test]
    fn test_directory_index_with_platform() {
        let fs = MemoryFs::new()
            .with_file("/src/widget/index.js", "")
            .with_file("/src/widget/index.native.js", "");
        let exts = strings(&[".js"]);
        let platforms = strings(&["native"]);
        let p = probe(&fs, &exts, &platforms);
        let mut tried = Tried::new();
        assert_eq!(
            p.probe("/src/widget", &mut tried).as_deref(),
            Some("/src/widget/index.native.js")
        );
    }

    #[test]
    fn test_missing_parent_probes_nothing() {
        let fs = MemoryFs::new();
        let exts = strings(&[".js"]);
        let p = probe(&fs, &exts, &[]);
        let mut tried = Tried::new();
        assert!(p.probe("/node_modules/left-pad", &mut tried).is_none());
        assert!(tried.paths().is_empty());
    }

    #[test]
    fn test_parallel_reports_earliest_candidate() {
        let mut fs = MemoryFs::new();
        let exts = strings(&[".a", ".b", ".c", ".d", ".e", ".f", ".g", ".h"]);
        for ext in &exts[3..] {
            fs.add_file(format!("/src/mod{ext}"), "");
        }
        let mut p = probe(&fs, &exts, &[]);
        p.parallel = true;
        for _ in 0..50 {
            let mut tried = Tried::new();
            assert_eq!(p.find_file("/src", "mod", &mut tried).as_deref(), Some("/src/mod.d"));
            assert_eq!(tried.paths().len(), 4);
        }
    }

    #[test]
    fn test_tried_is_capped() {
        let mut tried = Tried::new();
        for i in 0..(MAX_TRIED_PATHS + 5) {
            tried.add(&format!("/p/{i}"));
        }
        assert_eq!(tried.into_paths().len(), MAX_TRIED_PATHS);
    }

    #[test]
    fn test_windows_probe() {
        let fs = MemoryFs::new().with_file(r"D:\project\src\dep.js", "");
        let exts = strings(&[".js"]);
        let p = CandidateProbe {
            fs: &fs,
            path: PathStyle::Windows.ops(),
            extensions: &exts,
            platforms: &[],
            browser: false,
            parallel: false,
        };
        let mut tried = Tried::new();
        assert_eq!(
            p.find_file(r"D:\project", "./src/dep", &mut tried).as_deref(),
            Some(r"D:\project\src\dep.js")
        );
    }
}
