//! The resolver: name mapping, module map, plugin and filesystem lookup.
//!
//! Resolution of `(from, specifier)`:
//! 1. `moduleNameMapper` rewrite
//! 2. haste module (duplicates registry)
//! 3. external resolver, if configured (result trusted verbatim)
//! 4. relative or absolute specifiers: probe from `dirname(from)`
//! 5. bare specifiers: probe every search path, then `NODE_PATH`, then `modulePaths`
//! 6. haste package fallback

use super::external::{ExternalResolver, ExternalResolverOptions};
use super::node_path::node_paths_from_env;
use super::options::{ResolverOptions, DEFAULT_EXTENSIONS, DEFAULT_MODULE_DIRECTORY};
use super::probe::{CandidateProbe, Tried};
use super::search_paths::build_search_paths;
use super::node_path;
use crate::core_modules::CoreModuleRegistry;
use crate::error::{Error, Result};
use crate::module_map::ModuleMap;
use crate::paths::{PathOps, PathStyle};
use locus_util::{FileSystem, OsFs};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// A single resolution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    /// File the specifier appears in.
    pub from_file: PathBuf,
    pub specifier: String,
}

impl ResolutionRequest {
    pub fn new(from_file: impl Into<PathBuf>, specifier: impl Into<String>) -> Self {
        Self {
            from_file: from_file.into(),
            specifier: specifier.into(),
        }
    }
}

/// Outcome of [`Resolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum Resolution {
    /// Provided by the host platform.
    Core(String),
    /// Registered mock.
    Mock(PathBuf),
    /// File on disk (or whatever the external resolver returned).
    File(PathBuf),
}

impl Resolution {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Core(_) => "core",
            Self::Mock(_) => "mock",
            Self::File(_) => "file",
        }
    }
}

/// Options for a stateless [`Resolver::find_node_module`] call.
#[derive(Debug, Clone)]
pub struct FindNodeModuleOptions {
    /// Directory relative specifiers and the directory walk start from.
    pub basedir: String,
    pub browser: bool,
    pub extensions: Vec<String>,
    pub platforms: Vec<String>,
    pub module_directory: Vec<String>,
    /// Extra search roots, appended after `NODE_PATH` entries.
    pub paths: Vec<String>,
    pub resolver: Option<Arc<dyn ExternalResolver>>,
    pub root_dir: Option<String>,
}

impl Default for FindNodeModuleOptions {
    fn default() -> Self {
        Self {
            basedir: String::new(),
            browser: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            platforms: Vec::new(),
            module_directory: vec![DEFAULT_MODULE_DIRECTORY.to_string()],
            paths: Vec::new(),
            resolver: None,
            root_dir: None,
        }
    }
}

/// Filesystem and path convention a stateless lookup runs against.
#[derive(Debug, Clone, Copy)]
pub struct LookupEnv<'a> {
    pub fs: &'a dyn FileSystem,
    pub style: PathStyle,
    /// Base for relative `basedir` values.
    pub cwd: &'a str,
    /// Resolved `NODE_PATH` entries.
    pub node_paths: &'a [String],
    pub parallel: bool,
}

/// Module resolver bound to one module map and one set of options.
///
/// Holds no mutable state, so one instance can serve many threads.
#[derive(Debug, Clone)]
pub struct Resolver {
    module_map: Arc<dyn ModuleMap>,
    fs: Arc<dyn FileSystem>,
    options: ResolverOptions,
    core_modules: CoreModuleRegistry,
    platforms: Vec<String>,
    node_paths: Vec<String>,
}

impl Resolver {
    /// Create a resolver over the real filesystem.
    ///
    /// `NODE_PATH` is read once, here.
    pub fn new(module_map: Arc<dyn ModuleMap>, options: ResolverOptions) -> Self {
        Self::with_fs(module_map, Arc::new(OsFs), options)
    }

    /// Create a resolver over a custom filesystem.
    pub fn with_fs(
        module_map: Arc<dyn ModuleMap>,
        fs: Arc<dyn FileSystem>,
        options: ResolverOptions,
    ) -> Self {
        let node_paths = node_paths_from_env(fs.as_ref(), options.path_style.ops(), &options.cwd);
        let platforms = options.effective_platforms();
        Self {
            module_map,
            fs,
            options,
            core_modules: CoreModuleRegistry::default(),
            platforms,
            node_paths,
        }
    }

    /// Replace the builtin module table.
    pub fn with_core_module_registry(mut self, registry: CoreModuleRegistry) -> Self {
        self.core_modules = registry;
        self
    }

    /// Use `raw` as the `NODE_PATH` value instead of the process environment.
    pub fn with_node_path(mut self, raw: Option<&str>) -> Self {
        self.node_paths = node_path::node_paths(
            self.fs.as_ref(),
            self.path_ops(),
            raw,
            &self.options.cwd,
        );
        self
    }

    #[must_use]
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolved `NODE_PATH` entries.
    #[must_use]
    pub fn node_paths(&self) -> &[String] {
        &self.node_paths
    }

    fn path_ops(&self) -> &'static dyn PathOps {
        self.options.path_style.ops()
    }

    fn env(&self) -> LookupEnv<'_> {
        LookupEnv {
            fs: self.fs.as_ref(),
            style: self.options.path_style,
            cwd: &self.options.cwd,
            node_paths: &self.node_paths,
            parallel: self.options.parallel_probe,
        }
    }

    /// Whether `name` is a builtin module. Always false with core modules disabled.
    #[must_use]
    pub fn is_core_module(&self, name: &str) -> bool {
        self.options.has_core_modules && self.core_modules.contains(name)
    }

    /// Directories searched for bare specifiers imported from `from_dir`.
    #[must_use]
    pub fn get_module_paths(&self, from_dir: &str) -> Vec<PathBuf> {
        build_search_paths(
            self.path_ops(),
            &self.options.cwd,
            from_dir,
            &self.options.module_directories,
        )
        .into_iter()
        .map(PathBuf::from)
        .collect()
    }

    /// Resolve `specifier` imported from `from_file` to a file.
    pub fn resolve_module(&self, from_file: &Path, specifier: &str) -> Result<PathBuf> {
        let from = from_file.to_string_lossy();
        let mapped = self.options.module_name_mapper.find(specifier);
        let name = mapped.as_ref().map_or(specifier, |m| m.name.as_str());
        if let Some(m) = &mapped {
            debug!(specifier, mapped = %m.name, pattern = %m.pattern, "moduleNameMapper applied");
        }

        let mut tried = Tried::new();
        if let Some(found) = self.resolve_dependency(&from, name, &mut tried)? {
            return Ok(found);
        }

        if let Some(found) = self.resolve_haste_package(name, &mut tried) {
            return Ok(found);
        }

        debug!(specifier, from = %from, "module not found");
        Err(match mapped {
            Some(m) => Error::MappedModuleNotFound {
                specifier: specifier.to_string(),
                mapped: m.name,
                pattern: m.pattern,
                from: from_file.to_path_buf(),
            },
            None => Error::ModuleNotFound {
                specifier: specifier.to_string(),
                from: from_file.to_path_buf(),
                tried: tried.into_paths(),
            },
        })
    }

    /// Registered mock for `name` as imported from `from_file`.
    ///
    /// The mock registry is checked under the raw and then the mapped name.
    /// When a mapping rule matched or an external resolver is configured, the
    /// mapped name is also resolved like a dependency of `from_file`. Absence
    /// is `Ok(None)`; only external resolver errors fail.
    pub fn get_mock_module(&self, from_file: &Path, name: &str) -> Result<Option<PathBuf>> {
        if let Some(mock) = self.module_map.lookup_mock(name) {
            return Ok(Some(mock));
        }

        let mapped = self.options.module_name_mapper.find(name);
        if let Some(m) = &mapped {
            if let Some(mock) = self.module_map.lookup_mock(&m.name) {
                return Ok(Some(mock));
            }
        }

        if mapped.is_none() && self.options.resolver.is_none() {
            return Ok(None);
        }

        let target = mapped.as_ref().map_or(name, |m| m.name.as_str());
        let from = from_file.to_string_lossy();
        let mut tried = Tried::new();
        self.resolve_dependency(&from, target, &mut tried)
    }

    /// Request-level resolution: core module, mock, or file.
    pub fn resolve(&self, request: &ResolutionRequest) -> Result<Resolution> {
        let name = self
            .options
            .module_name_mapper
            .apply(&request.specifier)
            .into_owned();

        if self.is_core_module(&name) {
            return Ok(Resolution::Core(name));
        }
        if let Some(mock) = self.module_map.lookup_mock(&name) {
            return Ok(Resolution::Mock(mock));
        }
        self.resolve_module(&request.from_file, &request.specifier)
            .map(Resolution::File)
    }

    /// Duplicates registry, then plugin or built-in lookup from `dirname(from)`.
    fn resolve_dependency(
        &self,
        from: &str,
        name: &str,
        tried: &mut Tried,
    ) -> Result<Option<PathBuf>> {
        if let Some(module) = self.module_map.lookup_duplicate(name) {
            trace!(name, path = %module.display(), "haste module");
            return Ok(Some(module));
        }

        let options = self.find_options(from);
        lookup(&self.env(), name, &options, tried)
    }

    fn find_options(&self, from: &str) -> FindNodeModuleOptions {
        let path = self.path_ops();
        FindNodeModuleOptions {
            basedir: path.dirname(&path.resolve(&self.options.cwd, &[from])),
            browser: self.options.browser,
            extensions: self.options.extensions.clone(),
            platforms: self.platforms.clone(),
            module_directory: self.options.module_directories.clone(),
            paths: self.options.module_paths.clone(),
            resolver: self.options.resolver.clone(),
            root_dir: self.options.root_dir.clone(),
        }
    }

    /// `@scope/pkg/rest` or `pkg/rest` against a haste package's directory.
    fn resolve_haste_package(&self, name: &str, tried: &mut Tried) -> Option<PathBuf> {
        let path = self.path_ops();
        let (package, rest) = split_package_name(name)?;
        let pkg_json = self.module_map.lookup_package(package)?;
        let pkg_json = pkg_json.to_string_lossy();
        let pkg_dir = path.dirname(&pkg_json);
        let base = if rest.is_empty() {
            pkg_dir
        } else {
            path.join(&[pkg_dir.as_str(), rest])
        };
        trace!(package, base = %base, "haste package");
        self.probe().probe(&base, tried).map(PathBuf::from)
    }

    fn probe(&self) -> CandidateProbe<'_> {
        CandidateProbe {
            fs: self.fs.as_ref(),
            path: self.path_ops(),
            extensions: &self.options.extensions,
            platforms: &self.platforms,
            browser: self.options.browser,
            parallel: self.options.parallel_probe,
        }
    }

    /// Stateless lookup on the real filesystem with the host convention.
    ///
    /// `NODE_PATH` entries from the environment come before `options.paths`.
    /// With `options.resolver` set, its answer is returned unconditionally.
    pub fn find_node_module(
        specifier: &str,
        options: &FindNodeModuleOptions,
    ) -> Result<Option<PathBuf>> {
        let style = PathStyle::host();
        let cwd = std::env::current_dir()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| ".".to_string());
        let node_paths = node_paths_from_env(&OsFs, style.ops(), &cwd);
        let env = LookupEnv {
            fs: &OsFs,
            style,
            cwd: &cwd,
            node_paths: &node_paths,
            parallel: false,
        };
        Self::find_node_module_with(&env, specifier, options)
    }

    /// [`Resolver::find_node_module`] against an explicit environment.
    pub fn find_node_module_with(
        env: &LookupEnv<'_>,
        specifier: &str,
        options: &FindNodeModuleOptions,
    ) -> Result<Option<PathBuf>> {
        let mut tried = Tried::new();
        lookup(env, specifier, options, &mut tried)
    }
}

/// Plugin call or built-in relative/bare lookup.
///
/// A plugin's path is returned as-is, bytes included.
fn lookup(
    env: &LookupEnv<'_>,
    specifier: &str,
    options: &FindNodeModuleOptions,
    tried: &mut Tried,
) -> Result<Option<PathBuf>> {
    let path = env.style.ops();
    let paths: Vec<String> = env
        .node_paths
        .iter()
        .chain(&options.paths)
        .cloned()
        .collect();

    if let Some(resolver) = &options.resolver {
        let plugin_options = ExternalResolverOptions {
            basedir: options.basedir.clone(),
            browser: options.browser,
            extensions: options.extensions.clone(),
            module_directory: options.module_directory.clone(),
            paths,
            root_dir: options.root_dir.clone(),
        };
        debug!(specifier, basedir = %options.basedir, "invoking external resolver");
        return resolver
            .resolve(specifier, &plugin_options)
            .map(Some)
            .map_err(Error::External);
    }

    let probe = CandidateProbe {
        fs: env.fs,
        path,
        extensions: &options.extensions,
        platforms: &options.platforms,
        browser: options.browser,
        parallel: env.parallel,
    };
    let basedir = path.resolve(env.cwd, &[options.basedir.as_str()]);

    if is_path_specifier(path, specifier) {
        let base = path.resolve(&basedir, &[specifier]);
        return Ok(probe.probe(&base, tried).map(PathBuf::from));
    }

    let search_paths = build_search_paths(path, env.cwd, &basedir, &options.module_directory);
    for dir in search_paths.iter().chain(&paths) {
        if let Some(found) = probe.find_file(dir, specifier, tried) {
            debug!(specifier, dir = %dir, "resolved from search path");
            return Ok(Some(PathBuf::from(found)));
        }
    }
    Ok(None)
}

/// Relative (`.`, `..`, `./x`, `../x`) or absolute specifiers.
fn is_path_specifier(path: &dyn PathOps, specifier: &str) -> bool {
    if path.is_absolute(specifier) || specifier == "." || specifier == ".." {
        return true;
    }
    let sep = path.sep();
    ["./", "../"].iter().any(|prefix| specifier.starts_with(prefix))
        || specifier.starts_with(&format!(".{sep}"))
        || specifier.starts_with(&format!("..{sep}"))
}

/// Split `pkg/rest` or `@scope/pkg/rest` into package name and remainder.
fn split_package_name(name: &str) -> Option<(&str, &str)> {
    if name.is_empty() || name.starts_with('.') || name.starts_with('/') {
        return None;
    }
    let end = if name.starts_with('@') {
        let first = name.find('/')?;
        name[first + 1..].find('/').map(|i| first + 1 + i)
    } else {
        name.find('/')
    };
    Some(match end {
        Some(i) => (&name[..i], &name[i + 1..]),
        None => (name, ""),
    })
}
