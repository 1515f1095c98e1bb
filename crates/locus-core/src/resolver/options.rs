//! Resolver options.

use super::external::ExternalResolver;
use super::mapper::NameMapper;
use crate::paths::PathStyle;
use std::path::PathBuf;
use std::sync::Arc;

/// Default extensions for probing.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js"];

/// Default module directory name.
pub const DEFAULT_MODULE_DIRECTORY: &str = "node_modules";

/// Options fixed for the lifetime of a [`super::Resolver`].
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Extensions to probe (in order).
    pub extensions: Vec<String>,
    /// Platform suffixes tried before plain extensions.
    pub platforms: Vec<String>,
    /// Prepended to `platforms` when set.
    pub default_platform: Option<String>,
    /// Relative names walked up the tree, or absolute search roots.
    pub module_directories: Vec<String>,
    pub module_name_mapper: NameMapper,
    /// Extra search roots, probed after the walked directories and `NODE_PATH`.
    pub module_paths: Vec<String>,
    pub browser: bool,
    pub has_core_modules: bool,
    pub resolver: Option<Arc<dyn ExternalResolver>>,
    pub root_dir: Option<String>,
    pub path_style: PathStyle,
    /// Base for relative `from` paths.
    pub cwd: String,
    /// Check candidate lists on the rayon pool.
    pub parallel_probe: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            platforms: Vec::new(),
            default_platform: None,
            module_directories: vec![DEFAULT_MODULE_DIRECTORY.to_string()],
            module_name_mapper: NameMapper::default(),
            module_paths: Vec::new(),
            browser: false,
            has_core_modules: true,
            resolver: None,
            root_dir: None,
            path_style: PathStyle::host(),
            cwd: std::env::current_dir()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|_| ".".to_string()),
            parallel_probe: false,
        }
    }
}

impl ResolverOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extensions to probe.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set platform suffixes.
    #[must_use]
    pub fn with_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_default_platform(mut self, platform: impl Into<String>) -> Self {
        self.default_platform = Some(platform.into());
        self
    }

    /// Set module directories.
    #[must_use]
    pub fn with_module_directories<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_directories = dirs.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_module_name_mapper(mut self, mapper: NameMapper) -> Self {
        self.module_name_mapper = mapper;
        self
    }

    #[must_use]
    pub fn with_module_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_browser(mut self, browser: bool) -> Self {
        self.browser = browser;
        self
    }

    #[must_use]
    pub fn with_core_modules(mut self, enabled: bool) -> Self {
        self.has_core_modules = enabled;
        self
    }

    /// Install an external resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: impl ExternalResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    #[must_use]
    pub fn with_root_dir(mut self, root_dir: impl Into<String>) -> Self {
        self.root_dir = Some(root_dir.into());
        self
    }

    /// Set the path convention.
    #[must_use]
    pub fn with_path_style(mut self, style: PathStyle) -> Self {
        self.path_style = style;
        self
    }

    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into().to_string_lossy().into_owned();
        self
    }

    #[must_use]
    pub fn with_parallel_probe(mut self, parallel: bool) -> Self {
        self.parallel_probe = parallel;
        self
    }

    /// `default_platform` followed by `platforms`, without repeats.
    #[must_use]
    pub fn effective_platforms(&self) -> Vec<String> {
        let mut out: Vec<String> = self.default_platform.iter().cloned().collect();
        for platform in &self.platforms {
            if !out.contains(platform) {
                out.push(platform.clone());
            }
        }
        out
    }
}
