use crate::error::{Error, Result};
use crate::paths::PathStyle;
use crate::resolver::{NameMapper, ResolverOptions, DEFAULT_EXTENSIONS, DEFAULT_MODULE_DIRECTORY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime configuration for the locus CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}

/// One `moduleNameMapper` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperEntry {
    pub regex: String,
    pub module_name: String,
}

/// Resolver settings as written in a JSON config file.
///
/// ```json
/// {
///   "extensions": [".js", ".jsx"],
///   "platforms": ["native"],
///   "moduleNameMapper": [{ "regex": "^@app/(.*)$", "moduleName": "/app/src/$1" }],
///   "pathStyle": "posix"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    pub extensions: Vec<String>,
    pub platforms: Vec<String>,
    pub default_platform: Option<String>,
    pub module_directories: Vec<String>,
    /// Ordered; the first matching entry wins.
    pub module_name_mapper: Vec<MapperEntry>,
    pub module_paths: Vec<String>,
    pub browser: bool,
    pub has_core_modules: bool,
    pub root_dir: Option<String>,
    /// Host convention when absent.
    pub path_style: Option<PathStyle>,
    pub parallel_probe: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            platforms: Vec::new(),
            default_platform: None,
            module_directories: vec![DEFAULT_MODULE_DIRECTORY.to_string()],
            module_name_mapper: Vec::new(),
            module_paths: Vec::new(),
            browser: false,
            has_core_modules: true,
            root_dir: None,
            path_style: None,
            parallel_probe: false,
        }
    }
}

impl ResolverConfig {
    /// Load a config from a JSON file.
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

    /// Compile into resolver options, validating every mapping rule.
    pub fn into_options(self, cwd: &Path) -> Result<ResolverOptions> {
        let mapper = NameMapper::from_pairs(
            self.module_name_mapper
                .into_iter()
                .map(|entry| (entry.regex, entry.module_name)),
        )?;

        let mut options = ResolverOptions::new()
            .with_extensions(self.extensions)
            .with_platforms(self.platforms)
            .with_module_directories(self.module_directories)
            .with_module_name_mapper(mapper)
            .with_module_paths(self.module_paths)
            .with_browser(self.browser)
            .with_core_modules(self.has_core_modules)
            .with_path_style(self.path_style.unwrap_or_else(PathStyle::host))
            .with_cwd(cwd)
            .with_parallel_probe(self.parallel_probe);
        if let Some(platform) = self.default_platform {
            options = options.with_default_platform(platform);
        }
        if let Some(root_dir) = self.root_dir {
            options = options.with_root_dir(root_dir);
        }
        Ok(options)
    }
}
