pub mod builtin;
pub mod mock;
pub mod paths;
pub mod resolve;
pub mod version;

use locus_core::{Error, InMemoryModuleMap, ModuleMap, Resolver, ResolverConfig, ResolverOptions};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config and module map files for commands that build a resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct Setup<'a> {
    pub config: Option<&'a Path>,
    pub module_map: Option<&'a Path>,
}

/// Load resolver options from `config` (relative to `cwd`), or use defaults.
pub fn load_options(cwd: &Path, config: Option<&Path>) -> Result<ResolverOptions> {
    let resolver_config = match config {
        Some(path) => ResolverConfig::from_file(&cwd.join(path)).into_diagnostic()?,
        None => ResolverConfig::default(),
    };
    resolver_config.into_options(cwd).into_diagnostic()
}

/// Build a resolver over the real filesystem.
pub fn build_resolver(cwd: &Path, setup: Setup<'_>) -> Result<Resolver> {
    let options = load_options(cwd, setup.config)?;
    let module_map: Arc<dyn ModuleMap> = match setup.module_map {
        Some(path) => Arc::new(InMemoryModuleMap::from_file(&cwd.join(path)).into_diagnostic()?),
        None => Arc::new(InMemoryModuleMap::new()),
    };
    Ok(Resolver::new(module_map, options))
}

/// Error details in JSON output.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tried: Vec<PathBuf>,
}

impl From<&Error> for ErrorInfo {
    fn from(err: &Error) -> Self {
        let tried = match err {
            Error::ModuleNotFound { tried, .. } => tried.clone(),
            _ => Vec::new(),
        };
        Self {
            code: err.code(),
            message: err.to_string(),
            tried,
        }
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}
