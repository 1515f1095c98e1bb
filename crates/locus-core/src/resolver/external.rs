//! Pluggable external resolver.

use crate::error::BoxError;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Options handed to an external resolver for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalResolverOptions {
    /// Directory the specifier is resolved from.
    pub basedir: String,
    pub browser: bool,
    pub extensions: Vec<String>,
    pub module_directory: Vec<String>,
    /// Extra search roots (`NODE_PATH` entries first).
    pub paths: Vec<String>,
    pub root_dir: Option<String>,
}

/// A resolver plugin that fully replaces built-in file resolution.
///
/// Whatever it returns is trusted verbatim. Errors are propagated to the
/// caller unchanged.
pub trait ExternalResolver: Send + Sync {
    fn resolve(
        &self,
        specifier: &str,
        options: &ExternalResolverOptions,
    ) -> Result<PathBuf, BoxError>;
}

impl<F> ExternalResolver for F
where
    F: Fn(&str, &ExternalResolverOptions) -> Result<PathBuf, BoxError> + Send + Sync,
{
    fn resolve(
        &self,
        specifier: &str,
        options: &ExternalResolverOptions,
    ) -> Result<PathBuf, BoxError> {
        self(specifier, options)
    }
}

impl fmt::Debug for dyn ExternalResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExternalResolver")
    }
}
