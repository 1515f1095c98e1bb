use std::path::PathBuf;
use thiserror::Error;

/// Boxed error raised by an external resolver.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Core error type for locus operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Every candidate was exhausted without finding a file.
    #[error("Cannot find module '{specifier}' from '{}'", from.display())]
    ModuleNotFound {
        specifier: String,
        from: PathBuf,
        /// Candidate paths tried (capped).
        tried: Vec<PathBuf>,
    },

    /// A `moduleNameMapper` rule matched but its target could not be resolved.
    #[error(
        "Could not locate module '{specifier}' mapped as '{mapped}' (pattern {pattern:?}) from '{}'",
        from.display()
    )]
    MappedModuleNotFound {
        specifier: String,
        mapped: String,
        pattern: String,
        from: PathBuf,
    },

    /// A `moduleNameMapper` rule is malformed.
    #[error("Invalid moduleNameMapper pattern {pattern:?}: {reason}")]
    InvalidMapping { pattern: String, reason: String },

    /// Error raised by an external resolver, passed through untouched.
    #[error(transparent)]
    External(BoxError),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ModuleNotFound { .. } => codes::MODULE_NOT_FOUND,
            Self::MappedModuleNotFound { .. } => codes::MAPPED_MODULE_NOT_FOUND,
            Self::InvalidMapping { .. } => codes::INVALID_MAPPING,
            Self::External(_) => codes::EXTERNAL_RESOLVER,
            Self::ConfigRead { .. } | Self::ConfigParse { .. } => codes::CONFIG_INVALID,
        }
    }

    /// Whether this error means "nothing was found" rather than a failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ModuleNotFound { .. } | Self::MappedModuleNotFound { .. }
        )
    }
}

/// Stable error codes.
pub mod codes {
    pub const MODULE_NOT_FOUND: &str = "MODULE_NOT_FOUND";
    pub const MAPPED_MODULE_NOT_FOUND: &str = "MAPPED_MODULE_NOT_FOUND";
    pub const INVALID_MAPPING: &str = "INVALID_MAPPING";
    pub const EXTERNAL_RESOLVER: &str = "EXTERNAL_RESOLVER";
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_not_found_message() {
        let err = Error::ModuleNotFound {
            specifier: "left-pad".to_string(),
            from: PathBuf::from("/project/src/index.js"),
            tried: Vec::new(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot find module 'left-pad' from '/project/src/index.js'"
        );
        assert_eq!(err.code(), codes::MODULE_NOT_FOUND);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_external_error_is_transparent() {
        let inner: BoxError = "plugin exploded".into();
        let err = Error::External(inner);
        assert_eq!(err.to_string(), "plugin exploded");
        assert!(!err.is_not_found());
    }
}
