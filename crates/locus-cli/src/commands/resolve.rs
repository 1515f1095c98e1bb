use super::{build_resolver, print_json, ErrorInfo, Setup};
use locus_core::{Config, Resolution, ResolutionRequest};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON output of `locus resolve`.
#[derive(Debug, Serialize)]
struct ResolveOutput {
    ok: bool,
    specifier: String,
    from: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<Resolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorInfo>,
}

/// Run the resolve command.
///
/// Exits with code 2 when the specifier cannot be resolved. Any other
/// failure (bad config, external resolver error) is returned as a diagnostic.
pub fn run(config: &Config, specifier: &str, from: &Path, setup: Setup<'_>, json: bool) -> Result<()> {
    let resolver = build_resolver(&config.cwd, setup)?;
    let from = config.cwd.join(from);
    let request = ResolutionRequest::new(from.clone(), specifier);

    let (resolution, error) = match resolver.resolve(&request) {
        Ok(resolution) => (Some(resolution), None),
        Err(err) if err.is_not_found() => (None, Some(err)),
        Err(err) => return Err(err).into_diagnostic(),
    };
    debug!(specifier, ok = resolution.is_some(), "resolve finished");

    let failed = error.is_some();
    if json {
        print_json(&ResolveOutput {
            ok: !failed,
            specifier: specifier.to_string(),
            from,
            resolution,
            error: error.as_ref().map(ErrorInfo::from),
        })?;
    } else {
        match (&resolution, &error) {
            (Some(Resolution::Core(name)), _) => println!("core {name}"),
            (Some(Resolution::Mock(path)), _) => println!("mock {}", path.display()),
            (Some(Resolution::File(path)), _) => println!("{}", path.display()),
            (None, Some(err)) => {
                eprintln!("! {}: {err}", err.code());
                for tried in &ErrorInfo::from(err).tried {
                    eprintln!("  tried {}", tried.display());
                }
            }
            (None, None) => {}
        }
    }

    if failed {
        std::process::exit(2);
    }
    Ok(())
}
