use super::{build_resolver, print_json, Setup};
use locus_core::Config;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// JSON output of `locus mock`.
#[derive(Debug, Serialize)]
struct MockOutput {
    ok: bool,
    name: String,
    from: PathBuf,
    mock: Option<PathBuf>,
}

/// Run the mock command. A missing mock is not an error.
pub fn run(config: &Config, name: &str, from: &Path, setup: Setup<'_>, json: bool) -> Result<()> {
    let resolver = build_resolver(&config.cwd, setup)?;
    let from = config.cwd.join(from);
    let mock = resolver.get_mock_module(&from, name).into_diagnostic()?;

    if json {
        print_json(&MockOutput {
            ok: true,
            name: name.to_string(),
            from,
            mock,
        })?;
    } else {
        match mock {
            Some(path) => println!("{}", path.display()),
            None => println!("no mock for {name}"),
        }
    }
    Ok(())
}
