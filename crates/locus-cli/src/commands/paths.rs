use super::{load_options, print_json};
use locus_core::{Config, EmptyModuleMap, PathStyle, Resolver};
use miette::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// JSON output of `locus paths`.
#[derive(Debug, Serialize)]
struct PathsOutput {
    from: String,
    style: PathStyle,
    paths: Vec<PathBuf>,
}

/// Run the paths command.
///
/// With `--style` the directory is taken verbatim in that convention, so a
/// Windows tree can be inspected from a POSIX host.
pub fn run(
    config: &Config,
    dir: Option<&str>,
    config_file: Option<&Path>,
    style: Option<PathStyle>,
    json: bool,
) -> Result<()> {
    let mut options = load_options(&config.cwd, config_file)?;
    if let Some(style) = style {
        options = options.with_path_style(style);
    }
    let style = options.path_style;
    let from = dir.map_or_else(|| options.cwd.clone(), ToString::to_string);

    let resolver = Resolver::new(Arc::new(EmptyModuleMap), options);
    let paths = resolver.get_module_paths(&from);

    if json {
        print_json(&PathsOutput { from, style, paths })?;
    } else {
        for path in &paths {
            println!("{}", path.display());
        }
    }
    Ok(())
}
