use super::print_json;
use locus_core::{EmptyModuleMap, Resolver, ResolverOptions};
use miette::Result;
use serde::Serialize;
use std::sync::Arc;

/// JSON output of `locus core`.
#[derive(Debug, Serialize)]
struct CoreOutput {
    name: String,
    core: bool,
}

/// Run the core command.
pub fn run(name: &str, has_core_modules: bool, json: bool) -> Result<()> {
    let options = ResolverOptions::new().with_core_modules(has_core_modules);
    let resolver = Resolver::new(Arc::new(EmptyModuleMap), options);
    let core = resolver.is_core_module(name);

    if json {
        print_json(&CoreOutput {
            name: name.to_string(),
            core,
        })?;
    } else if core {
        println!("{name} is a core module");
    } else {
        println!("{name} is not a core module");
    }
    Ok(())
}
