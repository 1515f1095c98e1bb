#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod logging;

use clap::Parser;
use locus_core::{Config, PathStyle};
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "locus")]
#[command(author, version, about = "Explain how module specifiers resolve", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve a specifier imported from a file
    Resolve {
        /// Module specifier (e.g. "./util", "lodash", "fs")
        specifier: String,

        /// File the specifier is imported from
        #[arg(long, value_name = "FILE")]
        from: PathBuf,

        #[command(flatten)]
        setup: SetupArgs,
    },

    /// Look up the mock registered for a module name
    Mock {
        /// Module name as written in the importing file
        name: String,

        /// File the mock is requested from
        #[arg(long, value_name = "FILE")]
        from: PathBuf,

        #[command(flatten)]
        setup: SetupArgs,
    },

    /// List the directories searched for bare specifiers
    Paths {
        /// Directory to start from (defaults to the working directory)
        dir: Option<String>,

        /// Resolver config file (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Path convention: "posix" or "windows"
        #[arg(long)]
        style: Option<PathStyle>,
    },

    /// Check whether a name is a builtin module
    Core {
        /// Module name
        name: String,

        /// Treat nothing as builtin
        #[arg(long)]
        no_core_modules: bool,
    },
}

/// Inputs shared by commands that build a full resolver.
#[derive(clap::Args, Debug)]
struct SetupArgs {
    /// Resolver config file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Module map file (JSON with mocks, duplicates, packages)
    #[arg(long, value_name = "FILE")]
    module_map: Option<PathBuf>,
}

impl SetupArgs {
    fn setup(&self) -> commands::Setup<'_> {
        commands::Setup {
            config: self.config.as_deref(),
            module_map: self.module_map.as_deref(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Resolve {
            specifier,
            from,
            setup,
        }) => {
            let span = tracing::info_span!("resolve", cmd = "resolve", cwd = %cwd.display());
            let _guard = span.enter();
            commands::resolve::run(&config, &specifier, &from, setup.setup(), cli.json)
        }
        Some(Commands::Mock { name, from, setup }) => {
            let span = tracing::info_span!("mock", cmd = "mock", cwd = %cwd.display());
            let _guard = span.enter();
            commands::mock::run(&config, &name, &from, setup.setup(), cli.json)
        }
        Some(Commands::Paths { dir, config: file, style }) => commands::paths::run(
            &config,
            dir.as_deref(),
            file.as_deref(),
            style,
            cli.json,
        ),
        Some(Commands::Core {
            name,
            no_core_modules,
        }) => commands::builtin::run(&name, !no_core_modules, cli.json),
    }
}
