//! CLI wrapper for libgate.
//!
//! Usage:
//!   libgate [--config FILE] libraries              # Recognized libraries in load order
//!   libgate [--config FILE] list                   # Open libraries and their functions
//!   libgate [--config FILE] call <lib> <fn> [args] # Call one exposed function

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::{debug, error};

use libgate::runner::ds::value::Value;
use libgate::runner::plugin::registry::{display_name, LibraryRegistry};
use libgate::runner::plugin::types::ScriptState;
use libgate::runner::plugin::RuntimeConfig;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "libgate")]
#[command(about = "Inspect and call the standard libraries exposed to a script state")]
struct Args {
    /// Runtime configuration (TOML). Without it every library opens with its defaults.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every recognized library name in load order
    Libraries,
    /// Print each opened library with its sorted function names
    List,
    /// Call `<library>.<function>` with the given arguments
    Call {
        /// Library name; `_G` or an empty string for the base library
        library: String,
        function: String,
        /// Parsed as integer, float, true/false, nil, or else string
        args: Vec<String>,
    },
}

fn main() {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("libgate: {}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let registry = LibraryRegistry::standard()?;

    if let Command::Libraries = args.command {
        for name in registry.load_order() {
            println!("{}", display_name(name));
        }
        return Ok(());
    }

    let mut state = ScriptState::new();
    match &args.config {
        Some(path) => {
            let config = RuntimeConfig::load(path)?;
            let report = config.apply(&registry, &mut state)?;
            for name in &report.skipped {
                eprintln!("libgate: skipped unknown library '{}'", name);
            }
        }
        None => {
            registry.open_all(&mut state)?;
        }
    }
    debug!(state = %state.id(), libraries = state.loaded_libraries().len(), "state ready");

    match args.command {
        Command::Libraries => {}
        Command::List => {
            for library in state.loaded_libraries() {
                println!("{}: {}", display_name(library), state.function_names(library).join(", "));
            }
        }
        Command::Call {
            library,
            function,
            args: raw,
        } => {
            let library = if library == "_G" { String::new() } else { library };
            let values = raw.iter().map(|a| parse_arg(a)).collect();
            let result = state.call(&library, &function, values)?;
            println!("{}", result);
        }
    }
    Ok(())
}

fn parse_arg(raw: &str) -> Value {
    match raw {
        "nil" => Value::Nil,
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => {
            if let Ok(i) = raw.parse::<i64>() {
                Value::Integer(i)
            } else if let Ok(f) = raw.parse::<f64>() {
                Value::Float(f)
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}
