//! sdkforge CLI
//!
//! Commands:
//!   generate  - Emit TypeScript modules from schema
//!   audit     - Diff on-disk modules against the schema (alias `audit:api`)
//!   render    - Render one primitive config to stdout
//!   schema    - Print JSON Schema for the schema and config files

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SDKFORGE_LOG";

#[derive(Parser)]
#[command(
    name = "sdkforge",
    version,
    about = "Generate and audit TypeScript SDK modules from declarative schemas"
)]
struct Cli {
    /// Run as if started in DIR
    #[arg(short = 'C', long = "dir", value_name = "DIR", global = true)]
    dir: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit types and client modules for the selected schema modules
    Generate(cli::generate::GenerateArgs),
    /// Report drift between the schema and the generated modules on disk
    #[command(alias = "audit:api")]
    Audit(cli::audit::AuditArgs),
    /// Render a primitive config (YAML or JSON) to TypeScript
    Render(cli::render::RenderArgs),
    /// Print the JSON Schema of a file format
    Schema(cli::schema::SchemaArgs),
}

fn main() -> ExitCode {
    let opts = Cli::parse();
    init_tracing(opts.verbose);

    let start_dir = match opts.dir {
        Some(dir) => dir,
        None => match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(2);
            }
        },
    };

    let result = match opts.command {
        Commands::Generate(args) => cli::generate::run(args, &start_dir),
        Commands::Audit(args) => cli::audit::run(args, &start_dir),
        Commands::Render(args) => cli::render::run(args, &start_dir),
        Commands::Schema(args) => cli::schema::run(args),
    };

    match result {
        Ok(cli::Outcome::Success) => ExitCode::SUCCESS,
        Ok(cli::Outcome::Failed) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string())
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}
