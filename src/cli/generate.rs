use clap::Args;
use std::path::{Path, PathBuf};

use super::{module_glob, selected_sources, Outcome};
use sdkforge::{write_modules, Emitter, Project, Result, SchemaLoader, TracingLogger};

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Module name or glob (defaults to the configured `module_glob`)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Output directory, overriding `output_dir` from sdkforge.yaml
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Print the files that would be written without touching disk
    #[arg(long)]
    pub dry_run: bool,

    /// Omit the provenance comment at the top of each file
    #[arg(long)]
    pub no_header: bool,
}

pub fn run(args: GenerateArgs, start_dir: &Path) -> Result<Outcome> {
    let project = Project::discover(start_dir)?;
    let glob = module_glob(&args.name, &project);
    let sources = selected_sources(&project, glob)?;
    if sources.is_empty() {
        println!("No schema modules match '{}'", glob);
        return Ok(Outcome::Success);
    }

    // Parse and integrity errors abort before anything is written
    let schema = SchemaLoader::load(&sources)?;

    let registry = project.config.registry();
    let mut emit_config = project.config.emit_config();
    if args.no_header {
        emit_config.header = false;
    }
    let logger = TracingLogger;
    let output = Emitter::new(&registry)
        .with_config(emit_config)
        .with_logger(&logger)
        .emit_all(&schema);

    let out_dir = args.out.unwrap_or_else(|| project.output_dir());

    if args.dry_run {
        for module in &output.modules {
            println!("{}  {}", module.hash, out_dir.join(&module.path).display());
        }
    } else {
        let summary = write_modules(&out_dir, &output.modules, &logger)?;
        for path in &summary.written {
            println!("✓ wrote {}", path.display());
        }
        for path in &summary.unchanged {
            println!("  unchanged {}", path.display());
        }
    }

    for failure in &output.failures {
        eprintln!("✗ {}", failure);
    }
    println!(
        "\n{} module file(s) from {} schema module(s), {} failure(s)",
        output.modules.len(),
        schema.modules.len(),
        output.failures.len()
    );

    Ok(Outcome::from_passed(output.is_complete()))
}
