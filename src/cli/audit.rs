use clap::Args;
use std::path::{Path, PathBuf};

use super::{module_glob, selected_sources, Outcome};
use sdkforge::{audit_schema, AuditReport, Auditor, Project, Result, SchemaLoader, TracingLogger};

#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    /// Module name or glob (defaults to the configured `module_glob`)
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Only parse and integrity-check the schema files
    #[arg(long)]
    pub schema: bool,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Directory holding the generated modules, overriding `output_dir`
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

pub fn run(args: AuditArgs, start_dir: &Path) -> Result<Outcome> {
    let project = Project::discover(start_dir)?;
    let glob = module_glob(&args.name, &project).to_string();
    let logger = TracingLogger;

    let report = if args.schema {
        audit_schema(&project.sources()?, &glob, &logger)?
    } else {
        let sources = selected_sources(&project, &glob)?;
        let schema = SchemaLoader::load(&sources)?;
        let registry = project.config.registry();
        let out_dir = args.out.unwrap_or_else(|| project.output_dir());
        Auditor::new(&registry, out_dir)
            .with_emit_config(project.config.emit_config())
            .with_logger(&logger)
            .audit(&schema, &glob)?
    };

    print_report(&report, args.json)?;
    Ok(Outcome::from_passed(report.passed()))
}

fn print_report(report: &AuditReport, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_report());
    }
    Ok(())
}
