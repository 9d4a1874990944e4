use clap::{Args, ValueEnum};

use super::Outcome;
use sdkforge::schema::{ApiFile, ModelsFile};
use sdkforge::{ProjectConfig, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaName {
    /// models.yaml
    Models,
    /// api.yaml
    Api,
    /// sdkforge.yaml
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    /// Which file format to describe; lists the formats when omitted
    #[arg(value_enum, value_name = "NAME")]
    pub name: Option<SchemaName>,
}

pub fn run(args: SchemaArgs) -> Result<Outcome> {
    match args.name {
        Some(SchemaName::Models) => print_schema::<ModelsFile>()?,
        Some(SchemaName::Api) => print_schema::<ApiFile>()?,
        Some(SchemaName::Config) => print_schema::<ProjectConfig>()?,
        None => {
            println!("Available schemas:");
            println!("  models   models.yaml (entities, fields, relations)");
            println!("  api      api.yaml (operations)");
            println!("  config   sdkforge.yaml (project configuration)");
            println!("\nUsage: sdkforge schema <name>");
        }
    }
    Ok(Outcome::Success)
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
