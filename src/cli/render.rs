use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use super::Outcome;
use sdkforge::{Error, Primitive, Render, Result};

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Primitive config file (`.json` is read as JSON, anything else as YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

pub fn run(args: RenderArgs, start_dir: &Path) -> Result<Outcome> {
    let path = start_dir.join(&args.file);
    let content = fs::read_to_string(&path).map_err(Error::Io)?;

    let primitive = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Primitive::from_json(&content)?,
        _ => Primitive::from_yaml(&content)?,
    };
    tracing::debug!("rendering {:?} primitive from {}", primitive.family(), path.display());

    println!("{}", primitive.render());
    Ok(Outcome::Success)
}
