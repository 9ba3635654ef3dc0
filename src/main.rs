//! rdolo
//!
//! Imports a model document, validates it and prints a summary.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- models/rbc.yaml --config import.toml
//! ```

use clap::Parser;
use log::error;
use rdolo_core::config::ImportConfig;
use rdolo_core::{ImportResult, ImportedModel, Importer};
use std::path::PathBuf;

/// Import and validate an economic model description
#[derive(Parser, Debug)]
#[command(name = "rdolo")]
#[command(about = "Import and validate an economic model description")]
struct Args {
    /// Model file or URL
    location: String,

    /// Stop after building the symbolic model
    #[arg(long)]
    symbolic: bool,

    /// TOML file with importer settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the full symbolic model as YAML
    #[arg(long)]
    dump: bool,
}

fn run(args: &Args) -> ImportResult<()> {
    let config = match &args.config {
        Some(path) => ImportConfig::from_path(path)?,
        None => ImportConfig::default(),
    };
    let importer = Importer::new().with_config(config);

    let model = if args.symbolic {
        ImportedModel::Symbolic(importer.import_symbolic(&args.location, None)?)
    } else {
        importer.import(&args.location, None)?
    };

    match &model {
        ImportedModel::Symbolic(m) => print!("{m}"),
        ImportedModel::Numeric(m) => print!("{m}"),
        ImportedModel::Dynare(m) => print!("{m}"),
    }

    if args.dump {
        match serde_yaml::to_string(model.symbolic()) {
            Ok(text) => println!("---\n{text}"),
            Err(e) => error!("Could not serialise the model: {}", e),
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
