//! Resource Schema CLI
//!
//! Command-line interface for converting service models into provisioning
//! resource schemas.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use resource_schema::{
    file_name_for_type, load_config, load_model, ConstraintType, ConvertError, ResourceIndex,
    ResourceSchemaConverter, ShapeId,
};

#[derive(Parser)]
#[command(name = "resource-schema")]
#[command(about = "Convert service models into provisioning resource schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every annotated resource in a model to a schema document
    Convert {
        /// Model JSON file
        #[arg(long)]
        model: PathBuf,

        /// Converter configuration JSON file
        #[arg(long)]
        config: PathBuf,

        /// Output directory, one file per resource (stdout if not specified)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show the derived property table for one resource
    Properties {
        /// Model JSON file
        #[arg(long)]
        model: PathBuf,

        /// Resource shape id (namespace#Name)
        #[arg(long)]
        resource: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            model,
            config,
            out,
            pretty,
        } => run_convert(&model, &config, out, pretty),
        Commands::Properties { model, resource } => run_properties(&model, &resource),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_convert(
    model_path: &Path,
    config_path: &Path,
    out: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let model = load_model(model_path).map_err(report)?;
    let config = load_config(config_path).map_err(report)?;

    let converter = ResourceSchemaConverter::new(config);
    let nodes = converter.convert_to_nodes(&model).map_err(report)?;

    match out {
        Some(dir) => {
            std::fs::create_dir_all(&dir).map_err(|e| {
                eprintln!("Error creating {}: {}", dir.display(), e);
                3u8
            })?;
            for (type_name, node) in &nodes {
                let path = dir.join(file_name_for_type(type_name));
                let content = to_json(node, pretty)?;
                std::fs::write(&path, content).map_err(|e| {
                    eprintln!("Error writing {}: {}", path.display(), e);
                    3u8
                })?;
                println!("wrote {}", path.display());
            }
        }
        None => {
            println!("{}", to_json(&nodes, pretty)?);
        }
    }

    Ok(())
}

fn run_properties(model_path: &Path, resource: &str) -> Result<(), u8> {
    let model = load_model(model_path).map_err(report)?;
    let resource_id: ShapeId = resource.parse().map_err(report)?;

    if model.get(&resource_id).is_none() {
        return Err(report(ConvertError::ShapeNotFound { id: resource_id }));
    }

    let index = ResourceIndex::new(&model).map_err(report)?;

    let identifiers: Vec<String> = index
        .primary_identifiers(&resource_id)
        .into_iter()
        .collect();
    println!("primary identifiers: {}", identifiers.join(", "));

    for identifier in index.additional_identifiers(&resource_id) {
        let names: Vec<String> = identifier.into_iter().collect();
        println!("additional identifier: {}", names.join(", "));
    }

    println!();
    for (name, definition) in index.properties(&resource_id) {
        let mutability = match definition.collapsed() {
            Some(ConstraintType::ReadOnly) => "readOnly",
            Some(ConstraintType::CreateOnly) => "createOnly",
            Some(ConstraintType::WriteOnly) => "writeOnly",
            None => "mutable",
        };
        println!("{:<40} {}", name, mutability);
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, u8> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

fn report(error: ConvertError) -> u8 {
    eprintln!("Error: {}", error);
    error.exit_code() as u8
}
