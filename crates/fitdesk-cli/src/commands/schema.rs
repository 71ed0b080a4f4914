//! Schema command
//!
//! Usage: fitdesk schema init [--file <SQL>]

use super::StoreArgs;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SchemaArgs {
    #[command(subcommand)]
    pub command: SchemaCommand,
}

#[derive(Debug, Subcommand)]
pub enum SchemaCommand {
    /// Create the tables (embedded schema unless a file is configured or given)
    Init(InitArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// `;`-separated SQL file to apply instead
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

pub fn execute(args: SchemaArgs, store: &StoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        SchemaCommand::Init(init_args) => execute_init(init_args, store),
    }
}

fn execute_init(args: InitArgs, store: &StoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (engine, config) = store.open()?;

    let applied = match &args.file {
        Some(path) => engine.initialize_schema(path),
        None => engine.initialize(),
    };
    if !applied {
        return Err("schema could not be applied".into());
    }

    println!("✓ Schema applied to {}", config.database_path.display());
    Ok(())
}
