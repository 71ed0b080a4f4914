//! FitDesk CLI
//!
//! Command-line access to the FitDesk store: schema setup, users, client
//! profiles and preferences.

use clap::{Parser, Subcommand};
use fitdesk_core::logging_facility::{init_with_directive, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "fitdesk")]
#[command(about = "FitDesk - fitness client store", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: commands::StoreArgs,

    /// Log filter directive (e.g. `fitdesk=debug`), overrides RUST_LOG
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Schema operations
    Schema(commands::schema::SchemaArgs),
    /// User operations
    User(commands::user::UserArgs),
    /// Client profile operations
    Profile(commands::profile::ProfileArgs),
    /// User preferences operations
    Prefs(commands::prefs::PrefsArgs),
}

fn main() {
    let cli = Cli::parse();
    init_with_directive(Profile::Development, cli.log.as_deref());

    let result = match cli.command {
        Commands::Schema(args) => commands::schema::execute(args, &cli.store),
        Commands::User(args) => commands::user::execute(args, &cli.store),
        Commands::Profile(args) => commands::profile::execute(args, &cli.store),
        Commands::Prefs(args) => commands::prefs::execute(args, &cli.store),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
