//! StoreForge CLI - scaffold and manage storefront projects.
//!
//! Commands:
//! - `storeforge init` - Initialize a new storefront project
//! - `storeforge add` - Add a module or child theme to the project
//! - `storeforge doctor` - Check the project and its environment

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{AddArgs, DoctorArgs, InitArgs};

/// StoreForge CLI - scaffold and manage storefront projects
#[derive(Parser)]
#[command(name = "storeforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new storefront project
    Init(InitArgs),

    /// Add a module or child theme to the project
    Add(AddArgs),

    /// Check the project and its environment
    Doctor(DoctorArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::new(output)?;

    let result = match cli.command {
        Commands::Init(args) => commands::init::run(args, &ctx).await,
        Commands::Add(args) => commands::add::run(args, &ctx).await,
        Commands::Doctor(args) => commands::doctor::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
